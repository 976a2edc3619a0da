//! 购物车 - 结账流程的唯一数据源
//!
//! # 设计
//!
//! [`CartStore`] 是一个显式注入的状态容器，不是全局可变状态：
//! 四个变更操作 (add/remove/update_quantity/clear)、两个派生查询
//! (total/count)、一个可见性开关。所有操作都是同步全函数，不会失败。
//!
//! 生命周期分两段：`new()` 构造空默认值，`hydrate()` 在首次使用时
//! 从持久化快照恢复一次；消费方通过 [`CartStore::is_ready`] 判断
//! 快照是否已加载。
//!
//! [`CartManager`] 按 cart id 管理多个 store，并在每次变更后将快照
//! 写入 redb (见 [`storage`])。

pub mod storage;

#[cfg(test)]
mod tests;

use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use storage::{CartStorage, StorageError, StorageResult};

/// 购物车行项目
///
/// 同一个菜品 id 最多一行；quantity >= 1 (降到 0 即删除整行)。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Menu item key
    pub id: i64,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub quantity: u32,
}

/// 待加入购物车的菜品 (不带数量)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCartItem {
    pub id: i64,
    pub name: String,
    pub unit_price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
}

/// 持久化快照：行项目序列 + 抽屉可见性
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CartSnapshot {
    pub items: Vec<CartLineItem>,
    pub is_open: bool,
}

/// 购物车状态容器
#[derive(Debug)]
pub struct CartStore {
    items: Vec<CartLineItem>,
    is_open: bool,
    hydrated: bool,
}

impl CartStore {
    /// 构造空购物车 (未水合)
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            is_open: false,
            hydrated: false,
        }
    }

    /// 从持久化快照恢复，仅第一次调用生效
    pub fn hydrate(&mut self, snapshot: Option<CartSnapshot>) {
        if self.hydrated {
            return;
        }
        if let Some(snapshot) = snapshot {
            self.items = snapshot.items;
            self.is_open = snapshot.is_open;
        }
        self.hydrated = true;
    }

    /// 快照是否已加载
    pub fn is_ready(&self) -> bool {
        self.hydrated
    }

    /// 加入菜品：已有同 id 行则数量 +1，否则追加数量为 1 的新行
    pub fn add_item(&mut self, item: NewCartItem) {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
            existing.quantity += 1;
        } else {
            self.items.push(CartLineItem {
                id: item.id,
                name: item.name,
                unit_price: item.unit_price,
                image: item.image,
                quantity: 1,
            });
        }
    }

    /// 删除指定 id 的行，不存在则无操作
    pub fn remove_item(&mut self, id: i64) {
        self.items.retain(|i| i.id != id);
    }

    /// 数量增量调整：new = max(0, current + delta)，结果为 0 即删除
    pub fn update_quantity(&mut self, id: i64, delta: i32) {
        for item in self.items.iter_mut() {
            if item.id == id {
                item.quantity = item.quantity.saturating_add_signed(delta);
            }
        }
        self.items.retain(|i| i.quantity > 0);
    }

    /// 清空 (下单成功后)
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// 切换抽屉可见性，无业务影响
    pub fn toggle_open(&mut self) {
        self.is_open = !self.is_open;
    }

    /// 设置抽屉可见性
    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// 合计金额 = Σ 单价 × 数量，派生值不落盘
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(|i| i.unit_price * Decimal::from(i.quantity))
            .sum()
    }

    /// 件数 = Σ 数量
    pub fn count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// 当前状态快照 (用于持久化)
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot {
            items: self.items.clone(),
            is_open: self.is_open,
        }
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 按 cart id 管理购物车并负责持久化
///
/// 每个 cart id 对应一个 [`CartStore`]；首次触达时从 redb 水合，
/// 每次变更后回写快照。单个 cart 的操作在 DashMap 分片锁内串行，
/// 与调用顺序一致。
#[derive(Clone)]
pub struct CartManager {
    storage: Arc<CartStorage>,
    carts: Arc<DashMap<String, CartStore>>,
}

impl CartManager {
    pub fn with_storage(storage: CartStorage) -> Self {
        Self {
            storage: Arc::new(storage),
            carts: Arc::new(DashMap::new()),
        }
    }

    /// 对指定购物车执行一次变更并持久化快照
    pub fn mutate<T>(
        &self,
        cart_id: &str,
        f: impl FnOnce(&mut CartStore) -> T,
    ) -> StorageResult<T> {
        let mut entry = self
            .carts
            .entry(cart_id.to_string())
            .or_insert_with(CartStore::new);

        if !entry.is_ready() {
            let snapshot = self.storage.load(cart_id)?;
            entry.hydrate(snapshot);
        }

        let result = f(entry.value_mut());
        self.storage.save(cart_id, &entry.snapshot())?;
        Ok(result)
    }

    /// 读取购物车快照 (水合但不变更)
    pub fn view(&self, cart_id: &str) -> StorageResult<CartSnapshot> {
        let mut entry = self
            .carts
            .entry(cart_id.to_string())
            .or_insert_with(CartStore::new);

        if !entry.is_ready() {
            let snapshot = self.storage.load(cart_id)?;
            entry.hydrate(snapshot);
        }

        Ok(entry.snapshot())
    }
}
