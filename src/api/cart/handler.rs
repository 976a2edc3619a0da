//! 购物车 API 处理器
//!
//! 每个写操作都返回完整的购物车视图，客户端直接用它刷新界面。

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, NewCartItem};
use crate::core::ServerState;
use crate::utils::AppResult;
use crate::utils::validation::MAX_NAME_LEN;

/// 返回给客户端的购物车视图
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineItem>,
    pub total: Decimal,
    pub count: u64,
    pub is_open: bool,
}

impl CartView {
    fn from_items(items: Vec<CartLineItem>, is_open: bool) -> Self {
        let total = items
            .iter()
            .map(|item| item.unit_price * Decimal::from(item.quantity))
            .sum();
        let count = items.iter().map(|item| u64::from(item.quantity)).sum();
        Self {
            items,
            total,
            count,
            is_open,
        }
    }
}

/// GET /api/cart/{cart_id} - 购物车视图
pub async fn view(
    State(state): State<ServerState>,
    Path(cart_id): Path<String>,
) -> AppResult<Json<CartView>> {
    let snapshot = state.carts.view(&cart_id)?;
    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}

/// POST /api/cart/{cart_id}/items - 加入菜品
///
/// 已在车里的菜品数量 +1，新菜品追加到末尾。
pub async fn add_item(
    State(state): State<ServerState>,
    Path(cart_id): Path<String>,
    Json(item): Json<NewCartItem>,
) -> AppResult<Json<CartView>> {
    if item.name.trim().is_empty() || item.name.len() > MAX_NAME_LEN {
        return Err(crate::utils::AppError::validation("Invalid item name"));
    }
    if item.unit_price < Decimal::ZERO {
        return Err(crate::utils::AppError::validation(
            "Item price cannot be negative",
        ));
    }

    let snapshot = state.carts.mutate(&cart_id, |cart| {
        cart.add_item(item);
        cart.snapshot()
    })?;

    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}

/// DELETE /api/cart/{cart_id}/items/{id} - 移除整行
pub async fn remove_item(
    State(state): State<ServerState>,
    Path((cart_id, id)): Path<(String, i64)>,
) -> AppResult<Json<CartView>> {
    let snapshot = state.carts.mutate(&cart_id, |cart| {
        cart.remove_item(id);
        cart.snapshot()
    })?;

    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}

#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    /// 数量增量，负数减少；减到 0 即移除该行
    pub delta: i32,
}

/// PUT /api/cart/{cart_id}/items/{id}/quantity - 增减数量
pub async fn update_quantity(
    State(state): State<ServerState>,
    Path((cart_id, id)): Path<(String, i64)>,
    Json(payload): Json<QuantityUpdate>,
) -> AppResult<Json<CartView>> {
    let snapshot = state.carts.mutate(&cart_id, |cart| {
        cart.update_quantity(id, payload.delta);
        cart.snapshot()
    })?;

    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}

/// DELETE /api/cart/{cart_id}/clear - 清空购物车
pub async fn clear(
    State(state): State<ServerState>,
    Path(cart_id): Path<String>,
) -> AppResult<Json<CartView>> {
    let snapshot = state.carts.mutate(&cart_id, |cart| {
        cart.clear();
        cart.snapshot()
    })?;

    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}

#[derive(Debug, Deserialize)]
pub struct OpenUpdate {
    pub is_open: Option<bool>,
}

/// PUT /api/cart/{cart_id}/open - 打开 / 收起抽屉
///
/// 带 `is_open` 时直接设置，否则取反当前状态。
pub async fn set_open(
    State(state): State<ServerState>,
    Path(cart_id): Path<String>,
    Json(payload): Json<OpenUpdate>,
) -> AppResult<Json<CartView>> {
    let snapshot = state.carts.mutate(&cart_id, |cart| {
        match payload.is_open {
            Some(open) => cart.set_open(open),
            None => cart.toggle_open(),
        }
        cart.snapshot()
    })?;

    Ok(Json(CartView::from_items(snapshot.items, snapshot.is_open)))
}
