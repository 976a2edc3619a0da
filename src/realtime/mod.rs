//! 实时变更广播
//!
//! 每次后台或前台的写操作都会产生一条 [`ChangeEvent`]，通过
//! tokio broadcast 通道推给所有 SSE 订阅者。每张表维护独立的
//! 递增版本号，客户端用它判断自己的缓存是否过期。

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// 广播通道容量，慢消费者会收到 Lagged 并丢弃旧事件
const FEED_CAPACITY: usize = 256;

/// 变更类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Created,
    Updated,
    Deleted,
}

impl ChangeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Created => "created",
            ChangeAction::Updated => "updated",
            ChangeAction::Deleted => "deleted",
        }
    }
}

/// 单条变更事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// 变更的表名 (如 "menu_item", "booking")
    pub table: String,
    /// 变更类型
    pub action: ChangeAction,
    /// 记录 ID
    pub id: String,
    /// 变更后的数据 (deleted 时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// 该表的递增版本号
    pub version: u64,
}

/// 变更广播器
///
/// 每张表的版本号用 DashMap 无锁维护，broadcast 发送失败
/// (没有订阅者) 不算错误。
#[derive(Debug)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
    versions: DashMap<String, u64>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(FEED_CAPACITY);
        Self {
            sender,
            versions: DashMap::new(),
        }
    }

    /// 递增表版本号并广播一条变更事件，返回新版本号
    pub fn publish(
        &self,
        table: &str,
        action: ChangeAction,
        id: &str,
        data: Option<serde_json::Value>,
    ) -> u64 {
        let version = {
            let mut entry = self.versions.entry(table.to_string()).or_insert(0);
            *entry += 1;
            *entry
        };

        let event = ChangeEvent {
            table: table.to_string(),
            action,
            id: id.to_string(),
            data,
            version,
        };

        // 没有活跃订阅者时 send 返回 Err，忽略即可
        let _ = self.sender.send(event);
        version
    }

    /// 订阅变更流
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// 当前版本号，表不存在时为 0
    pub fn version(&self, table: &str) -> u64 {
        self.versions.get(table).map(|v| *v).unwrap_or(0)
    }
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn versions_increment_per_table() {
        let feed = ChangeFeed::new();
        assert_eq!(feed.version("menu_item"), 0);

        assert_eq!(feed.publish("menu_item", ChangeAction::Created, "a", None), 1);
        assert_eq!(feed.publish("menu_item", ChangeAction::Updated, "a", None), 2);
        assert_eq!(feed.publish("booking", ChangeAction::Created, "b", None), 1);

        assert_eq!(feed.version("menu_item"), 2);
        assert_eq!(feed.version("booking"), 1);
    }

    #[tokio::test]
    async fn subscribers_receive_published_events() {
        let feed = ChangeFeed::new();
        let mut rx = feed.subscribe();

        feed.publish(
            "review",
            ChangeAction::Created,
            "review:1",
            Some(serde_json::json!({"rating": 5})),
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.table, "review");
        assert_eq!(event.action, ChangeAction::Created);
        assert_eq!(event.id, "review:1");
        assert_eq!(event.version, 1);
        assert!(event.data.is_some());
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_harmless() {
        let feed = ChangeFeed::new();
        feed.publish("order", ChangeAction::Deleted, "order:1", None);
        assert_eq!(feed.version("order"), 1);
    }
}
