//! SSE 变更推送
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/events | GET | 订阅变更流，`?table=` 可选过滤 |
//!
//! 每条 SSE 消息的 event 名是表名，data 是 [`ChangeEvent`] 的 JSON。
//! 慢消费者跟不上广播时丢弃积压事件继续，不断开连接。

use std::convert::Infallible;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::Stream;
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};

use crate::core::ServerState;
use crate::realtime::ChangeEvent;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/events", get(subscribe))
}

#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// 只订阅指定表的变更
    pub table: Option<String>,
}

async fn subscribe(
    State(state): State<ServerState>,
    Query(query): Query<EventsQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.feed.subscribe();
    tracing::debug!(filter = query.table.as_deref().unwrap_or("*"), "SSE subscriber connected");

    Sse::new(event_stream(rx, query.table)).keep_alive(KeepAlive::default())
}

fn event_stream(
    rx: broadcast::Receiver<ChangeEvent>,
    filter: Option<String>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold((rx, filter), |(mut rx, filter)| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    if let Some(table) = filter.as_deref()
                        && change.table != table
                    {
                        continue;
                    }
                    let event = match Event::default().event(change.table.clone()).json_data(&change)
                    {
                        Ok(event) => event,
                        Err(e) => {
                            tracing::warn!(error = %e, "Failed to serialize change event");
                            continue;
                        }
                    };
                    return Some((Ok(event), (rx, filter)));
                }
                // 积压被覆盖，跳过继续收
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "SSE subscriber lagged behind the change feed");
                    continue;
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::realtime::{ChangeAction, ChangeFeed};
    use futures::StreamExt;

    #[tokio::test]
    async fn stream_yields_published_events() {
        let feed = ChangeFeed::new();
        let stream = event_stream(feed.subscribe(), None);
        futures::pin_mut!(stream);

        feed.publish("menu_item", ChangeAction::Created, "menu_item:1", None);

        let event = stream.next().await.unwrap();
        assert!(event.is_ok());
    }

    #[tokio::test]
    async fn filter_drops_other_tables() {
        let feed = ChangeFeed::new();
        let stream = event_stream(feed.subscribe(), Some("booking".into()));
        futures::pin_mut!(stream);

        feed.publish("menu_item", ChangeAction::Created, "menu_item:1", None);
        feed.publish("booking", ChangeAction::Created, "booking:1", None);
        drop(feed);

        // 只有 booking 事件通过，feed 销毁后流结束
        let first = stream.next().await;
        assert!(first.is_some());
        assert!(stream.next().await.is_none());
    }
}
