//! 评论 API 模块
//!
//! 前台：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/reviews | GET | 已通过审核的评论 (最新 6 条) |
//! | /api/reviews | POST | 提交评论，进入待审队列 |
//!
//! 后台 (嵌在 /admin/api 下)：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /reviews | GET | 全部评论 |
//! | /reviews/{id}/status | PUT | 通过 / 拒绝 |
//! | /reviews/{id} | DELETE | 删除评论 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route(
        "/api/reviews",
        get(handler::list_approved).post(handler::submit),
    )
}

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/reviews", get(handler::list))
        .route("/reviews/{id}/status", put(handler::update_status))
        .route("/reviews/{id}", delete(handler::delete))
}
