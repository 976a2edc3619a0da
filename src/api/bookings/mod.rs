//! 订座 API 模块
//!
//! 前台：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/bookings | POST | 提交订座请求 (公共表单) |
//!
//! 后台 (嵌在 /admin/api 下)：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /bookings | GET | 全部订座，可按状态过滤 |
//! | /bookings/{id}/status | PUT | 确认 / 取消 |
//! | /bookings/{id} | DELETE | 删除记录 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/bookings", post(handler::submit))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/bookings", get(handler::list))
        .route("/bookings/{id}/status", put(handler::update_status))
        .route("/bookings/{id}", delete(handler::delete))
}
