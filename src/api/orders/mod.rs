//! 外带订单 API 模块
//!
//! 前台：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | POST | 结账：购物车 + 客户信息 → 订单 |
//!
//! 后台 (嵌在 /admin/api 下)：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /orders | GET | 全部订单 |
//! | /orders/{id}/status | PUT | 推进订单状态 |

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/orders", post(handler::checkout))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/orders", get(handler::list))
        .route("/orders/{id}/status", put(handler::update_status))
}
