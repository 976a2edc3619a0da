//! 后台登录模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/auth/login | POST | 登录，下发会话 Cookie |
//! | /api/auth/logout | POST | 登出，清除 Cookie |
//! | /api/auth/me | GET | 当前会话用户 |

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
        .route("/me", get(handler::me))
}
