//! 菜品图片上传模块 (仅后台)
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /upload | POST | multipart 上传，转 JPEG 存储 |
//! | /upload/{filename} | DELETE | 删除已上传图片 |

mod handler;

use axum::{
    Router,
    routing::{delete, post},
};

use crate::core::ServerState;

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/upload", post(handler::upload))
        .route("/upload/{filename}", delete(handler::delete))
}
