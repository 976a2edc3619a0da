//! 购物车 API 模块
//!
//! 购物车按客户端生成的 cart id 区分，无需登录：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/cart/{cart_id} | GET | 购物车视图 |
//! | /api/cart/{cart_id}/items | POST | 加入菜品 |
//! | /api/cart/{cart_id}/items/{id} | DELETE | 移除整行 |
//! | /api/cart/{cart_id}/items/{id}/quantity | PUT | 增减数量 |
//! | /api/cart/{cart_id}/clear | DELETE | 清空 |
//! | /api/cart/{cart_id}/open | PUT | 打开 / 收起抽屉 |

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart/{cart_id}", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::view))
        .route("/items", post(handler::add_item))
        .route("/items/{id}", delete(handler::remove_item))
        .route("/items/{id}/quantity", put(handler::update_quantity))
        .route("/clear", delete(handler::clear))
        .route("/open", put(handler::set_open))
}
