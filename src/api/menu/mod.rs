//! 菜单 API 模块
//!
//! 前台只读：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/menu | GET | 在售菜品列表 |
//! | /api/menu/featured | GET | 招牌菜 (最多 3 道) |
//! | /api/menu/{id} | GET | 单个菜品 |
//!
//! 后台管理 (嵌在 /admin/api 下)：
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /menu | GET | 全部菜品 (含下架) |
//! | /menu | POST | 新建菜品 |
//! | /menu/{id} | PUT | 更新菜品 |
//! | /menu/{id} | DELETE | 删除菜品 (连带清理图片) |

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/menu", public_routes())
}

fn public_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list_available))
        .route("/featured", get(handler::list_featured))
        .route("/{id}", get(handler::get_by_id))
}

pub fn admin_router() -> Router<ServerState> {
    Router::new()
        .route("/menu", get(handler::list_all).post(handler::create))
        .route("/menu/{id}", put(handler::update).delete(handler::delete))
}
