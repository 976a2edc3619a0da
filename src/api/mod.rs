//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 后台登录 / 登出 / 会话查询
//! - [`menu`] - 菜单浏览与管理
//! - [`bookings`] - 订座提交与管理
//! - [`reviews`] - 食客评论提交与审核
//! - [`orders`] - 外带下单与订单管理
//! - [`cart`] - 购物车操作
//! - [`upload`] - 菜品图片上传
//! - [`events`] - SSE 变更推送

pub mod auth;
pub mod bookings;
pub mod cart;
pub mod events;
pub mod health;
pub mod menu;
pub mod orders;
pub mod reviews;
pub mod upload;

// Re-export common types for handlers
pub use crate::utils::{AppResponse, AppResult};
