//! 认证模块
//!
//! JWT 会话 Cookie + Argon2 密码验证：
//! - [`JwtService`] - 令牌签发、验证、Cookie 组装
//! - [`session`] - 会话刷新 (门卫第二层)
//! - [`middleware`] - 后台 API 的 require_admin 中间件

pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{Claims, JwtConfig, JwtError, JwtService};
pub use middleware::require_admin;
pub use session::SESSION_COOKIE;

use serde::{Deserialize, Serialize};

/// 当前登录用户，由会话刷新注入请求扩展
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            display_name: claims.display_name,
        }
    }
}
