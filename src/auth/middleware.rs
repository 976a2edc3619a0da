//! 后台 API 访问控制中间件

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::CurrentUser;
use crate::security_log;
use crate::utils::AppError;

/// 要求请求已携带有效管理员会话，否则返回 401
pub async fn require_admin(req: Request, next: Next) -> Response {
    if req.extensions().get::<CurrentUser>().is_none() {
        security_log!(
            "WARN",
            "admin_api_unauthorized",
            path = req.uri().path(),
            method = req.method().as_str()
        );
        return AppError::unauthorized().into_response();
    }

    next.run(req).await
}
