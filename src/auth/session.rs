//! 会话刷新 - 门卫的第二层
//!
//! 每个请求检查会话 Cookie：有效则注入 [`CurrentUser`] 并在接近
//! 过期时滚动续签；无效或缺失时，后台**页面**请求被重定向到
//! /login，后台 API 请求留给 [`super::middleware::require_admin`]
//! 返回 401，其余请求按匿名放行。

use axum::{
    extract::Request,
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use super::CurrentUser;
use super::jwt::JwtError;
use crate::core::ServerState;
use crate::gate::ADMIN_PREFIX;

/// 会话 Cookie 名
pub const SESSION_COOKIE: &str = "maison_session";

/// 后台 API 子树，401 由 require_admin 负责而不是重定向
const ADMIN_API_PREFIX: &str = "/admin/api";

/// 从 Cookie 头中取出指定 Cookie 的值
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then_some(value)
    })
}

/// 会话刷新中间件体，由 [`crate::gate::request_gate`] 调用
pub async fn refresh_session(state: &ServerState, mut req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();

    let session = cookie_value(req.headers(), SESSION_COOKIE)
        .map(|token| state.jwt_service.validate_token(token));

    let refresh_cookie = match session {
        Some(Ok(claims)) => {
            let needs_refresh = state.jwt_service.needs_refresh(&claims);
            let user = CurrentUser::from(claims);
            let cookie = needs_refresh
                .then(|| state.jwt_service.session_cookie(&user).ok())
                .flatten();
            req.extensions_mut().insert(user);
            cookie
        }
        Some(Err(err)) => {
            if matches!(err, JwtError::ExpiredToken) {
                tracing::debug!(path = %path, "Session token expired");
            } else {
                tracing::debug!(path = %path, error = %err, "Invalid session token");
            }
            None
        }
        None => None,
    };

    // 未登录的后台页面请求在进入 handler 前就被转去登录页
    if req.extensions().get::<CurrentUser>().is_none()
        && path.starts_with(ADMIN_PREFIX)
        && !path.starts_with(ADMIN_API_PREFIX)
    {
        return Redirect::temporary("/login").into_response();
    }

    let mut response = next.run(req).await;

    if let Some(cookie) = refresh_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn cookie_value_picks_the_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; maison_session=abc.def.ghi; lang=en"),
        );
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_value_is_none_when_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("theme=dark"));
        assert_eq!(cookie_value(&headers, SESSION_COOKIE), None);
        assert_eq!(cookie_value(&HeaderMap::new(), SESSION_COOKIE), None);
    }
}
