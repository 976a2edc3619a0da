//! 登录 / 登出 / 会话查询处理器

use std::time::Duration;

use axum::{
    Json,
    extract::{Extension, State},
    http::header,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::admin_user::AdminUserRepository;
use crate::security_log;
use crate::utils::{AppError, ok, validation};

/// 固定认证延迟，抹平用户存在与否的响应时间差
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: CurrentUser,
}

/// POST /api/auth/login - 校验凭证并下发会话 Cookie
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    if req.username.trim().is_empty()
        || req.username.len() > validation::MAX_SHORT_TEXT_LEN
        || req.password.is_empty()
        || req.password.len() > validation::MAX_PASSWORD_LEN
    {
        return Err(AppError::invalid_credentials());
    }

    let repo = AdminUserRepository::new(state.get_db());
    let user = repo.find_by_username(req.username.trim()).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    // 统一错误信息，避免用户名枚举
    let user = match user {
        Some(u) if u.is_active => u,
        Some(_) => {
            security_log!("WARN", "login_disabled_account", username = req.username.as_str());
            return Err(AppError::invalid_credentials());
        }
        None => {
            security_log!("WARN", "login_unknown_user", username = req.username.as_str());
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        security_log!("WARN", "login_bad_password", username = user.username.as_str());
        return Err(AppError::invalid_credentials());
    }

    let current = CurrentUser {
        id: user
            .id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default(),
        username: user.username.clone(),
        display_name: user.display_name.clone(),
    };

    let cookie = state
        .jwt_service
        .session_cookie(&current)
        .map_err(|e| AppError::internal(format!("Failed to issue session: {e}")))?;

    security_log!("INFO", "login_success", username = current.username.as_str());
    tracing::info!(username = %current.username, "Admin logged in");

    let mut response = ok(LoginResponse { user: current }).into_response();
    response.headers_mut().append(header::SET_COOKIE, cookie);
    Ok(response)
}

/// POST /api/auth/logout - 清除会话 Cookie
pub async fn logout(State(state): State<ServerState>) -> Response {
    let mut response = ok(()).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, state.jwt_service.clear_cookie());
    response
}

/// GET /api/auth/me - 当前会话用户，未登录返回 401
pub async fn me(user: Option<Extension<CurrentUser>>) -> Result<Response, AppError> {
    match user {
        Some(Extension(user)) => Ok(ok(user).into_response()),
        None => Err(AppError::unauthorized()),
    }
}
