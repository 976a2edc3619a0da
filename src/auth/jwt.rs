//! JWT 令牌服务
//!
//! 处理会话令牌的生成、验证和 Cookie 组装。

use axum::http::HeaderValue;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CurrentUser;
use super::session::SESSION_COOKIE;

/// JWT 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            // 未配置时生成一次性随机密钥：重启后所有会话失效
            tracing::warn!("JWT_SECRET is not set, generating an ephemeral key");
            generate_secret()
        });

        Self {
            secret,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "maison-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "maison-admin".to_string()),
        }
    }
}

/// 生成随机密钥 (hex 编码，保证可打印)
fn generate_secret() -> String {
    let rng = SystemRandom::new();
    let mut key = [0u8; 32]; // 256-bit key
    if rng.fill(&mut key).is_err() {
        // 系统熵源不可用时退回固定开发密钥
        tracing::error!("system RNG unavailable, falling back to the development key");
        return "MaisonServerDevelopmentSecureKey2026!".to_string();
    }
    hex::encode(key)
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 显示名
    pub display_name: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT 会话服务
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// 为登录用户签发会话令牌
    pub fn generate_token(&self, user: &CurrentUser) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id.clone(),
            username: user.username.clone(),
            display_name: user.display_name.clone(),
            exp: (now + Duration::minutes(self.config.expiration_minutes)).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证令牌并返回 Claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            _ => JwtError::InvalidToken(e.to_string()),
        })
    }

    /// 令牌是否进入刷新窗口 (剩余寿命不足一半)
    pub fn needs_refresh(&self, claims: &Claims) -> bool {
        let remaining = claims.exp - Utc::now().timestamp();
        remaining < (self.config.expiration_minutes * 60) / 2
    }

    /// 组装会话 Set-Cookie 头
    pub fn session_cookie(&self, user: &CurrentUser) -> Result<HeaderValue, JwtError> {
        let token = self.generate_token(user)?;
        let max_age = self.config.expiration_minutes * 60;
        let cookie = format!(
            "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}"
        );
        HeaderValue::from_str(&cookie).map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 登出用的清除 Cookie 头
    pub fn clear_cookie(&self) -> HeaderValue {
        HeaderValue::from_static("maison_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(expiration_minutes: i64) -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-test-secret-test-secret".into(),
            expiration_minutes,
            issuer: "maison-server".into(),
            audience: "maison-admin".into(),
        })
    }

    fn user() -> CurrentUser {
        CurrentUser {
            id: "admin_user:abc".into(),
            username: "chef".into(),
            display_name: "Chef".into(),
        }
    }

    #[test]
    fn roundtrip_token() {
        let svc = service(60);
        let token = svc.generate_token(&user()).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert_eq!(claims.username, "chef");
        assert_eq!(claims.sub, "admin_user:abc");
    }

    #[test]
    fn tampered_token_is_rejected() {
        let svc = service(60);
        let mut token = svc.generate_token(&user()).unwrap();
        token.push('x');
        assert!(matches!(
            svc.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = service(60).generate_token(&user()).unwrap();
        let other = JwtService::new(JwtConfig {
            secret: "another-secret-another-secret-xx".into(),
            expiration_minutes: 60,
            issuer: "maison-server".into(),
            audience: "maison-admin".into(),
        });
        assert!(other.validate_token(&token).is_err());
    }

    #[test]
    fn fresh_token_does_not_need_refresh() {
        let svc = service(60);
        let token = svc.generate_token(&user()).unwrap();
        let claims = svc.validate_token(&token).unwrap();
        assert!(!svc.needs_refresh(&claims));
    }

    #[test]
    fn session_cookie_carries_token_and_attributes() {
        let svc = service(60);
        let cookie = svc.session_cookie(&user()).unwrap();
        let value = cookie.to_str().unwrap();
        assert!(value.starts_with("maison_session="));
        assert!(value.contains("HttpOnly"));
        assert!(value.contains("Max-Age=3600"));
    }
}
