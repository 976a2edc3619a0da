//! 预订确认邮件
//!
//! 通过 HTTP 邮件服务商 API 发送，未配置时静默跳过。
//! 邮件发送永远不阻塞请求，也不影响预订写入结果。

use serde::Serialize;
use std::sync::Arc;

use crate::db::models::Booking;

/// 邮件服务配置，所有字段齐全才会真正发信
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from_address: Option<String>,
}

impl EmailConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: std::env::var("EMAIL_API_URL").ok(),
            api_key: std::env::var("EMAIL_API_KEY").ok(),
            from_address: std::env::var("EMAIL_FROM").ok(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OutboundEmail {
    from: String,
    to: String,
    subject: String,
    text: String,
}

/// 邮件服务
#[derive(Debug, Clone)]
pub struct EmailService {
    config: Arc<EmailConfig>,
    client: reqwest::Client,
}

impl EmailService {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
            client: reqwest::Client::new(),
        }
    }

    /// 是否配置齐全
    pub fn is_configured(&self) -> bool {
        self.config.api_url.is_some()
            && self.config.api_key.is_some()
            && self.config.from_address.is_some()
    }

    /// 异步发送预订确认邮件 (fire-and-forget)
    pub fn send_booking_confirmation(&self, booking: &Booking) {
        if !self.is_configured() {
            tracing::debug!("Email service not configured, skipping booking confirmation");
            return;
        }

        let service = self.clone();
        let booking = booking.clone();
        tokio::spawn(async move {
            if let Err(e) = service.deliver_booking_confirmation(&booking).await {
                tracing::warn!(
                    booking = %booking.email,
                    error = %e,
                    "Failed to send booking confirmation email"
                );
            }
        });
    }

    async fn deliver_booking_confirmation(&self, booking: &Booking) -> anyhow::Result<()> {
        // is_configured 已检查过，走到这里字段必然存在
        let (Some(api_url), Some(api_key), Some(from)) = (
            self.config.api_url.as_deref(),
            self.config.api_key.as_deref(),
            self.config.from_address.as_deref(),
        ) else {
            return Ok(());
        };

        let email = OutboundEmail {
            from: from.to_string(),
            to: booking.email.clone(),
            subject: format!("Booking received for {}", booking.date),
            text: format!(
                "Hello {},\n\nWe have received your booking request for {} guests on {} at {}. \
                 We will confirm it shortly.\n\nÀ bientôt!",
                booking.name, booking.party_size, booking.date, booking.time
            ),
        };

        let response = self
            .client
            .post(api_url)
            .bearer_auth(api_key)
            .json(&email)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("mail provider returned {}", response.status());
        }

        tracing::info!(to = %booking.email, "Booking confirmation email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unconfigured_service_skips_sending() {
        let service = EmailService::new(EmailConfig {
            api_url: None,
            api_key: None,
            from_address: None,
        });
        assert!(!service.is_configured());
    }

    #[test]
    fn fully_configured_service_is_ready() {
        let service = EmailService::new(EmailConfig {
            api_url: Some("https://mail.example/send".into()),
            api_key: Some("key".into()),
            from_address: Some("maison@example.com".into()),
        });
        assert!(service.is_configured());
    }
}
