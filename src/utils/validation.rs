//! Input validation helpers
//!
//! Centralized text length constants plus per-field validation for the
//! public form endpoints (booking, review, checkout). Field validation runs
//! before any repository call, so an invalid form never reaches the database.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: menu item, customer name, etc.
pub const MAX_NAME_LEN: usize = 200;

/// Notes, descriptions, special requests, review comments
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers, time slots
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Online bookings cap out at 20 guests; larger parties go through the phone
pub const MAX_PARTY_SIZE: u32 = 20;

// ── Single-field helpers (CRUD handlers) ────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a price is non-negative.
pub fn validate_price(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() {
        return Err(AppError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

// ── Per-field form validation ───────────────────────────────────────

/// 单个字段的校验错误，直接渲染在表单对应字段旁
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 逐字段收集校验错误的小工具
#[derive(Debug, Default)]
pub struct FieldReport {
    errors: Vec<FieldError>,
}

impl FieldReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    /// 必填文本：为空即报错，超长也报错
    pub fn require(&mut self, field: &str, value: &str, message: &str, max_len: usize) {
        if value.trim().is_empty() {
            self.push(field, message);
        } else if value.len() > max_len {
            self.push(field, format!("{field} is too long (max {max_len} chars)"));
        }
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

/// 极简邮箱形状检查: local@domain.tld
///
/// 不追求 RFC 完备，只挡住明显的手误；真正的投递失败由邮件服务反馈。
pub fn is_plausible_email(value: &str) -> bool {
    if value.len() > MAX_EMAIL_LEN {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_blank_and_overlong() {
        assert!(validate_required_text("  ", "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN).is_err());
        assert!(validate_required_text("Tartare de boeuf", "name", MAX_NAME_LEN).is_ok());
    }

    #[test]
    fn optional_text_allows_absent() {
        assert!(validate_optional_text(&None, "requests", MAX_NOTE_LEN).is_ok());
        assert!(validate_optional_text(&Some("window seat".into()), "requests", MAX_NOTE_LEN).is_ok());
        assert!(
            validate_optional_text(&Some("x".repeat(MAX_NOTE_LEN + 1)), "requests", MAX_NOTE_LEN)
                .is_err()
        );
    }

    #[test]
    fn email_shape() {
        assert!(is_plausible_email("guest@example.com"));
        assert!(!is_plausible_email("guest"));
        assert!(!is_plausible_email("guest@nodot"));
        assert!(!is_plausible_email("@example.com"));
    }

    #[test]
    fn field_report_collects_all_errors() {
        let mut report = FieldReport::new();
        report.require("name", "", "Name is required", MAX_NAME_LEN);
        report.require("phone", "  ", "Phone number is required", MAX_SHORT_TEXT_LEN);
        let errors = report.finish().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "name");
        assert_eq!(errors[1].field, "phone");
    }
}
