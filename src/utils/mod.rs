//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型
//! - [`AppResponse`] - API 响应结构
//! - 日志、校验等工具

pub mod error;
pub mod logger;
pub mod result;
pub mod validation;

pub use error::{AppError, AppResponse, ok};
pub use result::AppResult;
pub use validation::FieldError;

/// 表单提交结果
///
/// 公共表单接口 (预订、点评、下单) 的统一响应形状。
/// 校验失败时携带逐字段错误信息，成功时携带生成的记录 ID。
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SubmitResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<Vec<FieldError>>,
}

impl SubmitResult {
    /// 创建成功响应
    pub fn success(id: impl Into<String>) -> Self {
        Self {
            success: true,
            id: Some(id.into()),
            error: None,
            field_errors: None,
        }
    }

    /// 创建错误响应
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(message.into()),
            field_errors: None,
        }
    }

    /// 创建字段校验失败响应
    pub fn invalid(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some("Validation failed".to_string()),
            field_errors: Some(errors),
        }
    }
}
