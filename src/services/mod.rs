//! 外围服务 - 图片存储与邮件通知

pub mod email;
pub mod images;

pub use email::{EmailConfig, EmailService};
pub use images::{ImageStore, StoredImage};
