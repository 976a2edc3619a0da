use std::path::PathBuf;

use crate::auth::JwtConfig;
use crate::services::EmailConfig;

/// 服务器配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/maison | 工作目录 |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ADMIN_ALLOWED_IPS | (空) | 后台 IP 白名单，逗号分隔；空 = 不限制 |
/// | ENVIRONMENT | development | 运行环境 |
/// | ADMIN_USERNAME / ADMIN_PASSWORD | - | 首次启动时种子管理员账号 |
/// | JWT_SECRET | (随机) | 会话令牌密钥 |
/// | EMAIL_API_URL / EMAIL_API_KEY / EMAIL_FROM | - | 邮件服务商配置 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/maison HTTP_PORT=8080 ADMIN_ALLOWED_IPS=203.0.113.5 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库、购物车快照、图片等文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 后台 IP 白名单原始配置值 (逗号分隔，由门卫解析)
    pub admin_allowed_ips: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 邮件服务配置
    pub email: EmailConfig,
    /// 运行环境: development | staging | production
    pub environment: String,
}

impl Config {
    /// 从环境变量加载配置，未设置项使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/maison".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            admin_allowed_ips: std::env::var("ADMIN_ALLOWED_IPS").unwrap_or_default(),
            jwt: JwtConfig::default(),
            email: EmailConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// 嵌入式数据库目录
    pub fn database_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("database")
    }

    /// 购物车快照文件
    pub fn carts_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("carts.redb")
    }

    /// 上传图片目录
    pub fn images_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("uploads/images")
    }

    /// 确保工作目录结构存在
    pub fn ensure_work_dir_structure(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.database_dir())?;
        std::fs::create_dir_all(self.images_dir())?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
