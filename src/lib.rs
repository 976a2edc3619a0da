//! Maison Server - 餐厅网站后端服务
//!
//! # 架构概述
//!
//! 本模块是 Maison 餐厅站点的后端入口，提供以下核心功能：
//!
//! - **购物车** (`cart`): 行项目状态容器 + redb 快照持久化
//! - **请求门卫** (`gate`): 管理后台 IP 白名单 + 会话刷新
//! - **数据库** (`db`): 嵌入式 SurrealDB 存储
//! - **认证** (`auth`): JWT 会话 Cookie + Argon2 认证
//! - **实时变更** (`realtime`): 表级变更事件广播 (SSE)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! src/
//! ├── core/          # 配置、状态、服务器
//! ├── cart/          # 购物车存储
//! ├── gate/          # 请求门卫 (IP 白名单 + 会话)
//! ├── auth/          # JWT 会话认证
//! ├── db/            # 数据库层 (模型 + 仓储)
//! ├── realtime/      # 变更事件广播
//! ├── services/      # 图片存储、邮件
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod core;
pub mod db;
pub mod gate;
pub mod realtime;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use cart::{CartManager, CartStore};
pub use core::{Config, Server, ServerState};
pub use realtime::{ChangeEvent, ChangeFeed};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    __  ___      _
   /  |/  /___ _(_)________  ____
  / /|_/ / __ `/ / ___/ __ \/ __ \
 / /  / / /_/ / (__  ) /_/ / / / /
/_/  /_/\__,_/_/____/\____/_/ /_/
    "#
    );
}

/// 设置运行环境 (dotenv + 日志)
///
/// 在 main 的最开头调用一次
pub fn setup_environment() -> anyhow::Result<()> {
    // .env 不存在时静默忽略
    let _ = dotenv::dotenv();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}
