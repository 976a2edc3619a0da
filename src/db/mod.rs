//! Database Module
//!
//! 嵌入式 SurrealDB 存储。菜单、预订、点评、订单、后台用户
//! 都是扁平记录，各自一张表，由 `repository` 提供 CRUD。

pub mod models;
pub mod repository;

use std::path::Path;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "maison";
const DATABASE: &str = "maison";

/// 打开 work_dir 下的嵌入式数据库
pub async fn connect(work_dir: &str) -> Result<Surreal<Db>, AppError> {
    let path = Path::new(work_dir).join("database");
    let db = Surreal::new::<RocksDb>(path)
        .await
        .map_err(|e| AppError::database(format!("Failed to open database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    Ok(db)
}

/// 内存数据库 (测试用)
pub async fn connect_memory() -> Result<Surreal<Db>, AppError> {
    use surrealdb::engine::local::Mem;

    let db = Surreal::new::<Mem>(())
        .await
        .map_err(|e| AppError::database(format!("Failed to open memory database: {}", e)))?;

    db.use_ns(NAMESPACE)
        .use_db(DATABASE)
        .await
        .map_err(|e| AppError::database(format!("Failed to select namespace: {}", e)))?;

    Ok(db)
}

/// 确保后台用户存在
///
/// 首次启动时从 ADMIN_USERNAME / ADMIN_PASSWORD 创建管理员账号。
/// 已有用户或未配置环境变量时不做任何事。
pub async fn ensure_admin_user(db: &Surreal<Db>) -> Result<(), AppError> {
    let repo = repository::AdminUserRepository::new(db.clone());
    if !repo.is_empty().await.map_err(AppError::from)? {
        return Ok(());
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::warn!("No admin user exists and ADMIN_USERNAME/ADMIN_PASSWORD are unset");
        return Ok(());
    };

    repo.create(models::AdminUserCreate {
        username: username.clone(),
        password,
        display_name: None,
    })
    .await
    .map_err(AppError::from)?;

    tracing::info!(username = %username, "Created initial admin user");
    Ok(())
}
