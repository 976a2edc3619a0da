use std::sync::Arc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::cart::{CartManager, storage::CartStorage};
use crate::core::Config;
use crate::db;
use crate::realtime::{ChangeAction, ChangeFeed};
use crate::services::{EmailService, ImageStore};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc 实现浅拷贝，克隆成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | 嵌入式数据库 (SurrealDB) |
/// | carts | 购物车管理器 (内存 + redb 快照) |
/// | jwt_service | 会话令牌服务 |
/// | images | 图片仓库 |
/// | email | 邮件服务 |
/// | feed | 变更广播器 |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub carts: CartManager,
    pub jwt_service: Arc<JwtService>,
    pub images: ImageStore,
    pub email: EmailService,
    pub feed: Arc<ChangeFeed>,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序：
    /// 1. 工作目录结构
    /// 2. 数据库 (work_dir/database) + 管理员账号种子
    /// 3. 购物车快照存储 (work_dir/carts.redb)
    /// 4. 图片仓库、邮件服务、变更广播器
    pub async fn initialize(config: &Config) -> anyhow::Result<Self> {
        config.ensure_work_dir_structure()?;

        let db = db::connect(&config.work_dir).await?;
        db::ensure_admin_user(&db).await?;

        let cart_storage = CartStorage::open(config.carts_path())?;
        let carts = CartManager::with_storage(cart_storage);

        let images = ImageStore::open(config.images_dir())?;
        let email = EmailService::new(config.email.clone());
        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let feed = Arc::new(ChangeFeed::new());

        Ok(Self {
            config: config.clone(),
            db,
            carts,
            jwt_service,
            images,
            email,
            feed,
        })
    }

    /// 获取数据库实例
    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }


    /// 广播一条资源变更，版本号由 [`ChangeFeed`] 自动递增
    ///
    /// # 参数
    /// - `table`: 表名 (如 "menu_item", "booking")
    /// - `action`: 变更类型
    /// - `id`: 记录 ID
    /// - `data`: 变更后的数据 (deleted 时为 None)
    pub fn broadcast_change<T: serde::Serialize>(
        &self,
        table: &str,
        action: ChangeAction,
        id: &str,
        data: Option<&T>,
    ) {
        let data = data.and_then(|d| serde_json::to_value(d).ok());
        self.feed.publish(table, action, id, data);
    }

    /// 内存后端的测试状态，白名单可指定
    #[cfg(test)]
    pub async fn for_tests_with_allowlist(allowlist: &str) -> Self {
        use crate::auth::JwtConfig;
        use crate::services::EmailConfig;

        let config = Config {
            work_dir: std::env::temp_dir().to_string_lossy().into_owned(),
            http_port: 0,
            admin_allowed_ips: allowlist.to_string(),
            jwt: JwtConfig {
                secret: "maison-test-secret-maison-test-secret".into(),
                expiration_minutes: 60,
                issuer: "maison-server".into(),
                audience: "maison-admin".into(),
            },
            email: EmailConfig {
                api_url: None,
                api_key: None,
                from_address: None,
            },
            environment: "test".into(),
        };

        let db = db::connect_memory().await.expect("in-memory db");
        let cart_storage = CartStorage::open_in_memory().expect("in-memory cart storage");

        Self {
            config: config.clone(),
            db,
            carts: CartManager::with_storage(cart_storage),
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            images: ImageStore::open(
                tempfile::tempdir()
                    .expect("temp image dir")
                    .keep(),
            )
            .expect("image store"),
            email: EmailService::new(config.email.clone()),
            feed: Arc::new(ChangeFeed::new()),
        }
    }

    /// 默认测试状态 (无白名单)
    #[cfg(test)]
    pub async fn for_tests() -> Self {
        Self::for_tests_with_allowlist("").await
    }
}
