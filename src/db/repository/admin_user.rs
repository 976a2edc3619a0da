//! Admin User Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{AdminUser, AdminUserCreate};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "admin_user";

#[derive(Clone)]
pub struct AdminUserRepository {
    base: BaseRepository,
}

impl AdminUserRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// True when no admin user exists yet (first boot)
    pub async fn is_empty(&self) -> RepoResult<bool> {
        let mut result = self
            .base
            .db()
            .query("SELECT count() FROM admin_user GROUP ALL")
            .await?;
        let count: Option<i64> = result.take((0, "count"))?;
        Ok(count.unwrap_or(0) == 0)
    }

    /// Find admin user by username
    pub async fn find_by_username(&self, username: &str) -> RepoResult<Option<AdminUser>> {
        let username_owned = username.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM admin_user WHERE username = $username LIMIT 1")
            .bind(("username", username_owned))
            .await?;
        let users: Vec<AdminUser> = result.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new admin user
    pub async fn create(&self, data: AdminUserCreate) -> RepoResult<AdminUser> {
        // Check duplicate username
        if self.find_by_username(&data.username).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Username '{}' already exists",
                data.username
            )));
        }

        let password_hash = AdminUser::hash_password(&data.password)
            .map_err(|e| RepoError::Database(format!("Failed to hash password: {}", e)))?;

        let display_name = data.display_name.unwrap_or_else(|| data.username.clone());

        let user = AdminUser {
            id: None,
            username: data.username,
            display_name,
            password_hash,
            is_active: true,
        };

        let created: Option<AdminUser> = self.base.db().create(TABLE).content(user).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create admin user".to_string()))
    }
}
