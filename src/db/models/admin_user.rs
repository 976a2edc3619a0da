//! Admin User Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Admin user ID type
pub type AdminUserId = RecordId;

/// Back-office user matching the `admin_user` table
///
/// Never serialized into API responses; handlers expose
/// [`crate::auth::CurrentUser`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<AdminUserId>,
    pub username: String,
    pub display_name: String,
    pub password_hash: String,
    #[serde(
        default = "default_true",
        deserialize_with = "serde_helpers::bool_true"
    )]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Create admin user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserCreate {
    pub username: String,
    pub password: String,
    pub display_name: Option<String>,
}

impl AdminUser {
    /// Verify password using argon2
    pub fn verify_password(&self, password: &str) -> Result<bool, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHash, PasswordVerifier},
        };

        let parsed_hash = PasswordHash::new(&self.password_hash)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Hash password using argon2
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        use argon2::{
            Argon2,
            password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
        };

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }
}
