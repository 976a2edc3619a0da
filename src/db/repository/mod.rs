//! Repository Module
//!
//! Provides CRUD operations for SurrealDB tables.

pub mod admin_user;
pub mod booking;
pub mod menu_item;
pub mod order;
pub mod review;

// Re-exports
pub use admin_user::AdminUserRepository;
pub use booking::BookingRepository;
pub use menu_item::MenuItemRepository;
pub use order::OrderRepository;
pub use review::ReviewRepository;

use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: 全栈统一使用 "table:id" 格式
// =============================================================================
//
// API 层收到的 ID 可能带表前缀 ("booking:abc") 也可能是纯 ID ("abc")，
// parse_record_id 两种都接受，内部一律转成 RecordId。

/// Parse an incoming id into a RecordId for the given table
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    if id.contains(':') {
        let rid: RecordId = id
            .parse()
            .map_err(|_| RepoError::Validation(format!("Invalid ID: {}", id)))?;
        if rid.table() != table {
            return Err(RepoError::Validation(format!(
                "ID {} does not belong to table {}",
                id, table
            )));
        }
        Ok(rid)
    } else {
        Ok(RecordId::from_table_key(table, id))
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_record_id_accepts_both_forms() {
        let full = parse_record_id("booking", "booking:abc123").unwrap();
        let bare = parse_record_id("booking", "abc123").unwrap();
        assert_eq!(full, bare);
    }

    #[test]
    fn parse_record_id_rejects_wrong_table() {
        assert!(parse_record_id("booking", "review:abc123").is_err());
    }
}
