//! redb-based persistence for cart snapshots
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `maison-cart-storage` | `cart_id` | `CartSnapshot` (JSON) | Snapshot per cart |
//!
//! # Durability
//!
//! redb commits with `Durability::Immediate` by default: a snapshot is
//! persistent as soon as `save` returns, and the file stays consistent
//! across hard restarts. A restarting client therefore gets its cart back
//! exactly as last mutated.

use redb::{Database, ReadableDatabase, TableDefinition};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

use super::CartSnapshot;

/// Fixed namespace carried over from the storefront's persisted cart key
const CARTS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("maison-cart-storage");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Cart snapshot storage backed by redb
#[derive(Clone)]
pub struct CartStorage {
    db: Arc<Database>,
}

impl CartStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;

        // Initialize the table so first load doesn't race first save
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CARTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// In-memory storage (tests)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;

        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CARTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Load the snapshot for a cart, None when the cart was never saved
    pub fn load(&self, cart_id: &str) -> StorageResult<Option<CartSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CARTS_TABLE)?;
        match table.get(cart_id)? {
            Some(bytes) => {
                let snapshot: CartSnapshot = serde_json::from_slice(bytes.value())?;
                Ok(Some(snapshot))
            }
            None => Ok(None),
        }
    }

    /// Persist the snapshot for a cart
    pub fn save(&self, cart_id: &str, snapshot: &CartSnapshot) -> StorageResult<()> {
        let bytes = serde_json::to_vec(snapshot)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CARTS_TABLE)?;
            table.insert(cart_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
