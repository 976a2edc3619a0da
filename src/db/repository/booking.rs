//! Booking Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Booking, BookingCreate, BookingStatus};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "booking";

#[derive(Clone)]
pub struct BookingRepository {
    base: BaseRepository,
}

impl BookingRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All bookings, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Booking>> {
        let bookings: Vec<Booking> = self
            .base
            .db()
            .query("SELECT * FROM booking ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(bookings)
    }

    /// Bookings filtered by status, newest first
    pub async fn find_by_status(&self, status: BookingStatus) -> RepoResult<Vec<Booking>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM booking WHERE status = $status ORDER BY created_at DESC")
            .bind(("status", status))
            .await?;
        let bookings: Vec<Booking> = result.take(0)?;
        Ok(bookings)
    }

    /// Find booking by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let rid = parse_record_id(TABLE, id)?;
        let booking: Option<Booking> = self.base.db().select(rid).await?;
        Ok(booking)
    }

    /// Create a new booking; always starts pending
    pub async fn create(&self, data: BookingCreate) -> RepoResult<Booking> {
        let booking = Booking {
            id: None,
            date: data.date,
            time: data.time,
            party_size: data.party_size,
            name: data.name,
            email: data.email,
            phone: data.phone,
            requests: data.requests,
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        let created: Option<Booking> = self.base.db().create(TABLE).content(booking).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create booking".to_string()))
    }

    /// Update booking status (admin)
    pub async fn update_status(&self, id: &str, status: BookingStatus) -> RepoResult<Booking> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))?;

        let rid = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $rid MERGE { status: $status }")
            .bind(("rid", rid))
            .bind(("status", status))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Booking {} not found", id)))
    }

    /// Hard delete a booking
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let deleted: Option<Booking> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}
