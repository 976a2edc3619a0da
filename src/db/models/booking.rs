//! Booking Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Booking ID type
pub type BookingId = RecordId;

/// 预订状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

/// Booking model matching the `booking` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<BookingId>,
    /// Reservation date, "YYYY-MM-DD"
    pub date: String,
    /// Reservation time slot, "HH:MM"
    pub time: String,
    pub party_size: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub requests: Option<String>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Create booking payload (public form)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub date: String,
    pub time: String,
    pub party_size: u32,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub requests: Option<String>,
}
