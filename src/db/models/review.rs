//! Review Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

/// Review ID type
pub type ReviewId = RecordId;

/// 点评状态 - 新提交的点评总是 pending，由后台审核
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// Review model matching the `review` table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ReviewId>,
    pub name: String,
    /// 1..=5
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
}

/// Create review payload (public form)
///
/// No status field on purpose: submissions are always created pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewCreate {
    pub name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
}
