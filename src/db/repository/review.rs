//! Review Repository

use super::{BaseRepository, RepoError, RepoResult, parse_record_id};
use crate::db::models::{Review, ReviewCreate, ReviewStatus};
use chrono::Utc;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

/// How many approved reviews the homepage shows
const APPROVED_LIMIT: usize = 6;

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All reviews, newest first (admin listing)
    pub async fn find_all(&self) -> RepoResult<Vec<Review>> {
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review ORDER BY created_at DESC")
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Approved reviews for the public site, newest first, capped
    pub async fn find_approved(&self) -> RepoResult<Vec<Review>> {
        let approved_limit = APPROVED_LIMIT;
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM review WHERE status = $status ORDER BY created_at DESC LIMIT $limit")
            .bind(("status", ReviewStatus::Approved))
            .bind(("limit", approved_limit))
            .await?;
        let reviews: Vec<Review> = result.take(0)?;
        Ok(reviews)
    }

    /// Find review by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Review>> {
        let rid = parse_record_id(TABLE, id)?;
        let review: Option<Review> = self.base.db().select(rid).await?;
        Ok(review)
    }

    /// Create a review; status is forced to pending regardless of input
    pub async fn create(&self, data: ReviewCreate) -> RepoResult<Review> {
        if !(1..=5).contains(&data.rating) {
            return Err(RepoError::Validation(
                "Rating must be between 1 and 5".to_string(),
            ));
        }

        let review = Review {
            id: None,
            name: data.name,
            rating: data.rating,
            comment: data.comment,
            status: ReviewStatus::Pending,
            created_at: Utc::now(),
        };

        let created: Option<Review> = self.base.db().create(TABLE).content(review).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }

    /// Moderate a review (admin): approve or reject
    pub async fn update_status(&self, id: &str, status: ReviewStatus) -> RepoResult<Review> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))?;

        let rid = parse_record_id(TABLE, id)?;
        self.base
            .db()
            .query("UPDATE $rid MERGE { status: $status }")
            .bind(("rid", rid))
            .bind(("status", status))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Review {} not found", id)))
    }

    /// Hard delete a review
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let rid = parse_record_id(TABLE, id)?;
        let deleted: Option<Review> = self.base.db().delete(rid).await?;
        Ok(deleted.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;

    fn sample(rating: u8) -> ReviewCreate {
        ReviewCreate {
            name: "Marc".into(),
            rating,
            comment: Some("Superbe".into()),
        }
    }

    #[tokio::test]
    async fn submissions_are_forced_pending() {
        let db = connect_memory().await.unwrap();
        let repo = ReviewRepository::new(db);

        let created = repo.create(sample(5)).await.unwrap();
        assert_eq!(created.status, ReviewStatus::Pending);
    }

    #[tokio::test]
    async fn rating_out_of_range_is_rejected() {
        let db = connect_memory().await.unwrap();
        let repo = ReviewRepository::new(db);

        assert!(matches!(
            repo.create(sample(0)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
        assert!(matches!(
            repo.create(sample(6)).await.unwrap_err(),
            RepoError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn approved_listing_excludes_pending_and_rejected() {
        let db = connect_memory().await.unwrap();
        let repo = ReviewRepository::new(db);

        let a = repo.create(sample(5)).await.unwrap();
        let b = repo.create(sample(4)).await.unwrap();
        repo.create(sample(3)).await.unwrap();

        let a_id = a.id.unwrap().to_string();
        let b_id = b.id.unwrap().to_string();
        repo.update_status(&a_id, ReviewStatus::Approved).await.unwrap();
        repo.update_status(&b_id, ReviewStatus::Rejected).await.unwrap();

        let approved = repo.find_approved().await.unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].rating, 5);
    }
}
