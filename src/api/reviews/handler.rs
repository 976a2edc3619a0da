//! 评论 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Review, ReviewCreate, ReviewStatus};
use crate::db::repository::review::ReviewRepository;
use crate::realtime::ChangeAction;
use crate::utils::validation::{FieldReport, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN};
use crate::utils::{AppResult, SubmitResult};

const RESOURCE: &str = "review";

fn validate(payload: &ReviewCreate) -> Result<(), Vec<crate::utils::FieldError>> {
    let mut report = FieldReport::new();

    report.require("name", &payload.name, "Name is required", MAX_SHORT_TEXT_LEN);

    if !(1..=5).contains(&payload.rating) {
        report.push("rating", "Rating must be between 1 and 5");
    }

    if let Some(comment) = payload.comment.as_deref()
        && comment.len() > MAX_NOTE_LEN
    {
        report.push("comment", "Comment is too long");
    }

    report.finish()
}

/// GET /api/reviews - 已通过审核的评论
pub async fn list_approved(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    let repo = ReviewRepository::new(state.get_db());
    Ok(Json(repo.find_approved().await?))
}

/// POST /api/reviews - 提交评论 (进入待审队列，不会立即可见)
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<ReviewCreate>,
) -> AppResult<Json<SubmitResult>> {
    if let Err(errors) = validate(&payload) {
        return Ok(Json(SubmitResult::invalid(errors)));
    }

    let repo = ReviewRepository::new(state.get_db());
    let review = repo.create(payload).await?;

    let id = review.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    state.broadcast_change(RESOURCE, ChangeAction::Created, &id, Some(&review));

    tracing::info!(review = %id, rating = review.rating, "Review submitted for moderation");

    Ok(Json(SubmitResult::success(id)))
}

/// GET /admin/api/reviews - 全部评论
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Review>>> {
    let repo = ReviewRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: ReviewStatus,
}

/// PUT /admin/api/reviews/{id}/status - 审核评论
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Review>> {
    let repo = ReviewRepository::new(state.get_db());
    let review = repo.update_status(&id, payload.status).await?;

    state.broadcast_change(RESOURCE, ChangeAction::Updated, &id, Some(&review));

    Ok(Json(review))
}

/// DELETE /admin/api/reviews/{id} - 删除评论
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ReviewRepository::new(state.get_db());
    let removed = repo.delete(&id).await?;

    if removed {
        state.broadcast_change::<()>(RESOURCE, ChangeAction::Deleted, &id, None);
    }

    Ok(Json(removed))
}
