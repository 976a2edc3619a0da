//! 订座 API 处理器

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{Booking, BookingCreate, BookingStatus};
use crate::db::repository::booking::BookingRepository;
use crate::realtime::ChangeAction;
use crate::utils::validation::{FieldReport, MAX_NOTE_LEN, MAX_PARTY_SIZE, is_plausible_email};
use crate::utils::{AppResult, SubmitResult};

const RESOURCE: &str = "booking";

/// 公共表单的字段校验，所有错误一次性收集返回
fn validate(payload: &BookingCreate) -> Result<(), Vec<crate::utils::FieldError>> {
    let mut report = FieldReport::new();

    report.require("name", &payload.name, "Name is required", 200);
    report.require("phone", &payload.phone, "Phone is required", 100);

    if !is_plausible_email(&payload.email) {
        report.push("email", "A valid email is required");
    }

    match NaiveDate::parse_from_str(&payload.date, "%Y-%m-%d") {
        Ok(date) if date < Utc::now().date_naive() => {
            report.push("date", "Date cannot be in the past");
        }
        Ok(_) => {}
        Err(_) => report.push("date", "Date must be YYYY-MM-DD"),
    }

    if NaiveTime::parse_from_str(&payload.time, "%H:%M").is_err() {
        report.push("time", "Time must be HH:MM");
    }

    if payload.party_size == 0 || payload.party_size > MAX_PARTY_SIZE {
        report.push(
            "party_size",
            format!("Party size must be between 1 and {MAX_PARTY_SIZE}"),
        );
    }

    if let Some(requests) = payload.requests.as_deref()
        && requests.len() > MAX_NOTE_LEN
    {
        report.push("requests", "Special requests are too long");
    }

    report.finish()
}

/// POST /api/bookings - 提交订座请求
///
/// 校验失败返回 `field_errors`，成功后异步发确认邮件。
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> AppResult<Json<SubmitResult>> {
    if let Err(errors) = validate(&payload) {
        return Ok(Json(SubmitResult::invalid(errors)));
    }

    let repo = BookingRepository::new(state.get_db());
    let booking = repo.create(payload).await?;

    let id = booking
        .id
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_default();

    state.email.send_booking_confirmation(&booking);
    state.broadcast_change(RESOURCE, ChangeAction::Created, &id, Some(&booking));

    tracing::info!(booking = %id, party_size = booking.party_size, "Booking received");

    Ok(Json(SubmitResult::success(id)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<BookingStatus>,
}

/// GET /admin/api/bookings - 订座列表，可按状态过滤
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Booking>>> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = match query.status {
        Some(status) => repo.find_by_status(status).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(bookings))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: BookingStatus,
}

/// PUT /admin/api/bookings/{id}/status - 确认或取消订座
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<Booking>> {
    let repo = BookingRepository::new(state.get_db());
    let booking = repo.update_status(&id, payload.status).await?;

    state.broadcast_change(RESOURCE, ChangeAction::Updated, &id, Some(&booking));

    Ok(Json(booking))
}

/// DELETE /admin/api/bookings/{id} - 删除订座记录
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = BookingRepository::new(state.get_db());
    let removed = repo.delete(&id).await?;

    if removed {
        state.broadcast_change::<()>(RESOURCE, ChangeAction::Deleted, &id, None);
    }

    Ok(Json(removed))
}
