//! 菜单 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{MenuItem, MenuItemCreate, MenuItemUpdate};
use crate::db::repository::menu_item::MenuItemRepository;
use crate::realtime::ChangeAction;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_optional_text,
    validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE: &str = "menu_item";

/// GET /api/menu - 在售菜品
pub async fn list_available(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    Ok(Json(repo.find_available().await?))
}

/// GET /api/menu/featured - 招牌菜
pub async fn list_featured(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    Ok(Json(repo.find_featured().await?))
}

/// GET /api/menu/{id} - 单个菜品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<MenuItem>> {
    let repo = MenuItemRepository::new(state.get_db());
    let item = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Menu item {id} not found")))?;
    Ok(Json(item))
}

/// GET /admin/api/menu - 全部菜品 (含下架)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<MenuItem>>> {
    let repo = MenuItemRepository::new(state.get_db());
    Ok(Json(repo.find_all().await?))
}

fn validate_create(payload: &MenuItemCreate) -> Result<(), AppError> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price, "price")?;
    validate_required_text(&payload.category, "category", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

fn validate_update(payload: &MenuItemUpdate) -> Result<(), AppError> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    if let Some(category) = &payload.category {
        validate_required_text(category, "category", MAX_SHORT_TEXT_LEN)?;
    }
    validate_optional_text(&payload.image, "image", MAX_URL_LEN)?;
    Ok(())
}

/// POST /admin/api/menu - 新建菜品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MenuItemCreate>,
) -> AppResult<Json<MenuItem>> {
    validate_create(&payload)?;

    let repo = MenuItemRepository::new(state.get_db());
    let item = repo.create(payload).await?;

    let id = item.id.as_ref().map(|i| i.to_string()).unwrap_or_default();
    state.broadcast_change(RESOURCE, ChangeAction::Created, &id, Some(&item));

    Ok(Json(item))
}

/// PUT /admin/api/menu/{id} - 更新菜品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MenuItemUpdate>,
) -> AppResult<Json<MenuItem>> {
    validate_update(&payload)?;

    let repo = MenuItemRepository::new(state.get_db());

    // 换图时旧图从磁盘清掉
    let previous = repo.find_by_id(&id).await?;
    let item = repo.update(&id, payload).await?;

    if let Some(prev) = previous
        && let Some(old_image) = prev.image.as_deref()
        && item.image.as_deref() != Some(old_image)
        && let Some(filename) = old_image.strip_prefix("/images/")
        && let Err(e) = state.images.delete(filename)
    {
        tracing::warn!(image = %old_image, error = %e, "Failed to remove replaced image");
    }

    state.broadcast_change(RESOURCE, ChangeAction::Updated, &id, Some(&item));

    Ok(Json(item))
}

/// DELETE /admin/api/menu/{id} - 删除菜品
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = MenuItemRepository::new(state.get_db());

    let existing = repo.find_by_id(&id).await?;
    let removed = repo.delete(&id).await?;

    if removed {
        if let Some(item) = existing
            && let Some(image) = item.image.as_deref()
            && let Some(filename) = image.strip_prefix("/images/")
            && let Err(e) = state.images.delete(filename)
        {
            tracing::warn!(image = %image, error = %e, "Failed to remove image of deleted item");
        }

        state.broadcast_change::<()>(RESOURCE, ChangeAction::Deleted, &id, None);
    }

    Ok(Json(removed))
}
