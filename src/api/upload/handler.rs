//! 图片上传处理器
//!
//! multipart 里找 `file` 字段，校验、压缩、去重都交给
//! [`crate::services::ImageStore`]。

use axum::{
    Json,
    extract::{Multipart, Path, State},
};

use crate::core::ServerState;
use crate::services::StoredImage;
use crate::utils::{AppError, AppResponse, ok};

/// POST /admin/api/upload - 上传菜品图片
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<AppResponse<StoredImage>>, AppError> {
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_name: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(|s| s.to_string());
        if name.as_deref() == Some("file") || name.as_deref() == Some("") {
            original_name = field.file_name().map(|s| s.to_string());
            field_data = Some(field.bytes().await?.to_vec());
            break;
        }
    }

    let data = field_data.ok_or_else(|| {
        AppError::validation("No 'file' field found. Field name must be 'file'")
    })?;
    let original_name =
        original_name.ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    let stored = state.images.store(&data, &original_name)?;

    Ok(ok(stored))
}

/// DELETE /admin/api/upload/{filename} - 删除图片
pub async fn delete(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> Result<Json<AppResponse<()>>, AppError> {
    state.images.delete(&filename)?;
    Ok(ok(()))
}
