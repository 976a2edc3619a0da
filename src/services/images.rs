//! 菜品图片存储
//!
//! 上传的图片统一转成 JPEG (质量 85)，按内容哈希去重：
//! 相同内容的重复上传返回已有文件而不是落盘第二份。
//! 去重索引用符号链接实现，`by_hash/<前2位>/<sha256>` 指向
//! 同目录下的实际文件。

use image::DynamicImage;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::{fs, io};
use uuid::Uuid;

use crate::utils::AppError;

/// 单个文件大小上限 (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// 接受的图片格式
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG 压缩质量 (85% 在观感和体积之间取平衡)
const JPEG_QUALITY: u8 = 85;

/// 存储结果
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredImage {
    pub file_id: String,
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub format: String,
    pub url: String,
    /// 内容哈希命中已有文件时为 true
    pub deduplicated: bool,
}

/// 磁盘图片仓库
#[derive(Debug, Clone)]
pub struct ImageStore {
    images_dir: PathBuf,
}

impl ImageStore {
    /// 打开 (必要时创建) 图片目录
    pub fn open(images_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let images_dir = images_dir.into();
        fs::create_dir_all(&images_dir)?;
        Ok(Self { images_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.images_dir
    }

    /// 校验并存储一张图片，重复内容复用已有文件
    pub fn store(&self, data: &[u8], original_name: &str) -> Result<StoredImage, AppError> {
        if data.is_empty() {
            return Err(AppError::validation("Empty file provided"));
        }

        let ext = PathBuf::from(original_name)
            .extension()
            .and_then(|e| e.to_str().map(|s| s.to_lowercase()))
            .ok_or_else(|| {
                AppError::validation(format!("Invalid file extension for: {original_name}"))
            })?;

        validate_image(data, &ext)?;

        let compressed = compress_to_jpeg(data)?;
        let hash = content_hash(&compressed);

        if let Some(existing) = self.find_by_hash(&hash) {
            tracing::info!(
                original_name = %original_name,
                existing_file = %existing,
                "Duplicate image detected, returning existing file"
            );
            let file_id = existing
                .strip_suffix(".jpg")
                .map(|s| s.to_string())
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            return Ok(StoredImage {
                url: format!("/images/{existing}"),
                file_id,
                filename: existing,
                original_name: original_name.to_string(),
                size: compressed.len(),
                format: "jpg".to_string(),
                deduplicated: true,
            });
        }

        let file_id = Uuid::new_v4().to_string();
        let filename = format!("{file_id}.jpg");
        let file_path = self.images_dir.join(&filename);

        fs::write(&file_path, &compressed)
            .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;
        self.create_hash_symlink(&hash, &filename)?;

        tracing::info!(
            original_name = %original_name,
            size = %compressed.len(),
            hash = %hash,
            "Image stored"
        );

        Ok(StoredImage {
            url: format!("/images/{filename}"),
            file_id,
            filename,
            original_name: original_name.to_string(),
            size: compressed.len(),
            format: "jpg".to_string(),
            deduplicated: false,
        })
    }

    /// 删除一张已存储的图片，文件名里带路径分隔符一律拒绝
    pub fn delete(&self, filename: &str) -> Result<(), AppError> {
        if filename.contains('/') || filename.contains('\\') || filename.contains("..") {
            return Err(AppError::validation("Invalid filename"));
        }

        let path = self.images_dir.join(filename);
        if !path.exists() {
            return Err(AppError::not_found(format!("Image not found: {filename}")));
        }

        fs::remove_file(&path)
            .map_err(|e| AppError::internal(format!("Failed to delete file: {e}")))?;

        // 对应的哈希链接变成悬空链接，留给下次上传同内容时覆盖

        tracing::info!(filename = %filename, "Image deleted");
        Ok(())
    }

    fn find_by_hash(&self, hash: &str) -> Option<String> {
        let prefix = &hash[..2];
        let hash_path = self.images_dir.join("by_hash").join(prefix).join(hash);
        if !hash_path.exists() {
            return None;
        }
        let target = fs::read_link(&hash_path).ok()?;
        let filename = target.file_name()?.to_string_lossy().to_string();
        // 链接目标被删除后留下的悬空链接视为未命中
        self.images_dir.join(&filename).exists().then_some(filename)
    }

    fn create_hash_symlink(&self, hash: &str, filename: &str) -> Result<(), AppError> {
        let prefix = &hash[..2];
        let hash_subdir = self.images_dir.join("by_hash").join(prefix);
        fs::create_dir_all(&hash_subdir)
            .map_err(|e| AppError::internal(format!("Failed to create hash dir: {e}")))?;

        let hash_path = hash_subdir.join(hash);
        if hash_path.exists() {
            let _ = fs::remove_file(&hash_path);
        }
        let target = PathBuf::from("../../").join(filename);
        symlink::symlink_auto(&target, &hash_path)
            .map_err(|e| AppError::internal(format!("Failed to create symlink: {e}")))?;
        Ok(())
    }
}

fn content_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img: DynamicImage = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    }
    Ok(buffer)
}

fn validate_image(data: &[u8], ext: &str) -> Result<(), AppError> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    if !SUPPORTED_FORMATS.contains(&ext) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image file ({ext}): {e}")))?;

    Ok(())
}
