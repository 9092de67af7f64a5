use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// Default cap on a stored image, in bytes.
pub const MAX_IMAGE_SIZE: usize = 8 * 1024 * 1024; // 8MB

/// Filesystem store for uploaded listing images.
///
/// Files live flat in one directory; lookups are by bare filename only, so
/// a request can never escape the configured directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
    max_size: usize,
}

impl UploadStore {
    pub async fn new(base_path: PathBuf, max_size: usize) -> std::io::Result<Self> {
        fs::create_dir_all(&base_path).await?;
        info!(path = %base_path.display(), "Upload store initialized");
        Ok(Self {
            base_path,
            max_size,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Store `data` under a sanitized, collision-free filename and return the
    /// path recorded in the database.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> Result<PathBuf, ApiError> {
        if data.is_empty() {
            return Err(ApiError::Validation("Image file is empty".to_string()));
        }
        if data.len() > self.max_size {
            return Err(ApiError::Validation(format!(
                "Image too large (max {}MB)",
                self.max_size / 1024 / 1024
            )));
        }

        let filename = format!("{}-{}", Uuid::new_v4(), sanitize_filename(original_name));
        let path = self.base_path.join(&filename);

        fs::write(&path, data).await?;

        debug!(file = %filename, size = data.len(), "Stored upload");
        Ok(path)
    }

    /// Read a stored file back by bare filename.
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>, ApiError> {
        let safe = checked_filename(filename)?;
        fs::read(self.base_path.join(safe))
            .await
            .map_err(|_| ApiError::NotFound("File not found".to_string()))
    }

    /// Remove a stored file given the path recorded in the database.
    /// Files that are already gone are skipped.
    pub async fn remove(&self, image_path: &str) {
        let Some(name) = Path::new(image_path).file_name() else {
            return;
        };
        match fs::remove_file(self.base_path.join(name)).await {
            Ok(()) => debug!(file = ?name, "Removed upload"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(file = ?name, "Failed to remove upload: {e}"),
        }
    }
}

/// Reduce a client-supplied filename to a safe form: strip any directory
/// part, keep only alphanumerics, `.`, `-` and `_`.
pub fn sanitize_filename(name: &str) -> String {
    let name = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Validate a filename used for lookup: no path separators, no `..`.
fn checked_filename(filename: &str) -> Result<&str, ApiError> {
    if filename.is_empty() || filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(ApiError::Validation("Invalid filename".to_string()));
    }
    Ok(filename)
}
