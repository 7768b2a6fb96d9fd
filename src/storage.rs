//! Ephemeral on-disk storage for uploaded images.

use crate::error::AppError;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadStore {
    base_path: PathBuf,
}

/// A saved upload. The file is deleted when this is dropped, including when
/// the request future is cancelled mid-flight.
#[derive(Debug)]
pub struct SavedUpload {
    path: PathBuf,
}

impl SavedUpload {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SavedUpload {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove upload")
            }
        }
    }
}

impl UploadStore {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path).await?;
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Write the upload to disk. It lives as long as the returned guard.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> Result<SavedUpload, AppError> {
        let key = format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(file_name));
        let upload = SavedUpload {
            path: self.base_path.join(key),
        };
        fs::write(upload.path(), data).await?;
        tracing::debug!(path = %upload.path().display(), bytes = data.len(), "Saved upload");
        Ok(upload)
    }

    pub async fn read(&self, path: &Path) -> Result<Vec<u8>, AppError> {
        Ok(fs::read(path).await?)
    }
}

/// Reduce a client-supplied name to a single safe path component.
pub fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");

    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
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
