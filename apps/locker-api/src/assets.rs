//! # Photo Store
//!
//! Variant photos live as flat files in the upload directory, named
//! `<variantId>.<ext>`. The database row only holds the file name.
//!
//! ```text
//! upload ──► save("<id>.png") ──► set_photo(id, "<id>.png") ──► release(old)
//! delete ──► DELETE ... RETURNING photo ──────────────────────► release(each)
//! ```
//!
//! Releasing is best effort: a file that cannot be removed is logged and left
//! behind, the database change stands. The shared placeholder is never removed.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{ApiError, ErrorCode};
use locker_core::validation::validate_photo_ref;
use locker_core::{ValidationError, PLACEHOLDER_PHOTO};

/// Errors from the photo directory.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error(transparent)]
    InvalidRef(#[from] ValidationError),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("Asset I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl From<AssetError> for ApiError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::InvalidRef(e) => ApiError::validation(e.to_string()),
            AssetError::NotFound(name) => ApiError::not_found("Asset", &name),
            AssetError::Io(e) => {
                tracing::error!("Asset I/O failed: {}", e);
                ApiError::new(ErrorCode::Internal, "Asset storage failed")
            }
        }
    }
}

/// Flat-file photo directory.
#[derive(Debug, Clone)]
pub struct PhotoStore {
    root: PathBuf,
}

impl PhotoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        PhotoStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the upload directory if missing.
    pub async fn ensure_root(&self) -> Result<(), AssetError> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path_for(&self, photo: &str) -> Result<PathBuf, AssetError> {
        validate_photo_ref(photo)?;
        Ok(self.root.join(photo))
    }

    /// Writes a photo, replacing any file with the same name.
    ///
    /// The bytes go to a temporary name first so a reader never sees half a file.
    pub async fn save(&self, photo: &str, bytes: &[u8]) -> Result<(), AssetError> {
        let path = self.path_for(photo)?;
        let staging = self.root.join(format!(".upload-{}", Uuid::new_v4().simple()));

        tokio::fs::write(&staging, bytes).await?;
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(e.into());
        }

        debug!(photo = %photo, size = bytes.len(), "Photo stored");
        Ok(())
    }

    /// Reads a photo.
    pub async fn read(&self, photo: &str) -> Result<Vec<u8>, AssetError> {
        let path = self.path_for(photo)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AssetError::NotFound(photo.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Removes a photo no row refers to any more.
    pub async fn release(&self, photo: &str) {
        if photo == PLACEHOLDER_PHOTO {
            return;
        }

        let path = match self.path_for(photo) {
            Ok(path) => path,
            Err(e) => {
                warn!(photo = %photo, error = %e, "Refusing to release photo");
                return;
            }
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(photo = %photo, "Photo released"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => warn!(photo = %photo, error = %e, "Failed to release photo"),
        }
    }

    pub async fn release_all(&self, photos: &[String]) {
        for photo in photos {
            self.release(photo).await;
        }
    }

    /// MIME type by extension.
    pub fn content_type(photo: &str) -> &'static str {
        let ext = photo.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            _ => "application/octet-stream",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_read_release() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        store.save("v1.png", b"png-bytes").await.unwrap();
        assert_eq!(store.read("v1.png").await.unwrap(), b"png-bytes");

        store.save("v1.png", b"new").await.unwrap();
        assert_eq!(store.read("v1.png").await.unwrap(), b"new");

        store.release("v1.png").await;
        assert!(matches!(store.read("v1.png").await, Err(AssetError::NotFound(_))));

        // Releasing twice is harmless.
        store.release("v1.png").await;
    }

    #[tokio::test]
    async fn test_placeholder_is_never_released() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path());

        store.save(PLACEHOLDER_PHOTO, b"default").await.unwrap();
        store.release_all(&[PLACEHOLDER_PHOTO.to_string()]).await;

        assert!(store.read(PLACEHOLDER_PHOTO).await.is_ok());
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let store = PhotoStore::new(dir.path().join("uploads"));
        store.ensure_root().await.unwrap();

        assert!(matches!(
            store.read("../secret.jpg").await,
            Err(AssetError::InvalidRef(_))
        ));
        assert!(matches!(
            store.save("a/b.png", b"x").await,
            Err(AssetError::InvalidRef(_))
        ));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(PhotoStore::content_type("a.JPG"), "image/jpeg");
        assert_eq!(PhotoStore::content_type("a.png"), "image/png");
        assert_eq!(PhotoStore::content_type("a"), "application/octet-stream");
    }
}
