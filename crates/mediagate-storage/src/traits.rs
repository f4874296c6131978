//! The `Storage` seam between the upload pipeline and object backends.

use crate::StorageBackend;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Destination for uploaded objects.
///
/// Callers choose the key (see [`crate::keys`]); backends only persist bytes.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key` and return the backend's URL for it.
    /// An existing object under the same key is replaced.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    fn backend_type(&self) -> StorageBackend;
}
