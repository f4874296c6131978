//! Filesystem backend, for development and single-host deployments.

use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Instant;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Writes objects below `root`; URLs are `{base_url}/{key}`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create the root directory if needed.
    pub async fn new(root: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "cannot create upload directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root, base_url })
    }

    /// Filesystem path for `storage_key`. Existing paths are canonicalized so a
    /// symlink cannot point the write outside `root`.
    fn object_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        validate_key(storage_key)?;
        let path = self.root.join(storage_key);

        let root = self.root.canonicalize().map_err(|e| {
            StorageError::ConfigError(format!("cannot resolve upload directory: {}", e))
        })?;
        if let Ok(resolved) = path.canonicalize() {
            if !resolved.starts_with(&root) {
                return Err(StorageError::InvalidKey(format!(
                    "{} resolves outside the upload directory",
                    storage_key
                )));
            }
        }

        Ok(path)
    }

    fn object_url(&self, storage_key: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), storage_key)
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        _content_type: &str,
    ) -> StorageResult<String> {
        let path = self.object_path(storage_key)?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).await?;
        }

        let start = Instant::now();
        let write_failed =
            |e: std::io::Error| StorageError::UploadFailed(format!("{}: {}", path.display(), e));

        let mut file = fs::File::create(&path).await.map_err(write_failed)?;
        file.write_all(&data).await.map_err(write_failed)?;
        file.sync_all().await.map_err(write_failed)?;

        tracing::info!(
            key = %storage_key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Stored object on local disk"
        );

        Ok(self.object_url(storage_key))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(all(test, feature = "storage-local"))]
mod tests {
    use super::*;
    use tempfile::tempdir;

    async fn storage(dir: &std::path::Path) -> LocalStorage {
        LocalStorage::new(dir, "http://localhost:3000/media/".to_string())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_upload_writes_under_root() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        let url = storage
            .upload_with_key("uploads/20240131/test.txt", b"test data".to_vec(), "text/plain")
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:3000/media/uploads/20240131/test.txt");
        assert_eq!(
            std::fs::read(dir.path().join("uploads/20240131/test.txt")).unwrap(),
            b"test data"
        );
        assert_eq!(storage.backend_type(), StorageBackend::Local);
    }

    #[tokio::test]
    async fn test_upload_replaces_existing_object() {
        let dir = tempdir().unwrap();
        let storage = storage(dir.path()).await;

        for body in [&b"first version"[..], b"second"] {
            storage
                .upload_with_key("a/b.txt", body.to_vec(), "text/plain")
                .await
                .unwrap();
        }
        assert_eq!(std::fs::read(dir.path().join("a/b.txt")).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = storage(&dir.path().join("root")).await;

        for key in ["../../../etc/passwd", "../escape.txt", "/etc/passwd", ""] {
            let result = storage.upload_with_key(key, b"x".to_vec(), "text/plain").await;
            assert!(matches!(result, Err(StorageError::InvalidKey(_))), "{:?}", key);
        }
        assert!(!dir.path().join("escape.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_escape_rejected() {
        let dir = tempdir().unwrap();
        let outside = tempdir().unwrap();
        let storage = storage(&dir.path().join("root")).await;

        std::fs::write(outside.path().join("target.txt"), b"keep").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("target.txt"),
            dir.path().join("root/link.txt"),
        )
        .unwrap();

        let result = storage
            .upload_with_key("link.txt", b"overwrite".to_vec(), "text/plain")
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
        assert_eq!(std::fs::read(outside.path().join("target.txt")).unwrap(), b"keep");
    }
}
