//! Shared key generation for uploads.
//!
//! Key format: `{prefix}/{YYYYMMDD}/{filename}`. An empty prefix yields
//! `{YYYYMMDD}/{filename}`.

use chrono::{DateTime, Utc};

use crate::{StorageError, StorageResult};

/// Date folder for `at`, e.g. `20240131`.
pub fn date_folder(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d").to_string()
}

/// Folder that objects uploaded at `at` are stored under: `{prefix}/{YYYYMMDD}`.
pub fn storage_folder(prefix: &str, at: DateTime<Utc>) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        date_folder(at)
    } else {
        format!("{}/{}", prefix, date_folder(at))
    }
}

/// Generate the storage key for `filename` uploaded at `at`.
pub fn generate_storage_key(prefix: &str, at: DateTime<Utc>, filename: &str) -> String {
    format!("{}/{}", storage_folder(prefix, at), filename)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() || storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
