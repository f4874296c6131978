//! Mediagate Storage Library
//!
//! Storage abstraction for uploaded objects, with an S3-compatible backend
//! (Aliyun OSS, AWS S3, MinIO) and a local filesystem backend.
//!
//! # Storage key format
//!
//! Upload keys are date-partitioned: `{prefix}/{YYYYMMDD}/{filename}`.
//! Keys must not contain `..` or a leading `/`. Key generation lives in the
//! [`keys`] module so all callers stay consistent.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{date_folder, generate_storage_key, storage_folder, validate_key};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
pub use mediagate_core::StorageBackend;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
