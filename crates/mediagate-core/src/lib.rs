//! Mediagate Core Library
//!
//! This crate provides configuration, error types, shared upload models and the
//! image compression URL helper used across all Mediagate components.

pub mod compress;
pub mod config;
pub mod error;
pub mod image_config;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use compress::{CompressOptions, CompressService, ImageCompressor};
pub use config::{Config, UploadSettings};
pub use error::{AppError, CompressError, ConfigurationError, ErrorMetadata, LogLevel};
pub use image_config::{HostRule, ImageConfig, SettingTable};
pub use models::{FileInfo, ImageInfo, ObjectType, UploadState};
pub use storage_types::StorageBackend;
