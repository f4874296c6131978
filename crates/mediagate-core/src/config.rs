//! Configuration module
//!
//! Environment-driven settings for storage and uploads. Image compression
//! tables live in a separate JSON document, see [`crate::image_config`].

use std::env;

use crate::models::ObjectType;
use crate::storage_types::StorageBackend;

const MAX_SIZE_KB: u64 = 2000;
const ALLOW_FILES: &str = ".gif,.png,.jpg,.jpeg,.bmp";
const OSS_PATH: &str = "uploads";
const SCHEME: &str = "https";
const DOMAIN: &str = "default";

/// How uploads are validated, named and addressed.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadSettings {
    /// Object key prefix; a `YYYYMMDD` folder is appended per upload
    pub oss_path: String,
    pub max_size_kb: u64,
    /// Allowed extensions, lower-case with the leading dot (".jpg")
    pub allow_files: Vec<String>,
    pub object_type: ObjectType,
    /// Scheme of the public URL
    pub scheme: String,
    /// Logical domain name, resolved through the image config `domain` table
    pub domain: String,
    /// Prefix replaced by `source_host` when deriving a video's source URL
    pub host: Option<String>,
    pub source_host: Option<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            oss_path: OSS_PATH.to_string(),
            max_size_kb: MAX_SIZE_KB,
            allow_files: parse_allow_files(ALLOW_FILES),
            object_type: ObjectType::Image,
            scheme: SCHEME.to_string(),
            domain: DOMAIN.to_string(),
            host: None,
            source_host: None,
        }
    }
}

impl UploadSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_kb.saturating_mul(1024)
    }
}

/// Normalize a comma separated extension list to ".ext" form.
pub fn parse_allow_files(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.starts_with('.') {
                s
            } else {
                format!(".{}", s)
            }
        })
        .collect()
}

#[derive(Clone, Debug)]
pub struct MediagateConfig {
    pub environment: String,
    // Storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (OSS, MinIO, ...)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    pub upload: UploadSettings,
    pub image_config_path: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<MediagateConfig>);

impl Config {
    fn inner(&self) -> &MediagateConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable source; `from_env` uses the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let storage_backend = var("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?;

        let max_size_kb = match var("UPLOAD_MAX_SIZE_KB") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|kb| kb.checked_mul(1024).is_some())
                .ok_or_else(|| {
                    anyhow::anyhow!("UPLOAD_MAX_SIZE_KB must be a valid size in KB, got {:?}", raw)
                })?,
            None => MAX_SIZE_KB,
        };

        let object_type = var("UPLOAD_OBJECT_TYPE")
            .map(|s| s.parse::<ObjectType>())
            .transpose()?
            .unwrap_or_default();

        let upload = UploadSettings {
            oss_path: var("UPLOAD_OSS_PATH").unwrap_or_else(|| OSS_PATH.to_string()),
            max_size_kb,
            allow_files: parse_allow_files(
                &var("UPLOAD_ALLOW_FILES").unwrap_or_else(|| ALLOW_FILES.to_string()),
            ),
            object_type,
            scheme: var("UPLOAD_SCHEME").unwrap_or_else(|| SCHEME.to_string()),
            domain: var("UPLOAD_DOMAIN").unwrap_or_else(|| DOMAIN.to_string()),
            host: var("UPLOAD_HOST"),
            source_host: var("UPLOAD_SOURCE_HOST"),
        };

        let config = MediagateConfig {
            environment: var("ENVIRONMENT")
                .or_else(|| var("APP_ENV"))
                .unwrap_or_else(|| "development".to_string()),
            storage_backend,
            s3_bucket: var("S3_BUCKET"),
            s3_region: var("S3_REGION"),
            s3_endpoint: var("S3_ENDPOINT"),
            aws_region: var("AWS_REGION"),
            local_storage_path: var("LOCAL_STORAGE_PATH"),
            local_storage_base_url: var("LOCAL_STORAGE_BASE_URL"),
            upload,
            image_config_path: var("IMAGE_CONFIG_PATH"),
        };

        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        let config = self.inner();

        match config.storage_backend.unwrap_or(StorageBackend::S3) {
            StorageBackend::S3 => {
                if config.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!("S3_BUCKET must be set for s3 storage"));
                }
                if config.s3_region.is_none() && config.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set for s3 storage"
                    ));
                }
            }
            StorageBackend::Local => {
                if config.local_storage_path.is_none() || config.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH and LOCAL_STORAGE_BASE_URL must be set for local storage"
                    ));
                }
            }
        }

        if config.upload.max_size_kb == 0 {
            return Err(anyhow::anyhow!("UPLOAD_MAX_SIZE_KB must be greater than 0"));
        }
        if config.upload.allow_files.is_empty() {
            return Err(anyhow::anyhow!("UPLOAD_ALLOW_FILES must list at least one extension"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.inner().environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn environment(&self) -> &str {
        &self.inner().environment
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.inner().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.inner().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.inner().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.inner().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.inner().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.inner().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.inner().local_storage_base_url.as_deref()
    }

    pub fn upload(&self) -> &UploadSettings {
        &self.inner().upload
    }

    pub fn image_config_path(&self) -> Option<&str> {
        self.inner().image_config_path.as_deref()
    }
}
