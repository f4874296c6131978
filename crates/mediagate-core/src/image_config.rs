//! Image configuration tables
//!
//! Resolution breakpoints, per-tag compression ratios and qualities, the
//! compression service selector, recognized CDN hosts and the logical domain
//! table. Loaded from a JSON document and handed to
//! [`ImageCompressor`](crate::compress::ImageCompressor) as an immutable value.
//!
//! ```json
//! {
//!   "auto_compress_service": "aliyun",
//!   "resolution_setting": { "iphone": [320, 640, 750], "android": [720, 1080] },
//!   "compress_setting": {
//!     "product_single": { "iphone": { "640": 0.5, "default": 0.8 }, "default": { "default": 1 } }
//!   },
//!   "quality_setting": {
//!     "product_single": { "default": { "default": 90 } }
//!   },
//!   "domain": { "default": "static.thefair.net.cn" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Key used for the fallback platform table and the fallback breakpoint entry.
pub const DEFAULT_KEY: &str = "default";

/// platform (or `"default"`) -> breakpoint (or `"default"`) -> value
pub type SettingTable<V> = BTreeMap<String, BTreeMap<String, V>>;

/// Replacement hosts for a recognized public storage host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostRule {
    /// Public image-processing CDN host
    pub public: String,
    /// Internal-network host, used to avoid egress when co-located with storage
    pub internal: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub auto_compress_service: String,
    pub resolution_setting: BTreeMap<String, Vec<u32>>,
    pub compress_setting: BTreeMap<String, SettingTable<f64>>,
    pub quality_setting: BTreeMap<String, SettingTable<u8>>,
    pub hosts: BTreeMap<String, HostRule>,
    pub domain: BTreeMap<String, String>,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            auto_compress_service: "aliyun".to_string(),
            resolution_setting: BTreeMap::new(),
            compress_setting: BTreeMap::new(),
            quality_setting: BTreeMap::new(),
            hosts: default_hosts(),
            domain: BTreeMap::new(),
        }
    }
}

fn default_hosts() -> BTreeMap<String, HostRule> {
    const INTERNAL: &str = "static-thefair-bj.oss-cn-beijing-internal.aliyuncs.com";

    BTreeMap::from([
        (
            "static.bj.taooo.cc".to_string(),
            HostRule {
                public: "image.bj.taooo.cc".to_string(),
                internal: INTERNAL.to_string(),
            },
        ),
        (
            "static.thefair.net.cn".to_string(),
            HostRule {
                public: "image.thefair.net.cn".to_string(),
                internal: INTERNAL.to_string(),
            },
        ),
    ])
}

impl ImageConfig {
    pub fn from_json_str(json: &str) -> Result<Self, anyhow::Error> {
        serde_json::from_str(json).context("Invalid image configuration JSON")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read image configuration {}", path.display()))?;
        let config = Self::from_json_str(&raw)?;

        tracing::debug!(
            path = %path.display(),
            platforms = config.resolution_setting.len(),
            tags = config.compress_setting.len(),
            "Loaded image configuration"
        );

        Ok(config)
    }

    /// Load from `path` (usually `Config::image_config_path`), or use the
    /// built-in defaults when no path is configured.
    pub fn load(path: Option<&str>) -> Result<Self, anyhow::Error> {
        match path.map(str::trim).filter(|p| !p.is_empty()) {
            Some(path) => Self::from_file(path),
            None => {
                tracing::debug!("IMAGE_CONFIG_PATH not set, using default image configuration");
                Ok(Self::default())
            }
        }
    }

    pub fn compress_table(&self, tag: &str) -> Option<&SettingTable<f64>> {
        self.compress_setting.get(tag)
    }

    pub fn quality_table(&self, tag: &str) -> Option<&SettingTable<u8>> {
        self.quality_setting.get(tag)
    }

    pub fn domain_host(&self, name: &str) -> Option<&str> {
        self.domain.get(name).map(String::as_str)
    }
}
