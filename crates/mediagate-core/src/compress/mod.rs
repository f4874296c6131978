//! Responsive image URL helper
//!
//! Given a requested display width and a platform, picks the closest configured
//! breakpoint, resolves the compression ratio and quality configured for it and
//! rewrites a template URL into a processed-image URL.
//!
//! ```rust
//! use mediagate_core::compress::{CompressOptions, ImageCompressor};
//! use mediagate_core::ImageConfig;
//!
//! let config = ImageConfig::from_json_str(r#"{
//!     "resolution_setting": { "iphone": [320, 640, 750] },
//!     "compress_setting": { "cover": { "iphone": { "640": 0.5 } } }
//! }"#).unwrap();
//!
//! let options = CompressOptions::new("http://static.thefair.net.cn/{$id}.jpg").rule("id", "42");
//! let url = ImageCompressor::new(&config)
//!     .auto_compress_image("cover", &options, "iphone", "600", "jpg", false)
//!     .unwrap();
//! assert_eq!(
//!     url,
//!     "http://image.thefair.net.cn/42.jpg?x-oss-process=image/auto-orient,1/resize,w_320/format,jpg/interlace,1"
//! );
//! ```

pub mod breakpoint;
pub mod rewrite;
pub mod service;
pub mod settings;

pub use breakpoint::{platform_candidates, select_breakpoint};
pub use rewrite::{replace_placeholders, CompressOptions};
pub use service::{CompressService, FULL_QUALITY};
pub use settings::{resolve_setting, resolve_setting_step, EntryKey, LookupStep, TableSource};

use crate::error::{CompressError, ConfigurationError};
use crate::image_config::ImageConfig;

/// Ratio used when no compression setting matches: keep the breakpoint width.
pub const NO_COMPRESSION: f64 = 1.0;

/// Parse a requested display width; empty, zero and non-numeric input is rejected.
pub fn parse_display_width(raw: &str) -> Result<u32, ConfigurationError> {
    let invalid = || ConfigurationError::InvalidResolution(raw.to_string());

    let width = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !width.is_finite() || width < 1.0 {
        return Err(invalid());
    }
    Ok(width as u32)
}

/// Compression helper bound to one immutable image configuration.
#[derive(Debug, Clone, Copy)]
pub struct ImageCompressor<'a> {
    config: &'a ImageConfig,
}

impl<'a> ImageCompressor<'a> {
    pub fn new(config: &'a ImageConfig) -> Self {
        Self { config }
    }

    /// The configured `auto_compress_service`.
    pub fn service(&self) -> Result<CompressService, CompressError> {
        self.config.auto_compress_service.parse()
    }

    /// Rewrite `url` so the configured service returns a resized/recompressed
    /// variant. URLs on unrecognized hosts come back unchanged.
    pub fn compressed_image_url(
        &self,
        url: &str,
        width: Option<u32>,
        format: &str,
        quality: u8,
        use_intra_domain: bool,
    ) -> Result<String, CompressError> {
        let service = self.service()?;
        Ok(service.transform_url(
            url,
            &self.config.hosts,
            width,
            format,
            quality,
            use_intra_domain,
        ))
    }

    /// Build the processed URL for a resolved breakpoint.
    ///
    /// Returns an empty string when `options` yields no base URL for the
    /// breakpoint; callers treat that as "no image available".
    pub fn build_url(
        &self,
        options: &CompressOptions,
        breakpoint: u32,
        effective_width: f64,
        format: &str,
        quality: u8,
        use_intra_domain: bool,
    ) -> Result<String, CompressError> {
        let base = options.base_url(breakpoint);
        if base.is_empty() {
            return Ok(base);
        }

        self.compressed_image_url(
            &base,
            Some(effective_width as u32),
            format,
            quality,
            use_intra_domain,
        )
    }

    /// Pick the breakpoint for `platform` nearest `resolution_width`, resolve the
    /// ratio and quality configured for `tag` and build the processed URL.
    pub fn auto_compress_image(
        &self,
        tag: &str,
        options: &CompressOptions,
        platform: &str,
        resolution_width: &str,
        format: &str,
        use_intra_domain: bool,
    ) -> Result<String, CompressError> {
        let requested = parse_display_width(resolution_width)?;

        let candidates = platform_candidates(&self.config.resolution_setting, platform);
        let breakpoint = select_breakpoint(&candidates, requested).ok_or_else(|| {
            ConfigurationError::MissingSettings(format!(
                "no resolution table for platform {}",
                platform
            ))
        })?;

        let ratios = self
            .config
            .compress_table(tag)
            .filter(|table| table.values().any(|entries| !entries.is_empty()))
            .ok_or_else(|| {
                ConfigurationError::MissingSettings(format!("no compress setting for tag {}", tag))
            })?;

        let (ratio, ratio_step) = resolve_setting_step(ratios, platform, breakpoint, NO_COMPRESSION);
        let (quality, quality_step) = match self.config.quality_table(tag) {
            Some(qualities) => resolve_setting_step(qualities, platform, breakpoint, FULL_QUALITY),
            None => (FULL_QUALITY, None),
        };

        let effective_ratio = ratio * options.rate();
        if effective_ratio == 0.0 || effective_ratio.is_nan() {
            return Err(ConfigurationError::ZeroCompressRatio {
                tag: tag.to_string(),
                breakpoint,
            }
            .into());
        }

        tracing::debug!(
            tag = %tag,
            platform = %platform,
            requested,
            breakpoint,
            ratio = effective_ratio,
            ratio_step = ?ratio_step,
            quality,
            quality_step = ?quality_step,
            "Resolved image compression settings"
        );

        self.build_url(
            options,
            breakpoint,
            f64::from(breakpoint) * effective_ratio,
            format,
            quality,
            use_intra_domain,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "auto_compress_service": "aliyun",
        "resolution_setting": {
            "iphone": [320, 640, 750],
            "android": [720, 1080]
        },
        "compress_setting": {
            "product_single": {
                "iphone": { "640": 0.5, "default": 0.8 },
                "default": { "default": 1 }
            },
            "flat": { "default": { "default": 0.5 } },
            "broken": { "iphone": { "640": 0 } },
            "empty": {}
        },
        "quality_setting": {
            "product_single": {
                "iphone": { "640": 80 },
                "default": { "default": 90 }
            }
        }
    }"#;

    fn config() -> ImageConfig {
        ImageConfig::from_json_str(CONFIG).unwrap()
    }

    const TEMPLATE: &str = "http://static.thefair.net.cn/product/{$id}/cover.jpg";

    #[test]
    fn test_auto_compress_exact_breakpoint() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image(
                "product_single",
                &CompressOptions::new(TEMPLATE).rule("id", "42"),
                "iphone",
                "640",
                "jpg",
                false,
            )
            .unwrap();

        assert_eq!(
            url,
            "http://image.thefair.net.cn/product/42/cover.jpg?x-oss-process=image/auto-orient,1/resize,w_320/format,jpg/interlace,1/quality,q_80"
        );
    }

    #[test]
    fn test_auto_compress_platform_default_ratio() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image(
                "product_single",
                &CompressOptions::new(TEMPLATE).rule("id", "1"),
                "iphone",
                "760",
                "png",
                true,
            )
            .unwrap();

        // 750 * 0.8; the iphone quality table has neither 750 nor a default
        assert_eq!(
            url,
            "http://static-thefair-bj.oss-cn-beijing-internal.aliyuncs.com/product/1/cover.jpg?x-oss-process=image/auto-orient,1/resize,w_600/format,png/interlace,1"
        );
    }

    #[test]
    fn test_auto_compress_unknown_platform_merges_resolutions() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image(
                "flat",
                &CompressOptions::new(TEMPLATE).rule("id", "9"),
                "h5",
                "700",
                "webp",
                false,
            )
            .unwrap();

        // candidates [720, 1080, 320, 640, 750], 720 is nearest
        assert!(url.contains("resize,w_360/"), "{}", url);
        assert!(!url.contains("quality"));
    }

    #[test]
    fn test_auto_compress_default_platform_quality() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image(
                "product_single",
                &CompressOptions::new(TEMPLATE).rule("id", "7"),
                "android",
                "1080",
                "jpg",
                false,
            )
            .unwrap();

        // no android tables: both lookups use the "default" platform table
        assert_eq!(
            url,
            "http://image.thefair.net.cn/product/7/cover.jpg?x-oss-process=image/auto-orient,1/resize,w_1080/format,jpg/interlace,1/quality,q_90"
        );
    }

    #[test]
    fn test_custom_rate_and_override() {
        let config = config();
        let options = CompressOptions::new(TEMPLATE)
            .custom(1080, "http://static.thefair.net.cn/special.jpg")
            .compress_rate(0.5);
        let url = ImageCompressor::new(&config)
            .auto_compress_image("flat", &options, "android", "1000", "jpg", false)
            .unwrap();

        assert_eq!(
            url,
            "http://image.thefair.net.cn/special.jpg?x-oss-process=image/auto-orient,1/resize,w_270/format,jpg/interlace,1"
        );
    }

    #[test]
    fn test_unrecognized_host_keeps_template_result() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image(
                "flat",
                &CompressOptions::new("http://example.com/{$id}.jpg").rule("id", "5"),
                "iphone",
                "320",
                "jpg",
                false,
            )
            .unwrap();
        assert_eq!(url, "http://example.com/5.jpg");
    }

    #[test]
    fn test_empty_template_yields_empty_url() {
        let config = config();
        let url = ImageCompressor::new(&config)
            .auto_compress_image("flat", &CompressOptions::default(), "iphone", "320", "jpg", false)
            .unwrap();
        assert_eq!(url, "");
    }

    #[test]
    fn test_zero_ratio_is_a_configuration_error() {
        let config = config();
        let err = ImageCompressor::new(&config)
            .auto_compress_image("broken", &CompressOptions::new(TEMPLATE), "iphone", "640", "jpg", false)
            .unwrap_err();
        assert_eq!(
            err,
            CompressError::Configuration(ConfigurationError::ZeroCompressRatio {
                tag: "broken".to_string(),
                breakpoint: 640,
            })
        );
    }

    #[test]
    fn test_invalid_display_width() {
        let config = config();
        let compressor = ImageCompressor::new(&config);
        for raw in ["", "0", "abc", "  ", "-5"] {
            let err = compressor
                .auto_compress_image("flat", &CompressOptions::new(TEMPLATE), "iphone", raw, "jpg", false)
                .unwrap_err();
            assert!(
                matches!(
                    err,
                    CompressError::Configuration(ConfigurationError::InvalidResolution(_))
                ),
                "{:?}",
                raw
            );
        }
    }

    #[test]
    fn test_missing_tables() {
        let compressor_config = config();
        let compressor = ImageCompressor::new(&compressor_config);
        for tag in ["unknown", "empty"] {
            let err = compressor
                .auto_compress_image(tag, &CompressOptions::new(TEMPLATE), "iphone", "640", "jpg", false)
                .unwrap_err();
            assert!(matches!(
                err,
                CompressError::Configuration(ConfigurationError::MissingSettings(_))
            ));
        }

        let bare = ImageConfig::default();
        let err = ImageCompressor::new(&bare)
            .auto_compress_image("flat", &CompressOptions::new(TEMPLATE), "iphone", "640", "jpg", false)
            .unwrap_err();
        assert!(matches!(
            err,
            CompressError::Configuration(ConfigurationError::MissingSettings(_))
        ));
    }

    #[test]
    fn test_unsupported_service() {
        let mut config = config();
        config.auto_compress_service = "other".to_string();
        let compressor = ImageCompressor::new(&config);

        assert_eq!(
            compressor.compressed_image_url("http://example.com/a.jpg", Some(100), "jpg", 100, false),
            Err(CompressError::UnsupportedService("other".to_string()))
        );
        assert!(compressor
            .auto_compress_image("flat", &CompressOptions::new(TEMPLATE), "iphone", "640", "jpg", false)
            .is_err());
    }

    #[test]
    fn test_compressed_image_url_passthrough() {
        let config = ImageConfig::default();
        assert_eq!(
            ImageCompressor::new(&config)
                .compressed_image_url("http://example.com/a.jpg", Some(100), "jpg", 100, false)
                .unwrap(),
            "http://example.com/a.jpg"
        );
    }

    #[test]
    fn test_build_url_is_idempotent() {
        let config = config();
        let compressor = ImageCompressor::new(&config);
        let options = CompressOptions::new(TEMPLATE).rule("id", "3");

        let first = compressor.build_url(&options, 640, 320.0, "jpg", 75, false).unwrap();
        let second = compressor.build_url(&options, 640, 320.0, "jpg", 75, false).unwrap();
        assert_eq!(first, second);
        assert!(first.ends_with("resize,w_320/format,jpg/interlace,1/quality,q_75"));
    }

    #[test]
    fn test_parse_display_width() {
        assert_eq!(parse_display_width(" 750 "), Ok(750));
        assert_eq!(parse_display_width("414.9"), Ok(414));
        assert!(parse_display_width("NaN").is_err());
        assert!(parse_display_width("0.5").is_err());
    }
}
