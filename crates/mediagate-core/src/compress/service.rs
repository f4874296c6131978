//! Image-processing services that derive resized/compressed variants of a
//! stored object through query parameters on its URL.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use url::Url;

use crate::error::CompressError;
use crate::image_config::HostRule;

/// Quality value that means "leave quality untouched".
pub const FULL_QUALITY: u8 = 100;

/// Supported `auto_compress_service` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressService {
    /// Aliyun OSS image processing (`x-oss-process`)
    Aliyun,
}

impl FromStr for CompressService {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "aliyun" => Ok(CompressService::Aliyun),
            _ => Err(CompressError::UnsupportedService(s.to_string())),
        }
    }
}

impl Display for CompressService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            CompressService::Aliyun => write!(f, "aliyun"),
        }
    }
}

impl CompressService {
    /// Rewrite `url` to request a processed variant of the image.
    ///
    /// Only hosts present in `hosts` are rewritten; any other URL (including
    /// one that fails to parse) is returned unchanged.
    pub fn transform_url(
        self,
        url: &str,
        hosts: &BTreeMap<String, HostRule>,
        width: Option<u32>,
        format: &str,
        quality: u8,
        use_intra_domain: bool,
    ) -> String {
        let Ok(parsed) = Url::parse(url) else {
            return url.to_string();
        };
        let Some(rule) = parsed.host_str().and_then(|host| hosts.get(host)) else {
            return url.to_string();
        };

        let host = if use_intra_domain {
            &rule.internal
        } else {
            &rule.public
        };
        let query = match self {
            CompressService::Aliyun => aliyun_process_query(width, format, quality),
        };

        assemble(parsed.scheme(), host, raw_path(url), &query)
    }
}

/// Path of `url` as written: not percent-encoded, empty when absent. The
/// original query and fragment are dropped.
fn raw_path(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let Some(start) = rest.find(|c: char| matches!(c, '/' | '?' | '#')) else {
        return "";
    };
    let rest = &rest[start..];
    let end = rest.find(|c: char| matches!(c, '?' | '#')).unwrap_or(rest.len());
    &rest[..end]
}

/// `x-oss-process=image/auto-orient,1/resize,w_<w>/format,<fmt>/interlace,1/quality,q_<q>`
fn aliyun_process_query(width: Option<u32>, format: &str, quality: u8) -> String {
    let mut actions = vec!["auto-orient,1".to_string()];

    if let Some(width) = width.filter(|w| *w > 0) {
        actions.push(format!("resize,w_{}", width));
    }
    actions.push(format!("format,{}", format));
    actions.push("interlace,1".to_string());
    if quality != FULL_QUALITY && format != "webp" {
        actions.push(format!("quality,q_{}", quality));
    }

    format!("x-oss-process=image/{}", actions.join("/"))
}

fn assemble(scheme: &str, host: &str, path: &str, query: &str) -> String {
    if query.is_empty() {
        format!("{}://{}{}", scheme, host, path)
    } else {
        format!("{}://{}{}?{}", scheme, host, path, query)
    }
}
