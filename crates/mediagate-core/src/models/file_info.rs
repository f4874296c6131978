use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UploadState;

/// What kind of object an upload produces, which decides the extra fields of
/// its [`FileInfo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectType {
    #[default]
    Image,
    File,
    Video,
    Audio,
}

impl FromStr for ObjectType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(ObjectType::Image),
            "file" => Ok(ObjectType::File),
            "video" => Ok(ObjectType::Video),
            "audio" => Ok(ObjectType::Audio),
            _ => Err(anyhow::anyhow!("Invalid object type: {}", s)),
        }
    }
}

impl Display for ObjectType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ObjectType::Image => write!(f, "image"),
            ObjectType::File => write!(f, "file"),
            ObjectType::Video => write!(f, "video"),
            ObjectType::Audio => write!(f, "audio"),
        }
    }
}

const NOT_IMAGE: &str = "not image";

/// Decoded image dimensions, or the marker string `"not image"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageInfo {
    Dimensions { scale: f64, width: u32, height: u32 },
    NotImage(String),
}

impl ImageInfo {
    /// `scale` is width / height rounded to two decimals (0 for a zero width).
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let scale = if width == 0 || height == 0 {
            0.0
        } else {
            (f64::from(width) / f64::from(height) * 100.0).round() / 100.0
        };
        ImageInfo::Dimensions {
            scale,
            width,
            height,
        }
    }

    pub fn not_image() -> Self {
        ImageInfo::NotImage(NOT_IMAGE.to_string())
    }
}

/// Metadata returned for every upload attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Public URL of the stored object; empty unless the upload succeeded
    pub url: String,
    /// Generated object name (without extension)
    pub name: String,
    pub size: u64,
    /// Extension without the leading dot
    #[serde(rename = "type")]
    pub extension: String,
    /// `"success"` or the failure message
    pub state: String,
    #[serde(rename = "originalName")]
    pub original_name: String,
    pub file_type: ObjectType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ImageInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_m3u8: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url_mp4: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl FileInfo {
    /// A `FileInfo` for an attempt rejected before anything was stored.
    pub fn rejected(
        state: UploadState,
        original_name: impl Into<String>,
        extension: impl Into<String>,
        size: u64,
        file_type: ObjectType,
    ) -> Self {
        Self {
            url: String::new(),
            name: String::new(),
            size,
            extension: extension.into(),
            state: state.message().to_string(),
            original_name: original_name.into(),
            file_type,
            info: None,
            url_m3u8: None,
            url_mp4: None,
            cover_img: None,
            source_url: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.state == UploadState::Success.message()
    }
}
