//! Base64 image uploads.
//!
//! Accepts either a data URI (`data:image/png;base64,iVBORw0...`) or a bare
//! base64 payload. Bare payloads are assumed to be PNG.

use base64::{engine::general_purpose, Engine as _};
use mediagate_core::UploadState;

const DEFAULT_EXTENSION: &str = ".png";

#[derive(Debug, thiserror::Error)]
pub enum DataUriError {
    #[error("Invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("Empty base64 payload")]
    EmptyPayload,
}

impl DataUriError {
    pub fn upload_state(&self) -> UploadState {
        UploadState::Io
    }
}

/// Decoded payload and the extension (with leading dot) it should be stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedUpload {
    pub data: Vec<u8>,
    pub extension: String,
}

pub fn decode_data_uri(input: &str) -> Result<DecodedUpload, DataUriError> {
    let (extension, payload) = match input.split_once(',') {
        Some((header, payload)) => (
            image_format(header)
                .map(extension_for)
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
            payload,
        ),
        None => (DEFAULT_EXTENSION.to_string(), input),
    };

    let data = general_purpose::STANDARD.decode(payload.trim())?;
    if data.is_empty() {
        return Err(DataUriError::EmptyPayload);
    }

    Ok(DecodedUpload { data, extension })
}

/// The `<fmt>` of a `data:image/<fmt>;base64` header. Word characters only.
fn image_format(header: &str) -> Option<&str> {
    let format = header
        .strip_prefix("data:image/")?
        .strip_suffix(";base64")?;
    if format.is_empty() || !format.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(format)
}

fn extension_for(format: &str) -> String {
    match format {
        "jpeg" | "jpg" => ".jpg".to_string(),
        other => format!(".{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_extensions() {
        let decoded = decode_data_uri("data:image/jpeg;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded.data, b"hello");
        assert_eq!(decoded.extension, ".jpg");

        assert_eq!(
            decode_data_uri("data:image/gif;base64,aGVsbG8=").unwrap().extension,
            ".gif"
        );
        assert_eq!(
            decode_data_uri("data:image/webp;base64,aGVsbG8=").unwrap().extension,
            ".webp"
        );
    }

    #[test]
    fn test_bare_payload_defaults_to_png() {
        let decoded = decode_data_uri("aGVsbG8=").unwrap();
        assert_eq!(decoded.data, b"hello");
        assert_eq!(decoded.extension, ".png");
    }

    #[test]
    fn test_unrecognized_header_keeps_default() {
        let decoded = decode_data_uri("data:text/plain;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded.extension, ".png");
        let decoded = decode_data_uri("data:image/svg+xml;base64,aGVsbG8=").unwrap();
        assert_eq!(decoded.extension, ".png");
    }

    #[test]
    fn test_invalid_payloads() {
        let err = decode_data_uri("data:image/png;base64,!!!not base64").unwrap_err();
        assert!(matches!(err, DataUriError::InvalidBase64(_)));
        assert_eq!(err.upload_state(), UploadState::Io);

        let err = decode_data_uri("data:image/png;base64,").unwrap_err();
        assert!(matches!(err, DataUriError::EmptyPayload));
    }
}
