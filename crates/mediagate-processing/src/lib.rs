//! Mediagate Processing Library
//!
//! Upload handling: validation, base64 data-URI decoding, image inspection
//! and the store-then-describe pipeline that produces a
//! [`FileInfo`](mediagate_core::FileInfo).

pub mod data_uri;
pub mod inspect;
pub mod upload;
pub mod validator;

pub use data_uri::{decode_data_uri, DataUriError, DecodedUpload};
pub use inspect::{image_dimensions, inspect_image};
pub use upload::{UploadHandler, UploadSource};
pub use validator::{MediaValidator, ValidationError};
