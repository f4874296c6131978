//! Upload pipeline: validate → store → describe.

mod handler;
mod types;

pub use handler::UploadHandler;
pub use types::UploadSource;
