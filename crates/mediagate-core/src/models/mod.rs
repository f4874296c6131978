//! Data models shared by the upload pipeline and its callers

mod file_info;
mod upload_state;

pub use file_info::*;
pub use upload_state::*;
