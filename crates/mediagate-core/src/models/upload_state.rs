use serde::{Deserialize, Serialize};

/// Outcome of an upload attempt.
///
/// Rejections are reported through this state rather than as errors: the
/// caller always receives a [`FileInfo`](super::FileInfo) whose `state` is
/// `"success"` or the message of the failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadState {
    Success,
    /// Transport code 1
    IniSize,
    /// Transport code 2
    FormSize,
    /// Transport code 3
    Partial,
    /// Transport code 4
    NoFile,
    /// Transport code 5
    Empty,
    /// The request carried no file field
    PostSize,
    SizeExceeded,
    TypeNotAllowed,
    /// Target directory could not be created
    Dir,
    Io,
    Unknown,
    /// Received file could not be moved into place
    Move,
}

impl UploadState {
    /// Map a multipart transport error code (0 = no error).
    pub fn from_error_code(code: u8) -> Self {
        match code {
            0 => UploadState::Success,
            1 => UploadState::IniSize,
            2 => UploadState::FormSize,
            3 => UploadState::Partial,
            4 => UploadState::NoFile,
            5 => UploadState::Empty,
            _ => UploadState::Unknown,
        }
    }

    pub fn is_success(self) -> bool {
        self == UploadState::Success
    }

    pub fn message(self) -> &'static str {
        match self {
            UploadState::Success => "success",
            UploadState::IniSize => "file exceeds the upload_max_filesize limit",
            UploadState::FormSize => "file exceeds the MAX_FILE_SIZE limit",
            UploadState::Partial => "file was only partially uploaded",
            UploadState::NoFile => "no file was uploaded",
            UploadState::Empty => "uploaded file is empty",
            UploadState::PostSize => "file exceeds the post_max_size limit",
            UploadState::SizeExceeded => "file exceeds the size limit",
            UploadState::TypeNotAllowed => "file type not allowed",
            UploadState::Dir => "failed to create directory",
            UploadState::Io => "input/output error",
            UploadState::Unknown => "unknown error",
            UploadState::Move => "failed to save file",
        }
    }
}
