use mediagate_core::{UploadSettings, UploadState};

/// Validation errors for uploaded files
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Empty file")]
    EmptyFile,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid file extension: {extension:?} (allowed: {allowed:?})")]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },
}

impl ValidationError {
    /// The upload state reported to the client for this failure.
    pub fn upload_state(&self) -> UploadState {
        match self {
            ValidationError::EmptyFile => UploadState::Empty,
            ValidationError::FileTooLarge { .. } => UploadState::SizeExceeded,
            ValidationError::InvalidExtension { .. } => UploadState::TypeNotAllowed,
        }
    }
}

/// Upload validator: size limit and extension allow-list.
pub struct MediaValidator {
    max_file_size: u64,
    allowed_extensions: Vec<String>,
}

impl MediaValidator {
    /// `allowed_extensions` are lower-case with a leading dot (".jpg").
    pub fn new(max_file_size: u64, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions,
        }
    }

    pub fn from_settings(settings: &UploadSettings) -> Self {
        Self::new(settings.max_size_bytes(), settings.allow_files.clone())
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: u64) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate an extension in ".ext" form; comparison is case-insensitive.
    pub fn validate_extension(&self, extension: &str) -> Result<(), ValidationError> {
        let extension = extension.to_lowercase();

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(())
    }

    /// Run all checks: emptiness, size, then extension.
    pub fn validate_all(&self, extension: &str, size: u64) -> Result<(), ValidationError> {
        self.validate_file_size(size)?;
        self.validate_extension(extension)?;
        Ok(())
    }
}

/// Extension of `filename` from its last dot, lower-cased, with the dot.
/// Empty when the name has no dot.
pub fn file_extension(filename: &str) -> String {
    filename
        .rfind('.')
        .map(|i| filename[i..].to_lowercase())
        .unwrap_or_default()
}
