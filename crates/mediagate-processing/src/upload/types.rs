/// An incoming upload.
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// A multipart file field. `error_code` is the transport's error code,
    /// 0 when the file arrived intact.
    File {
        original_name: String,
        data: Vec<u8>,
        error_code: u8,
    },
    /// A base64 payload, optionally wrapped in a `data:image/<fmt>;base64,` URI
    Base64(String),
    /// The request carried no file field
    Missing,
}

impl UploadSource {
    pub fn file(original_name: impl Into<String>, data: Vec<u8>) -> Self {
        UploadSource::File {
            original_name: original_name.into(),
            data,
            error_code: 0,
        }
    }
}
