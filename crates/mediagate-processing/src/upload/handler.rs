use std::sync::Arc;

use chrono::Utc;
use mediagate_core::{
    AppError, FileInfo, ImageConfig, ObjectType, UploadSettings, UploadState,
};
use mediagate_storage::{storage_folder, Storage};
use uuid::Uuid;

use super::types::UploadSource;
use crate::data_uri::decode_data_uri;
use crate::inspect::inspect_image;
use crate::validator::{file_extension, MediaValidator};

/// Stores uploads under date-partitioned keys and describes them as [`FileInfo`].
///
/// Rejected uploads are not errors: they come back as a `FileInfo` whose
/// `state` carries the reason. Only storage failures surface as `Err`.
pub struct UploadHandler {
    storage: Arc<dyn Storage>,
    settings: UploadSettings,
    validator: MediaValidator,
    public_host: String,
}

/// A validated upload ready to be written.
struct Accepted {
    data: Vec<u8>,
    extension: String,
    original_name: String,
}

impl UploadHandler {
    /// Fails when `settings.domain` has no entry in the config's domain table.
    pub fn new(
        storage: Arc<dyn Storage>,
        settings: UploadSettings,
        image_config: &ImageConfig,
    ) -> Result<Self, AppError> {
        let public_host = image_config
            .domain_host(&settings.domain)
            .ok_or_else(|| {
                AppError::Config(format!("No host configured for domain {:?}", settings.domain))
            })?
            .to_string();

        Ok(Self {
            validator: MediaValidator::from_settings(&settings),
            storage,
            settings,
            public_host,
        })
    }

    pub fn settings(&self) -> &UploadSettings {
        &self.settings
    }

    pub async fn upload(&self, source: UploadSource) -> Result<FileInfo, AppError> {
        match self.accept(source) {
            Ok(accepted) => self.store(accepted).await,
            Err(rejected) => {
                tracing::warn!(
                    state = %rejected.state,
                    original_name = %rejected.original_name,
                    size_bytes = rejected.size,
                    "Upload rejected"
                );
                Ok(rejected)
            }
        }
    }

    fn accept(&self, source: UploadSource) -> Result<Accepted, FileInfo> {
        let file_type = self.settings.object_type;

        match source {
            UploadSource::Missing => Err(FileInfo::rejected(
                UploadState::PostSize,
                "",
                "",
                0,
                file_type,
            )),
            UploadSource::File {
                original_name,
                data,
                error_code,
            } => {
                let extension = file_extension(&original_name);
                let size = data.len() as u64;
                let reject = |state: UploadState| {
                    FileInfo::rejected(
                        state,
                        original_name.as_str(),
                        extension.trim_start_matches('.'),
                        size,
                        file_type,
                    )
                };

                if error_code != 0 {
                    return Err(reject(UploadState::from_error_code(error_code)));
                }
                if let Err(e) = self.validator.validate_all(&extension, size) {
                    return Err(reject(e.upload_state()));
                }

                Ok(Accepted {
                    data,
                    extension,
                    original_name,
                })
            }
            UploadSource::Base64(payload) => {
                let decoded = decode_data_uri(&payload)
                    .map_err(|e| FileInfo::rejected(e.upload_state(), "", "", 0, file_type))?;
                let size = decoded.data.len() as u64;

                if let Err(e) = self.validator.validate_all(&decoded.extension, size) {
                    return Err(FileInfo::rejected(
                        e.upload_state(),
                        "",
                        decoded.extension.trim_start_matches('.'),
                        size,
                        file_type,
                    ));
                }

                Ok(Accepted {
                    data: decoded.data,
                    extension: decoded.extension,
                    original_name: String::new(),
                })
            }
        }
    }

    async fn store(&self, accepted: Accepted) -> Result<FileInfo, AppError> {
        let Accepted {
            data,
            extension,
            original_name,
        } = accepted;

        let object_type = self.settings.object_type;
        let name = Uuid::new_v4().simple().to_string();
        let folder = storage_folder(&self.settings.oss_path, Utc::now());
        let key = format!("{}/{}{}", folder, name, extension);
        let size = data.len() as u64;

        let info = match object_type {
            ObjectType::Image => Some(inspect_image(data.clone()).await),
            _ => None,
        };

        self.storage
            .upload_with_key(&key, data, content_type_for(&extension))
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            object_type = %object_type,
            "Upload stored"
        );

        let base = format!("{}://{}", self.settings.scheme, self.public_host);
        let mut file_info = FileInfo {
            url: format!("{}/{}", base, key),
            name: name.clone(),
            size,
            extension: extension.trim_start_matches('.').to_string(),
            state: UploadState::Success.message().to_string(),
            original_name,
            file_type: object_type,
            info,
            url_m3u8: None,
            url_mp4: None,
            cover_img: None,
            source_url: None,
        };

        // Transcoded renditions land in a folder named after the object.
        let rendition = format!("{}/{}/{}/{}", base, folder, name, name);
        match object_type {
            ObjectType::Video => {
                file_info.url_m3u8 = Some(format!("{}.m3u8", rendition));
                file_info.url_mp4 = Some(format!("{}.mp4", rendition));
                file_info.cover_img = Some(format!("{}.jpg", rendition));
                file_info.source_url = Some(self.source_url(&folder));
            }
            ObjectType::Audio => {
                file_info.url_m3u8 = Some(format!("{}.m3u8", rendition));
            }
            ObjectType::Image | ObjectType::File => {}
        }

        Ok(file_info)
    }

    /// The upload folder with the configured `host` swapped for `source_host`.
    fn source_url(&self, folder: &str) -> String {
        match (&self.settings.host, &self.settings.source_host) {
            (Some(host), Some(source_host)) => folder.replace(host.as_str(), source_host),
            _ => folder.to_string(),
        }
    }
}

fn content_type_for(extension: &str) -> &'static str {
    match extension {
        ".jpg" | ".jpeg" => "image/jpeg",
        ".png" => "image/png",
        ".gif" => "image/gif",
        ".webp" => "image/webp",
        ".bmp" => "image/bmp",
        ".mp4" => "video/mp4",
        ".mov" => "video/quicktime",
        ".mp3" => "audio/mpeg",
        ".m4a" => "audio/mp4",
        ".wav" => "audio/wav",
        _ => "application/octet-stream",
    }
}
