//! Image inspection for upload metadata.

use mediagate_core::ImageInfo;

/// Width and height of an encoded image, or `None` when the bytes are not a
/// recognized image format.
#[cfg(feature = "image")]
pub fn image_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    use image::ImageReader;
    use std::io::Cursor;

    ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

#[cfg(not(feature = "image"))]
pub fn image_dimensions(_data: &[u8]) -> Option<(u32, u32)> {
    None
}

/// Describe uploaded bytes as an [`ImageInfo`].
pub async fn inspect_image(data: Vec<u8>) -> ImageInfo {
    // Header parsing can touch the whole buffer for some formats; keep it off the async pool.
    match tokio::task::spawn_blocking(move || image_dimensions(&data)).await {
        Ok(Some((width, height))) => ImageInfo::from_dimensions(width, height),
        Ok(None) => ImageInfo::not_image(),
        Err(e) => {
            tracing::warn!(error = %e, "Image inspection task failed");
            ImageInfo::not_image()
        }
    }
}

#[cfg(all(test, feature = "image"))]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        RgbImage::new(width, height)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_image_dimensions() {
        assert_eq!(image_dimensions(&png_bytes(30, 20)), Some((30, 20)));
        assert_eq!(image_dimensions(b"plain text"), None);
    }

    #[tokio::test]
    async fn test_inspect_image() {
        assert_eq!(
            inspect_image(png_bytes(30, 20)).await,
            ImageInfo::Dimensions {
                scale: 1.5,
                width: 30,
                height: 20
            }
        );
        assert_eq!(inspect_image(b"%PDF-1.4".to_vec()).await, ImageInfo::not_image());
    }
}
