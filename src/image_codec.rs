// Conversion between the canonical in-memory image and each transport
// encoding: filesystem paths (CLI), raw uploaded bytes (web UI) and base64
// strings (API). Pure and stateless; every decode normalizes to 3-channel
// RGB before the image reaches the engine.

use base64::prelude::{BASE64_STANDARD, Engine as _};
use image::RgbImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::EnhanceError;

/// JPEG quality for transport-encoded responses.
const JPEG_QUALITY: u8 = 85;

/// A raw image input in one of the supported transport encodings.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Filesystem path (CLI front end).
    Path(PathBuf),
    /// Raw bytes of an uploaded file (web UI front end).
    Bytes(Vec<u8>),
    /// Base64-encoded file contents (API front end).
    Base64(String),
}

/// Decodes any supported source into the canonical RGB representation.
pub fn decode(source: &ImageSource) -> Result<RgbImage, EnhanceError> {
    match source {
        ImageSource::Path(path) => decode_path(path),
        ImageSource::Bytes(data) => decode_bytes(data),
        ImageSource::Base64(encoded) => decode_base64(encoded),
    }
}

fn decode_path(path: &Path) -> Result<RgbImage, EnhanceError> {
    if !path.is_file() {
        return Err(EnhanceError::InputNotFound(path.to_path_buf()));
    }
    let data =
        std::fs::read(path).map_err(|_| EnhanceError::InputNotFound(path.to_path_buf()))?;
    decode_bytes(&data)
}

// Parses the raw file bytes and flattens the result to RGB, stripping
// alpha and expanding grayscale.
pub fn decode_bytes(data: &[u8]) -> Result<RgbImage, EnhanceError> {
    let dyn_img = image::load_from_memory(data).map_err(|e| {
        EnhanceError::UnreadableImage(format!("failed to auto-detect and decode image: {}", e))
    })?;
    Ok(dyn_img.to_rgb8())
}

fn decode_base64(encoded: &str) -> Result<RgbImage, EnhanceError> {
    let data = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|e| EnhanceError::InvalidEncoding(e.to_string()))?;
    // Valid base64 wrapping non-image bytes degrades to an unreadable-image
    // failure, as the decode itself succeeded.
    decode_bytes(&data)
}

/// Encodes the canonical image as JPEG bytes for transport.
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, EnhanceError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    encoder
        .encode(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| EnhanceError::WriteError(format!("JPEG encoding failed: {}", e)))?;
    Ok(buffer.into_inner())
}

/// Encodes the canonical image as a base64 JPEG string (API response field).
pub fn encode_base64_jpeg(image: &RgbImage) -> Result<String, EnhanceError> {
    Ok(BASE64_STANDARD.encode(encode_jpeg(image)?))
}

/// Saves the canonical image to disk, creating parent directories as
/// needed. The raster format is inferred from the destination extension.
pub fn save(image: &RgbImage, path: &Path) -> Result<(), EnhanceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                EnhanceError::WriteError(format!(
                    "failed to create output directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }
    image
        .save(path)
        .map_err(|e| EnhanceError::WriteError(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, Rgba, RgbaImage};

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, Rgb([120, 80, 40]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();
        buffer.into_inner()
    }

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_decode_base64_png() {
        let encoded = BASE64_STANDARD.encode(png_bytes(7, 5));
        let img = decode(&ImageSource::Base64(encoded)).unwrap();
        assert_eq!(img.dimensions(), (7, 5));
    }

    #[test]
    fn test_decode_flattens_alpha_to_rgb() {
        let rgba = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 128]));
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut buffer, ImageFormat::Png)
            .unwrap();

        let img = decode(&ImageSource::Bytes(buffer.into_inner())).unwrap();
        assert_eq!(img.dimensions(), (4, 4));
        // RgbImage is 3 samples per pixel by construction.
        assert_eq!(img.as_raw().len(), 4 * 4 * 3);
    }

    #[test]
    fn test_invalid_base64_is_rejected() {
        let err = decode(&ImageSource::Base64("not!!valid@@base64".into())).unwrap_err();
        assert!(matches!(err, EnhanceError::InvalidEncoding(_)));
    }

    #[test]
    fn test_base64_of_non_image_bytes_degrades_to_unreadable() {
        let encoded = BASE64_STANDARD.encode(b"just some text, not an image");
        let err = decode(&ImageSource::Base64(encoded)).unwrap_err();
        assert!(matches!(err, EnhanceError::UnreadableImage(_)));
    }

    #[test]
    fn test_missing_path_is_input_not_found() {
        let path = temp_dir("codec-missing").join("nope.png");
        let err = decode(&ImageSource::Path(path.clone())).unwrap_err();
        assert!(matches!(err, EnhanceError::InputNotFound(p) if p == path));
    }

    #[test]
    fn test_jpeg_base64_round_trip_preserves_dimensions() {
        let img = RgbImage::from_pixel(16, 12, Rgb([200, 100, 50]));
        let encoded = encode_base64_jpeg(&img).unwrap();
        let decoded = decode(&ImageSource::Base64(encoded)).unwrap();
        assert_eq!(decoded.dimensions(), (16, 12));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = temp_dir("codec-save");
        let path = dir.join("nested/out.png");
        let img = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));

        save(&img, &path).unwrap();
        assert!(path.is_file());

        let reloaded = decode(&ImageSource::Path(path)).unwrap();
        assert_eq!(reloaded.dimensions(), (3, 3));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_save_unknown_extension_is_write_error() {
        let dir = temp_dir("codec-badext");
        let img = RgbImage::from_pixel(3, 3, Rgb([1, 2, 3]));
        let err = save(&img, &dir.join("out.nonsense")).unwrap_err();
        assert!(matches!(err, EnhanceError::WriteError(_)));
        let _ = std::fs::remove_dir_all(dir);
    }
}
