//! Validation and recompression of uploaded images.
//!
//! Validation is strict and happens before any storage traffic.
//! Recompression is forgiving: bytes that fail to decode or re-encode are
//! stored as received, so callers never see a processing error.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use thiserror::Error;

use crate::models::config::ImageLimits;

/// MIME types accepted for upload.
pub const SUPPORTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// An uploaded file as received from the host application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// MIME essence: lowercased, with any parameters stripped.
    pub fn mime_essence(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase()
    }
}

/// Why an upload was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageValidationError {
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    #[error("image is {actual} bytes, over the {limit} byte limit")]
    TooLarge { actual: usize, limit: usize },
}

/// Check MIME type and size against `limits`.
pub fn validate(file: &UploadFile, limits: &ImageLimits) -> Result<(), ImageValidationError> {
    let essence = file.mime_essence();
    if !SUPPORTED_IMAGE_TYPES.contains(&essence.as_str()) {
        return Err(ImageValidationError::UnsupportedType(essence));
    }
    if file.bytes.len() > limits.max_bytes {
        return Err(ImageValidationError::TooLarge {
            actual: file.bytes.len(),
            limit: limits.max_bytes,
        });
    }
    Ok(())
}

/// Recompress `file` when it is large enough to be worth it.
///
/// Files at or below the compression threshold pass through untouched.
/// Larger files are decoded, scaled down so neither edge exceeds
/// `limits.max_dimension` (never scaled up), and re-encoded as JPEG, which
/// then becomes the reported content type.
pub fn process(file: UploadFile, limits: &ImageLimits) -> UploadFile {
    if file.bytes.len() <= limits.compress_threshold_bytes {
        return file;
    }

    let decoded = ImageReader::new(Cursor::new(file.bytes.as_slice()))
        .with_guessed_format()
        .map_err(image::ImageError::IoError)
        .and_then(|reader| reader.decode());

    let img = match decoded {
        Ok(img) => img,
        Err(e) => {
            log::warn!("Failed to decode upload {}: {e}; storing original", file.name);
            return file;
        }
    };

    let img = if img.width() > limits.max_dimension || img.height() > limits.max_dimension {
        img.resize(
            limits.max_dimension,
            limits.max_dimension,
            FilterType::Lanczos3,
        )
    } else {
        img
    };

    // JPEG output cannot carry an alpha channel
    let img = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, limits.jpeg_quality);
    if let Err(e) = img.write_with_encoder(encoder) {
        log::warn!("Failed to re-encode upload {}: {e}; storing original", file.name);
        return file;
    }

    UploadFile {
        name: file.name,
        content_type: "image/jpeg".to_string(),
        bytes: encoded,
    }
}
