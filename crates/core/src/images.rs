//! Image ingestion
//!
//! Uploaded images are size-checked, decoded, scaled down so that neither side exceeds
//! [`MAX_DIMENSION`] and re-encoded as a JPEG `data:` URL suitable for embedding in a
//! [`Product`](crate::products::Product).

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{GenericImageView, codecs::jpeg::JpegEncoder, imageops::FilterType};
use thiserror::Error;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Largest width or height of a stored image, in pixels.
pub const MAX_DIMENSION: u32 = 800;

/// JPEG quality of stored images.
pub const JPEG_QUALITY: u8 = 80;

const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// Errors ingesting an uploaded image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// Upload exceeds [`MAX_UPLOAD_BYTES`].
    #[error("image is {size} bytes, the limit is {limit} bytes")]
    TooLarge {
        /// Upload size
        size: usize,

        /// Accepted maximum
        limit: usize,
    },

    /// Upload is not a readable image.
    #[error("failed to decode image")]
    Decode(#[source] image::ImageError),

    /// Re-encoding failed.
    #[error("failed to encode image as JPEG")]
    Encode(#[source] image::ImageError),
}

/// A resized, JPEG-encoded image held as a `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    data_url: String,
    width: u32,
    height: u32,
}

impl EncodedImage {
    /// The `data:image/jpeg;base64,…` URL.
    pub fn as_data_url(&self) -> &str {
        &self.data_url
    }

    /// Consumes the image, returning its `data:` URL.
    pub fn into_data_url(self) -> String {
        self.data_url
    }

    /// Width in pixels after scaling.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels after scaling.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Checks, scales and re-encodes an uploaded image.
///
/// # Errors
///
/// Returns [`ImageError::TooLarge`] for uploads over [`MAX_UPLOAD_BYTES`], and a decode or
/// encode error if the bytes are not a supported image.
pub fn ingest(bytes: &[u8]) -> Result<EncodedImage, ImageError> {
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(ImageError::TooLarge {
            size: bytes.len(),
            limit: MAX_UPLOAD_BYTES,
        });
    }

    let decoded = image::load_from_memory(bytes).map_err(ImageError::Decode)?;
    let (width, height) = decoded.dimensions();
    let (scaled_width, scaled_height) = scaled_dimensions(width, height, MAX_DIMENSION);

    let resized = if (scaled_width, scaled_height) == (width, height) {
        decoded
    } else {
        decoded.resize_exact(scaled_width, scaled_height, FilterType::Triangle)
    };

    // JPEG carries no alpha channel.
    let rgb = resized.to_rgb8();

    let mut jpeg = Vec::new();

    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(ImageError::Encode)?;

    Ok(EncodedImage {
        data_url: format!("{DATA_URL_PREFIX}{}", STANDARD.encode(&jpeg)),
        width: rgb.width(),
        height: rgb.height(),
    })
}

/// Proportionally scales `width` x `height` so that neither side exceeds `max`.
///
/// A landscape image is capped on its width and a portrait or square image on its height;
/// the other side shrinks by the same factor, truncated to whole pixels and never below 1.
pub fn scaled_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width > height && width > max {
        (max, scale_side(height, width, max))
    } else if height > max {
        (scale_side(width, height, max), max)
    } else {
        (width, height)
    }
}

fn scale_side(side: u32, capped: u32, max: u32) -> u32 {
    let scaled = u64::from(side) * u64::from(max) / u64::from(capped.max(1));

    u32::try_from(scaled).unwrap_or(max).max(1)
}
