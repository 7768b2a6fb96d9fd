//! Image captioning backends.
//!
//! The captioning model is an opaque image → text function behind the
//! [`Captioner`] trait, so the hosted model can be swapped for a mock in
//! tests.

pub mod huggingface;
pub mod mock;

use crate::models::ModelType;
use async_trait::async_trait;
use image::ImageOutputFormat;
use std::io::Cursor;
use thiserror::Error;

pub use huggingface::HuggingFaceCaptioner;

const JPEG_QUALITY: u8 = 85;

#[derive(Error, Debug)]
pub enum CaptionError {
    #[error("Cannot connect to caption backend at {0}: {1}")]
    Connection(String, String),

    #[error("Caption backend returned HTTP {0}: {1}")]
    Api(u16, String),

    #[error("Invalid response from caption backend: {0}")]
    InvalidResponse(String),

    #[error("Caption backend returned an empty caption")]
    EmptyCaption,

    #[error("Uploaded file is not a readable image: {0}")]
    InvalidImage(String),
}

#[async_trait]
pub trait Captioner: Send + Sync {
    /// Describe a JPEG-encoded RGB image using the requested model variant.
    async fn caption(&self, image: &[u8], model: ModelType) -> Result<String, CaptionError>;
}

/// Decode any supported image format, drop alpha, and re-encode as JPEG.
pub fn prepare_image(data: &[u8]) -> Result<Vec<u8>, CaptionError> {
    let img = image::load_from_memory(data).map_err(|e| CaptionError::InvalidImage(e.to_string()))?;
    let rgb = image::DynamicImage::ImageRgb8(img.to_rgb8());

    let mut jpeg_bytes = Vec::new();
    rgb.write_to(
        &mut Cursor::new(&mut jpeg_bytes),
        ImageOutputFormat::Jpeg(JPEG_QUALITY),
    )
    .map_err(|e| CaptionError::InvalidImage(e.to_string()))?;

    Ok(jpeg_bytes)
}
