//! In-process image re-encoding with the `image` crate.

use super::{EncodeTarget, ImageEncoder};
use crate::error::CompressError;
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageEncoder as _};
use tokio::task;

/// JPEG/PNG encoder running on the blocking pool
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCodec;

#[async_trait]
impl ImageEncoder for ImageCodec {
    async fn encode(&self, data: Vec<u8>, target: EncodeTarget, quality: u8) -> Result<Vec<u8>, CompressError> {
        task::spawn_blocking(move || encode_bytes(&data, target, quality))
            .await
            .map_err(|e| CompressError::InvalidContent(format!("image encoder task failed: {}", e)))?
    }
}

fn encode_bytes(data: &[u8], target: EncodeTarget, quality: u8) -> Result<Vec<u8>, CompressError> {
    let img = image::load_from_memory(data)
        .map_err(|e| CompressError::InvalidContent(format!("cannot decode image: {}", e)))?;

    let mut out = Vec::with_capacity(data.len() / 2);
    match target {
        EncodeTarget::Jpeg => {
            // JPEG has no alpha channel
            let rgb = img.to_rgb8();
            let mut encoder = JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
            encoder
                .encode(rgb.as_raw(), rgb.width(), rgb.height(), ColorType::Rgb8)
                .map_err(|e| CompressError::InvalidContent(format!("JPEG encoding failed: {}", e)))?;
        }
        EncodeTarget::Png => {
            let img = match img.color() {
                ColorType::Rgb32F | ColorType::Rgba32F => DynamicImage::ImageRgba8(img.to_rgba8()),
                _ => img,
            };
            let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
            encoder
                .write_image(img.as_bytes(), img.width(), img.height(), img.color())
                .map_err(|e| CompressError::InvalidContent(format!("PNG encoding failed: {}", e)))?;
        }
    }

    Ok(out)
}
