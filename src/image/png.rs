//! PNG via the `image` crate encoder

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;

use super::extended_color_type;
use crate::types::{FixtureError, FixtureResult, PixelBuffer};

/// Best compression with adaptive filtering; RGB and RGBA are stored as-is
pub fn encode_png(buffer: &PixelBuffer) -> FixtureResult<Vec<u8>> {
    let mut out = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
    encoder
        .write_image(buffer.as_bytes(), buffer.width(), buffer.height(), extended_color_type(buffer))
        .map_err(|e| FixtureError::codec("PNG", e))?;
    Ok(out)
}

pub fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A])
}
