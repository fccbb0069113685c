//! WebP: lossy VP8 through libwebp (`webp`), exact VP8L through `image-webp`

use image_webp::{ColorType, WebPEncoder};

use crate::types::{ChannelLayout, FixtureError, FixtureResult, PixelBuffer};

/// `Some(q)` encodes lossy at quality `q` (0-100), `None` encodes exact
pub fn encode_webp(buffer: &PixelBuffer, quality: Option<u8>) -> FixtureResult<Vec<u8>> {
    match quality {
        Some(q) if q > 100 => Err(FixtureError::invalid(format!("WebP quality must be 0-100, got {q}"))),
        Some(q) => encode_lossy(buffer, q),
        None => encode_lossless(buffer),
    }
}

fn encode_lossy(buffer: &PixelBuffer, quality: u8) -> FixtureResult<Vec<u8>> {
    let (w, h) = (buffer.width(), buffer.height());
    let encoder = match buffer.layout() {
        ChannelLayout::Rgb => webp::Encoder::from_rgb(buffer.as_bytes(), w, h),
        ChannelLayout::Rgba => webp::Encoder::from_rgba(buffer.as_bytes(), w, h),
    };
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| FixtureError::codec("WebP", format!("{e:?}")))?;
    tracing::trace!("WebP q{} {}x{}: {} bytes", quality, w, h, memory.len());
    Ok(memory.to_vec())
}

fn encode_lossless(buffer: &PixelBuffer) -> FixtureResult<Vec<u8>> {
    let color = match buffer.layout() {
        ChannelLayout::Rgb => ColorType::Rgb8,
        ChannelLayout::Rgba => ColorType::Rgba8,
    };

    let mut out = Vec::new();
    WebPEncoder::new(&mut out)
        .encode(buffer.as_bytes(), buffer.width(), buffer.height(), color)
        .map_err(|e| FixtureError::codec("WebP", e))?;
    Ok(out)
}

pub fn is_webp(data: &[u8]) -> bool {
    data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP"
}

/// FourCC of the first chunk: `VP8 `, `VP8L` or `VP8X`
fn first_chunk(data: &[u8]) -> Option<&[u8]> {
    (is_webp(data) && data.len() >= 16).then(|| &data[12..16])
}
