//! JPEG via the `image` crate encoder

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::types::{FixtureError, FixtureResult, PixelBuffer};

/// Baseline JPEG at `quality` (1-100); alpha is dropped before encoding
pub fn encode_jpeg(buffer: &PixelBuffer, quality: u8) -> FixtureResult<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(FixtureError::invalid(format!("JPEG quality must be 1-100, got {quality}")));
    }

    let rgb = buffer.to_rgb();
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, quality)
        .write_image(rgb.as_bytes(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| FixtureError::codec("JPEG", e))?;
    Ok(out)
}

pub fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 3 && data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::pattern::{synthesize, Pattern};

    #[test]
    fn test_quality_changes_size() {
        let buffer = synthesize(128, 128, Pattern::Geometric { seed: 42 }).unwrap();
        let low = encode_jpeg(&buffer, 30).unwrap();
        let high = encode_jpeg(&buffer, 95).unwrap();
        assert!(is_jpeg(&low) && is_jpeg(&high));
        assert!(low.len() < high.len());
    }

    #[test]
    fn test_rgba_input_accepted() {
        let buffer = PixelBuffer::filled(8, 8, &[10, 20, 30, 128]).unwrap();
        let jpeg = encode_jpeg(&buffer, 75).unwrap();
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_quality_bounds() {
        let buffer = PixelBuffer::filled(2, 2, &[0, 0, 0]).unwrap();
        assert!(encode_jpeg(&buffer, 0).is_err());
        assert!(encode_jpeg(&buffer, 101).is_err());
    }
}
