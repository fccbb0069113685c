//! BMP via the `image` crate encoder

use image::codecs::bmp::BmpEncoder;
use image::ImageEncoder;

use super::extended_color_type;
use crate::types::{FixtureError, FixtureResult, PixelBuffer};

pub fn encode_bmp(buffer: &PixelBuffer) -> FixtureResult<Vec<u8>> {
    let mut out = Vec::new();
    BmpEncoder::new(&mut out)
        .write_image(buffer.as_bytes(), buffer.width(), buffer.height(), extended_color_type(buffer))
        .map_err(|e| FixtureError::codec("BMP", e))?;
    Ok(out)
}

pub fn is_bmp(data: &[u8]) -> bool {
    data.len() >= 14 && &data[0..2] == b"BM"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::pattern::{synthesize, Pattern};

    #[test]
    fn test_bmp_header_and_pixels() {
        let buffer = synthesize(33, 7, Pattern::Geometric { seed: 3 }).unwrap();
        let bmp = encode_bmp(&buffer).unwrap();
        assert!(is_bmp(&bmp));
        let declared = u32::from_le_bytes([bmp[2], bmp[3], bmp[4], bmp[5]]) as usize;
        assert_eq!(declared, bmp.len());

        let decoded = image::load_from_memory(&bmp).unwrap().to_rgb8();
        assert_eq!(decoded.as_raw(), buffer.as_bytes());
    }
}
