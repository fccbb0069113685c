//! TIFF via the `tiff` crate, uncompressed or LZW

use std::io::Cursor;

use tiff::encoder::{colortype, compression::Lzw, TiffEncoder};

use crate::types::{ChannelLayout, FixtureError, FixtureResult, PixelBuffer};

pub fn encode_tiff(buffer: &PixelBuffer, lzw: bool) -> FixtureResult<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut encoder = TiffEncoder::new(&mut cursor).map_err(|e| FixtureError::codec("TIFF", e))?;
        let (w, h, data) = (buffer.width(), buffer.height(), buffer.as_bytes());
        let written = match (buffer.layout(), lzw) {
            (ChannelLayout::Rgb, false) => encoder.write_image::<colortype::RGB8>(w, h, data),
            (ChannelLayout::Rgba, false) => encoder.write_image::<colortype::RGBA8>(w, h, data),
            (ChannelLayout::Rgb, true) => {
                encoder.write_image_with_compression::<colortype::RGB8, _>(w, h, Lzw::default(), data)
            }
            (ChannelLayout::Rgba, true) => {
                encoder.write_image_with_compression::<colortype::RGBA8, _>(w, h, Lzw::default(), data)
            }
        };
        written.map_err(|e| FixtureError::codec("TIFF", e))?;
    }
    Ok(cursor.into_inner())
}

pub fn is_tiff(data: &[u8]) -> bool {
    data.starts_with(b"II*\0") || data.starts_with(b"MM\0*")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::pattern::{synthesize, Pattern};

    #[test]
    fn test_uncompressed_and_lzw_decode_identically() {
        let buffer = synthesize(64, 48, Pattern::Gradient).unwrap();
        let plain = encode_tiff(&buffer, false).unwrap();
        let lzw = encode_tiff(&buffer, true).unwrap();
        assert!(is_tiff(&plain) && is_tiff(&lzw));
        assert_ne!(plain, lzw);

        for data in [&plain, &lzw] {
            let decoded = image::load_from_memory(data).unwrap().to_rgb8();
            assert_eq!(decoded.as_raw(), buffer.as_bytes());
        }
    }

    #[test]
    fn test_lzw_shrinks_flat_image() {
        let buffer = PixelBuffer::filled(128, 128, &[9, 9, 9]).unwrap();
        let plain = encode_tiff(&buffer, false).unwrap();
        let lzw = encode_tiff(&buffer, true).unwrap();
        assert!(lzw.len() < plain.len());
    }
}
