//! Uncompressed true-color TGA writer
//!
//! Layout: 18-byte little-endian header, then pixel rows exactly as they sit
//! in the [`PixelBuffer`] (top row first, descriptor 0, no row flip). No ID
//! field, no color map, no footer.

use serde::{Deserialize, Serialize};

use crate::types::{FixtureError, FixtureResult, PixelBuffer};

pub const TGA_HEADER_LEN: usize = 18;

/// Image type 2: uncompressed true-color
const IMAGE_TYPE_TRUE_COLOR: u8 = 2;

/// Bits per pixel accepted by [`encode_tga`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TgaBitDepth {
    /// 5-5-5-1 packed, attribute bit clear
    Bpp16,
    /// B,G,R
    Bpp24,
    /// B,G,R,A
    Bpp32,
}

impl TgaBitDepth {
    pub const fn bits(self) -> u8 {
        match self {
            Self::Bpp16 => 16,
            Self::Bpp24 => 24,
            Self::Bpp32 => 32,
        }
    }

    pub const fn bytes_per_pixel(self) -> usize {
        self.bits() as usize / 8
    }
}

impl TryFrom<u8> for TgaBitDepth {
    type Error = FixtureError;

    fn try_from(bits: u8) -> FixtureResult<Self> {
        match bits {
            16 => Ok(Self::Bpp16),
            24 => Ok(Self::Bpp24),
            32 => Ok(Self::Bpp32),
            other => Err(FixtureError::invalid(format!(
                "unsupported TGA bit depth {other}, expected 16, 24 or 32"
            ))),
        }
    }
}

/// Exact size of the file [`encode_tga`] produces
pub fn tga_file_len(width: u32, height: u32, depth: TgaBitDepth) -> usize {
    TGA_HEADER_LEN + width as usize * height as usize * depth.bytes_per_pixel()
}

/// Encode `buffer` as an uncompressed TGA at the requested depth
pub fn encode_tga(buffer: &PixelBuffer, depth: TgaBitDepth) -> FixtureResult<Vec<u8>> {
    let width = u16::try_from(buffer.width())
        .map_err(|_| FixtureError::invalid(format!("TGA width {} exceeds 65535", buffer.width())))?;
    let height = u16::try_from(buffer.height())
        .map_err(|_| FixtureError::invalid(format!("TGA height {} exceeds 65535", buffer.height())))?;

    let total = tga_file_len(buffer.width(), buffer.height(), depth);
    let mut out = Vec::with_capacity(total);
    write_header(&mut out, width, height, depth);

    match depth {
        TgaBitDepth::Bpp32 => {
            let has_alpha = buffer.has_alpha();
            for px in buffer.pixels() {
                let alpha = if has_alpha { px[3] } else { 255 };
                out.extend_from_slice(&[px[2], px[1], px[0], alpha]);
            }
        }
        TgaBitDepth::Bpp24 => {
            for px in buffer.pixels() {
                out.extend_from_slice(&[px[2], px[1], px[0]]);
            }
        }
        TgaBitDepth::Bpp16 => {
            for px in buffer.pixels() {
                out.extend_from_slice(&pack_555(px[0], px[1], px[2]).to_le_bytes());
            }
        }
    }

    debug_assert_eq!(out.len(), total);
    Ok(out)
}

/// Pack 8-bit RGB into 5-5-5 with bit 15 clear, dropping the low 3 bits
pub const fn pack_555(r: u8, g: u8, b: u8) -> u16 {
    ((r as u16 >> 3) << 10) | ((g as u16 >> 3) << 5) | (b as u16 >> 3)
}

fn write_header(out: &mut Vec<u8>, width: u16, height: u16, depth: TgaBitDepth) {
    out.push(0); // ID length
    out.push(0); // color map type
    out.push(IMAGE_TYPE_TRUE_COLOR);
    // color map spec: first entry, length, entry size
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.push(0);
    // image spec
    out.extend_from_slice(&0u16.to_le_bytes()); // x origin
    out.extend_from_slice(&0u16.to_le_bytes()); // y origin
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.push(depth.bits());
    out.push(0); // descriptor
}

/// Structural header check for uncompressed and RLE TGA
pub fn is_tga(data: &[u8]) -> bool {
    if data.len() < TGA_HEADER_LEN {
        return false;
    }
    if data[1] > 1 || !matches!(data[2], 1 | 2 | 3 | 9 | 10 | 11) {
        return false;
    }
    let width = u16::from_le_bytes([data[12], data[13]]);
    let height = u16::from_le_bytes([data[14], data[15]]);
    width > 0 && height > 0 && matches!(data[16], 8 | 15 | 16 | 24 | 32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChannelLayout;

    fn rgba_2x2() -> PixelBuffer {
        PixelBuffer::new(
            2,
            2,
            ChannelLayout::Rgba,
            vec![
                10, 20, 30, 40, 50, 60, 70, 80, //
                90, 100, 110, 120, 130, 140, 150, 160,
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_rgba_2x2_at_32bit() {
        let tga = encode_tga(&rgba_2x2(), TgaBitDepth::Bpp32).unwrap();
        assert_eq!(tga.len(), 34);
        assert_eq!(&tga[18..22], &[30, 20, 10, 40]);
        assert_eq!(&tga[30..34], &[150, 140, 130, 160]);
    }

    #[test]
    fn test_header_layout() {
        let buffer = PixelBuffer::filled(300, 2, &[0, 0, 0]).unwrap();
        let tga = encode_tga(&buffer, TgaBitDepth::Bpp24).unwrap();
        assert_eq!(&tga[..12], &[0, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(u16::from_le_bytes([tga[12], tga[13]]), 300);
        assert_eq!(u16::from_le_bytes([tga[14], tga[15]]), 2);
        assert_eq!(tga[16], 24);
        assert_eq!(tga[17], 0);
        assert!(is_tga(&tga));
    }

    #[test]
    fn test_24bit_drops_alpha() {
        let tga = encode_tga(&rgba_2x2(), TgaBitDepth::Bpp24).unwrap();
        assert_eq!(tga.len(), 18 + 4 * 3);
        assert_eq!(&tga[18..24], &[30, 20, 10, 70, 60, 50]);
    }

    #[test]
    fn test_32bit_from_rgb_is_opaque() {
        let buffer = PixelBuffer::filled(1, 1, &[1, 2, 3]).unwrap();
        let tga = encode_tga(&buffer, TgaBitDepth::Bpp32).unwrap();
        assert_eq!(&tga[18..], &[3, 2, 1, 255]);
    }

    #[test]
    fn test_16bit_truncates_low_bits() {
        assert_eq!(pack_555(255, 255, 255), 0x7FFF);
        assert_eq!(pack_555(0b1111_1000, 0, 0), 0b11111 << 10);
        assert_eq!(pack_555(7, 7, 7), 0);
        assert_eq!(pack_555(8, 16, 24), (1 << 10) | (2 << 5) | 3);

        let buffer = PixelBuffer::filled(3, 2, &[200, 100, 50]).unwrap();
        let tga = encode_tga(&buffer, TgaBitDepth::Bpp16).unwrap();
        assert_eq!(tga.len(), 18 + 6 * 2);
        let word = u16::from_le_bytes([tga[18], tga[19]]);
        assert_eq!(word >> 15, 0);
        assert_eq!((word >> 10) & 0x1F, 200 >> 3);
        assert_eq!((word >> 5) & 0x1F, 100 >> 3);
        assert_eq!(word & 0x1F, 50 >> 3);
    }

    #[test]
    fn test_bit_depth_boundary() {
        assert_eq!(TgaBitDepth::try_from(16).unwrap(), TgaBitDepth::Bpp16);
        assert_eq!(TgaBitDepth::try_from(32).unwrap(), TgaBitDepth::Bpp32);
        assert!(TgaBitDepth::try_from(8).is_err());
        assert!(TgaBitDepth::try_from(15).is_err());
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        let buffer = PixelBuffer::filled(70_000, 1, &[0, 0, 0]).unwrap();
        assert!(matches!(
            encode_tga(&buffer, TgaBitDepth::Bpp24),
            Err(FixtureError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_file_len_formula() {
        for depth in [TgaBitDepth::Bpp16, TgaBitDepth::Bpp24, TgaBitDepth::Bpp32] {
            let buffer = PixelBuffer::filled(7, 5, &[1, 2, 3, 4]).unwrap();
            let tga = encode_tga(&buffer, depth).unwrap();
            assert_eq!(tga.len(), 18 + 7 * 5 * depth.bytes_per_pixel());
            assert_eq!(tga.len(), tga_file_len(7, 5, depth));
        }
    }
}
