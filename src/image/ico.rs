//! ICO via the `ico` crate; each entry is stored PNG-compressed or as a DIB
//! at the crate's discretion

use ico::{IconDir, IconDirEntry, IconImage, ResourceType};

use crate::types::{FixtureError, FixtureResult, PixelBuffer};

/// Largest side an ICO directory entry can describe
pub const MAX_ICO_SIDE: u32 = 256;

/// One directory entry per buffer, in order
pub fn encode_ico(images: &[PixelBuffer]) -> FixtureResult<Vec<u8>> {
    if images.is_empty() {
        return Err(FixtureError::invalid("ICO needs at least one image"));
    }

    let mut dir = IconDir::new(ResourceType::Icon);
    for buffer in images {
        if buffer.width() > MAX_ICO_SIDE || buffer.height() > MAX_ICO_SIDE {
            return Err(FixtureError::invalid(format!(
                "ICO entry {}x{} exceeds {MAX_ICO_SIDE}x{MAX_ICO_SIDE}",
                buffer.width(),
                buffer.height()
            )));
        }
        let image = IconImage::from_rgba_data(buffer.width(), buffer.height(), buffer.to_rgba().into_bytes());
        let entry = IconDirEntry::encode(&image).map_err(|e| FixtureError::codec("ICO", e))?;
        dir.add_entry(entry);
    }

    let mut out = Vec::new();
    dir.write(&mut out).map_err(|e| FixtureError::codec("ICO", e))?;
    Ok(out)
}

pub fn is_ico(data: &[u8]) -> bool {
    data.len() >= 6 && data[0..4] == [0, 0, 1, 0]
}
