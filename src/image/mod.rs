//! Raster containers
//!
//! TGA is written byte-by-byte here. Every other raster format goes through
//! the [`RasterCodec`] capability, whose default implementation wraps the
//! `image`, `gif`, `tiff`, `ico`, `image-webp` and `webp` encoders. Codec
//! output is checked against the requested container's signature.

pub mod bmp;
pub mod gif;
pub mod ico;
pub mod jpeg;
pub mod pattern;
pub mod png;
pub mod svg;
pub mod tga;
pub mod tiff;
pub mod webp;

use image::ExtendedColorType;

use crate::formats::{CodecRequest, ImageFormat, RasterRequest};
use crate::types::{ChannelLayout, FixtureError, FixtureResult, PixelBuffer};

pub use pattern::{synthesize, Pattern};
pub use tga::{encode_tga, TgaBitDepth};

/// Encoder for the raster formats the engine does not own
pub trait RasterCodec: Send + Sync {
    /// Encode one or more frames; only animated GIF and ICO accept more than one
    fn encode_frames(&self, frames: &[PixelBuffer], request: &CodecRequest) -> FixtureResult<Vec<u8>>;

    fn encode(&self, buffer: &PixelBuffer, request: &CodecRequest) -> FixtureResult<Vec<u8>> {
        self.encode_frames(core::slice::from_ref(buffer), request)
    }
}

/// Default codec backed by pure-Rust encoder crates
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl RasterCodec for ImageCrateCodec {
    fn encode_frames(&self, frames: &[PixelBuffer], request: &CodecRequest) -> FixtureResult<Vec<u8>> {
        if !request.is_multi_frame() && frames.len() != 1 {
            return Err(FixtureError::invalid(format!(
                "{} takes exactly one frame, got {}",
                request.format().family(),
                frames.len()
            )));
        }

        match *request {
            CodecRequest::Png => png::encode_png(&frames[0]),
            CodecRequest::Jpeg { quality } => jpeg::encode_jpeg(&frames[0], quality),
            CodecRequest::WebP { quality } => webp::encode_webp(&frames[0], quality),
            CodecRequest::Gif => gif::encode_gif(&frames[0]),
            CodecRequest::AnimatedGif { delay_ms, loop_count } => {
                gif::encode_animated_gif(frames, gif::Animation { delay_ms, loop_count })
            }
            CodecRequest::Bmp => bmp::encode_bmp(&frames[0]),
            CodecRequest::Tiff { lzw } => tiff::encode_tiff(&frames[0], lzw),
            CodecRequest::Ico => ico::encode_ico(frames),
            CodecRequest::Svg(template) => {
                Ok(svg::render_svg(template, frames[0].width(), frames[0].height()).into_bytes())
            }
        }
    }
}

/// Encode `frames` for `request`: TGA locally, everything else through `codec`
pub fn encode_raster(
    codec: &dyn RasterCodec,
    frames: &[PixelBuffer],
    request: &RasterRequest,
) -> FixtureResult<Vec<u8>> {
    match request {
        RasterRequest::Tga(depth) => match frames {
            [buffer] => encode_tga(buffer, *depth),
            _ => Err(FixtureError::invalid(format!("TGA takes exactly one frame, got {}", frames.len()))),
        },
        RasterRequest::Codec(req) => {
            let data = codec.encode_frames(frames, req)?;
            let format = req.format();
            if !has_signature(format, &data) {
                return Err(FixtureError::codec(
                    format.family(),
                    format!("codec output ({} bytes) is not a {} container", data.len(), format.family()),
                ));
            }
            Ok(data)
        }
    }
}

/// Magic-number check for an encoded container
pub fn has_signature(format: ImageFormat, data: &[u8]) -> bool {
    match format {
        ImageFormat::Png => png::is_png(data),
        ImageFormat::Jpeg => jpeg::is_jpeg(data),
        ImageFormat::WebP => webp::is_webp(data),
        ImageFormat::Gif => gif::is_gif(data),
        ImageFormat::Bmp => bmp::is_bmp(data),
        ImageFormat::Tiff => tiff::is_tiff(data),
        ImageFormat::Ico => ico::is_ico(data),
        ImageFormat::Svg => svg::is_svg(data),
        ImageFormat::Tga => tga::is_tga(data),
    }
}

pub(crate) fn extended_color_type(buffer: &PixelBuffer) -> ExtendedColorType {
    match buffer.layout() {
        ChannelLayout::Rgb => ExtendedColorType::Rgb8,
        ChannelLayout::Rgba => ExtendedColorType::Rgba8,
    }
}
