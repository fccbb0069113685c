//! Image format handling

use serde::{Deserialize, Serialize};

use crate::image::tga::TgaBitDepth;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
    Bmp,
    Tiff,
    Ico,
    Svg,
    Tga,
}

impl ImageFormat {
    pub const ALL: [Self; 9] = [
        Self::Png,
        Self::Jpeg,
        Self::WebP,
        Self::Gif,
        Self::Bmp,
        Self::Tiff,
        Self::Ico,
        Self::Svg,
        Self::Tga,
    ];

    /// Get file extension for this format
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Ico => "ico",
            Self::Svg => "svg",
            Self::Tga => "tga",
        }
    }

    /// Fixture subdirectory and filename tag
    pub const fn family(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::WebP => "webp",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
            Self::Ico => "ico",
            Self::Svg => "svg",
            Self::Tga => "tga",
        }
    }
}

/// Which SVG document to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SvgTemplate {
    /// Background, one circle, one label
    Simple,
    /// Gradient background, translucent circle and triangle
    Complex,
}

impl SvgTemplate {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Complex => "complex",
        }
    }
}

/// Request handled by the external raster codec capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecRequest {
    Png,
    Jpeg { quality: u8 },
    /// `None` requests exact encoding
    WebP { quality: Option<u8> },
    Gif,
    /// Every frame shown for `delay_ms`; `loop_count` 0 repeats forever
    AnimatedGif { delay_ms: u32, loop_count: u16 },
    Bmp,
    Tiff { lzw: bool },
    /// One directory entry per frame
    Ico,
    Svg(SvgTemplate),
}

impl CodecRequest {
    pub const fn format(&self) -> ImageFormat {
        match self {
            Self::Png => ImageFormat::Png,
            Self::Jpeg { .. } => ImageFormat::Jpeg,
            Self::WebP { .. } => ImageFormat::WebP,
            Self::Gif | Self::AnimatedGif { .. } => ImageFormat::Gif,
            Self::Bmp => ImageFormat::Bmp,
            Self::Tiff { .. } => ImageFormat::Tiff,
            Self::Ico => ImageFormat::Ico,
            Self::Svg(_) => ImageFormat::Svg,
        }
    }

    /// Whether the request consumes more than one frame
    pub const fn is_multi_frame(&self) -> bool {
        matches!(self, Self::AnimatedGif { .. } | Self::Ico)
    }
}

/// Raster encoding request: TGA is written here, everything else goes to the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterRequest {
    Tga(TgaBitDepth),
    Codec(CodecRequest),
}

impl RasterRequest {
    pub const fn format(&self) -> ImageFormat {
        match self {
            Self::Tga(_) => ImageFormat::Tga,
            Self::Codec(req) => req.format(),
        }
    }
}

impl From<CodecRequest> for RasterRequest {
    fn from(req: CodecRequest) -> Self {
        Self::Codec(req)
    }
}
