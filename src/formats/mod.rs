//! Format tags and per-format encoding requests

pub mod image;
pub mod mesh;

pub use image::{CodecRequest, ImageFormat, RasterRequest, SvgTemplate};
pub use mesh::{Encoding, MeshFormat, MeshRequest};
