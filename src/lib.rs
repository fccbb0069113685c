//! Deterministic image and mesh fixture synthesis
//!
//! Pixels and geometry are synthesized from a few parameters and written in
//! their container formats: TGA, STL, PLY, OBJ, glTF and GLB are encoded
//! here byte-for-byte, the remaining raster formats go through a
//! [`RasterCodec`](image::RasterCodec). [`FixtureCatalog`] runs the whole
//! size/quality matrix into a directory tree.

pub mod catalog;
pub mod config;
pub mod formats;
pub mod image;
pub mod mesh;
pub mod types;
pub mod user_feedback;

pub use crate::catalog::{CatalogReport, FixtureCatalog, FixtureEntry};
pub use crate::config::{FixtureConfig, QualityLevel, SizeClass};
pub use crate::formats::{CodecRequest, Encoding, ImageFormat, MeshFormat, MeshRequest, RasterRequest, SvgTemplate};
pub use crate::image::{encode_raster, ImageCrateCodec, Pattern, RasterCodec, TgaBitDepth};
pub use crate::mesh::{encode_mesh, MeshOutput};
pub use crate::types::*;
pub use crate::user_feedback::UserFeedback;
