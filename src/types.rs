//! Core types and data structures

use std::path::PathBuf;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main result type for fixture synthesis
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Error type for all fixture synthesis operations
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Caller contract violation, rejected before any bytes are produced
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The external raster codec refused or failed the encode
    #[error("{format} encoding failed: {message}")]
    Codec { format: &'static str, message: String },

    /// Filesystem failure while persisting a fixture
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FixtureError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn codec(format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Codec { format, message: err.to_string() }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

/// Sample layout of a [`PixelBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelLayout {
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub const fn channels(self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

/// Row-major 8-bit RGB(A) raster, top row first.
///
/// The sample vector is always exactly `width * height * channels` long;
/// the only way to build one is through [`PixelBuffer::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    data: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, layout: ChannelLayout, data: Vec<u8>) -> FixtureResult<Self> {
        if width == 0 || height == 0 {
            return Err(FixtureError::invalid(format!(
                "pixel buffer dimensions must be positive, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(layout.channels()))
            .ok_or_else(|| FixtureError::invalid("pixel buffer size overflows usize"))?;
        if data.len() != expected {
            return Err(FixtureError::invalid(format!(
                "pixel buffer holds {} bytes, {width}x{height} {layout:?} needs {expected}",
                data.len()
            )));
        }
        Ok(Self { width, height, layout, data })
    }

    /// Buffer of one repeated color
    pub fn filled(width: u32, height: u32, color: &[u8]) -> FixtureResult<Self> {
        let layout = match color.len() {
            3 => ChannelLayout::Rgb,
            4 => ChannelLayout::Rgba,
            n => return Err(FixtureError::invalid(format!("fill color must have 3 or 4 channels, got {n}"))),
        };
        let count = (width as usize) * (height as usize);
        Self::new(width, height, layout, color.repeat(count))
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }

    pub const fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub const fn channels(&self) -> usize {
        self.layout.channels()
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self.layout, ChannelLayout::Rgba)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Samples of the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels();
        let idx = (y as usize * self.width as usize + x as usize) * c;
        &self.data[idx..idx + c]
    }

    pub fn pixels(&self) -> core::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels())
    }

    /// Copy with an opaque alpha channel added (no-op for RGBA)
    pub fn to_rgba(&self) -> Self {
        match self.layout {
            ChannelLayout::Rgba => self.clone(),
            ChannelLayout::Rgb => {
                let mut data = Vec::with_capacity(self.pixel_count() * 4);
                for px in self.pixels() {
                    data.extend_from_slice(px);
                    data.push(255);
                }
                Self { width: self.width, height: self.height, layout: ChannelLayout::Rgba, data }
            }
        }
    }

    /// Copy with the alpha channel dropped (no-op for RGB)
    pub fn to_rgb(&self) -> Self {
        match self.layout {
            ChannelLayout::Rgb => self.clone(),
            ChannelLayout::Rgba => {
                let mut data = Vec::with_capacity(self.pixel_count() * 3);
                for px in self.pixels() {
                    data.extend_from_slice(&px[..3]);
                }
                Self { width: self.width, height: self.height, layout: ChannelLayout::Rgb, data }
            }
        }
    }
}

/// Axis-aligned bounds of a vertex set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

/// Indexed polygon mesh.
///
/// Faces hold 0-based indices into `vertices`; every face has at least
/// three indices, every index is in range and every coordinate is finite.
/// [`Mesh::new`] enforces this.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    faces: Vec<Vec<u32>>,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> FixtureResult<Self> {
        let mesh = Self { vertices, faces };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Built-in primitives whose indices are known to be in range
    pub(crate) fn from_trusted(vertices: Vec<Vec3>, faces: Vec<Vec<u32>>) -> Self {
        let mesh = Self { vertices, faces };
        debug_assert!(mesh.validate().is_ok());
        mesh
    }

    /// Check the index invariants
    pub fn validate(&self) -> FixtureResult<()> {
        if self.vertices.is_empty() {
            return Err(FixtureError::invalid("mesh has no vertices"));
        }
        if let Some(i) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(FixtureError::invalid(format!(
                "vertex {i} is not finite: {:?}",
                self.vertices[i]
            )));
        }
        let count = self.vertices.len();
        for (i, face) in self.faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(FixtureError::invalid(format!(
                    "face {i} has {} indices, at least 3 required",
                    face.len()
                )));
            }
            if let Some(&bad) = face.iter().find(|&&idx| idx as usize >= count) {
                return Err(FixtureError::invalid(format!(
                    "face {i} references vertex {bad}, mesh has {count}"
                )));
            }
        }
        Ok(())
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[Vec<u32>] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Number of triangles after fan triangulation
    pub fn triangle_count(&self) -> usize {
        self.faces.iter().map(|f| f.len() - 2).sum()
    }

    /// Fan-split every polygon into `k - 2` triangles
    pub fn triangulated(&self) -> Self {
        let mut faces = Vec::with_capacity(self.triangle_count());
        for face in &self.faces {
            for i in 1..face.len() - 1 {
                faces.push(vec![face[0], face[i], face[i + 1]]);
            }
        }
        Self { vertices: self.vertices.clone(), faces }
    }

    /// Flattened triangle index list, fan-triangulated
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.triangle_count() * 3);
        for face in &self.faces {
            for i in 1..face.len() - 1 {
                indices.extend_from_slice(&[face[0], face[i], face[i + 1]]);
            }
        }
        indices
    }

    pub fn bounds(&self) -> BoundingBox {
        let (min, max) = self.vertices.iter().fold(
            (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
            |(lo, hi), v| (lo.min(*v), hi.max(*v)),
        );
        BoundingBox { min: min.to_array(), max: max.to_array() }
    }
}
