//! STL writer, ASCII and binary
//!
//! Binary layout: 80-byte header, LE u32 triangle count, then per triangle
//! 12 LE f32 (normal, three vertices) and a zero u16 attribute word.

use glam::Vec3;

use crate::formats::Encoding;
use crate::types::{FixtureError, FixtureResult, Mesh};

pub const STL_HEADER_LEN: usize = 80;
pub const STL_TRIANGLE_LEN: usize = 50;

const HEADER_SIGNATURE: &[u8] = b"Binary STL created by test fixture generator";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StlOptions {
    pub encoding: Encoding,
    /// Solid name for ASCII output
    pub name: String,
    /// Fan-split polygons instead of keeping their first three indices
    pub triangulate: bool,
}

impl Default for StlOptions {
    fn default() -> Self {
        Self { encoding: Encoding::Binary, name: "fixture".to_string(), triangulate: false }
    }
}

impl StlOptions {
    pub fn ascii(name: impl Into<String>) -> Self {
        Self { encoding: Encoding::Ascii, name: name.into(), ..Self::default() }
    }

    pub fn with_triangulation(mut self) -> Self {
        self.triangulate = true;
        self
    }
}

/// Unit normal of `(b - a) x (c - a)`; zero for degenerate triangles
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

/// Exact size of a binary STL holding `triangles` facets
pub const fn binary_stl_len(triangles: usize) -> usize {
    STL_HEADER_LEN + 4 + triangles * STL_TRIANGLE_LEN
}

pub fn encode_stl(mesh: &Mesh, options: &StlOptions) -> FixtureResult<Vec<u8>> {
    mesh.validate()?;

    let triangulated;
    let source = if options.triangulate {
        triangulated = mesh.triangulated();
        &triangulated
    } else {
        mesh
    };

    let triangles = facets(source);
    match options.encoding {
        Encoding::Ascii => encode_ascii(&triangles, &options.name),
        Encoding::Binary => encode_binary(&triangles),
    }
}

/// First three corners of every face
fn facets(mesh: &Mesh) -> Vec<[Vec3; 3]> {
    let verts = mesh.vertices();
    mesh.faces()
        .iter()
        .map(|f| [verts[f[0] as usize], verts[f[1] as usize], verts[f[2] as usize]])
        .collect()
}

fn encode_ascii(triangles: &[[Vec3; 3]], name: &str) -> FixtureResult<Vec<u8>> {
    if name.contains(['\n', '\r']) {
        return Err(FixtureError::invalid("STL solid name must be a single line"));
    }

    let mut out = String::with_capacity(triangles.len() * 200);
    out.push_str(&format!("solid {name}\n"));
    for [a, b, c] in triangles {
        let n = face_normal(*a, *b, *c);
        out.push_str(&format!("  facet normal {:?} {:?} {:?}\n", n.x, n.y, n.z));
        out.push_str("    outer loop\n");
        for v in [a, b, c] {
            out.push_str(&format!("      vertex {:?} {:?} {:?}\n", v.x, v.y, v.z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }
    out.push_str(&format!("endsolid {name}\n"));
    Ok(out.into_bytes())
}

fn encode_binary(triangles: &[[Vec3; 3]]) -> FixtureResult<Vec<u8>> {
    let count = u32::try_from(triangles.len())
        .map_err(|_| FixtureError::invalid(format!("{} triangles overflow the STL count field", triangles.len())))?;

    let total = binary_stl_len(triangles.len());
    let mut out = Vec::with_capacity(total);

    out.extend_from_slice(HEADER_SIGNATURE);
    out.resize(STL_HEADER_LEN, 0);
    out.extend_from_slice(&count.to_le_bytes());

    for [a, b, c] in triangles {
        let n = face_normal(*a, *b, *c);
        for v in [n, *a, *b, *c] {
            for component in v.to_array() {
                out.extend_from_slice(&component.to_le_bytes());
            }
        }
        out.extend_from_slice(&0u16.to_le_bytes());
    }

    debug_assert_eq!(out.len(), total);
    Ok(out)
}
