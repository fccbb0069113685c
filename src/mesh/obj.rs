//! Wavefront OBJ text writer

use crate::types::{FixtureResult, Mesh};

/// Write `v` lines at six decimals and `f` lines with 1-based indices.
/// Polygons are kept as-is. Without a comment the header states the counts.
pub fn encode_obj(mesh: &Mesh, comment: Option<&str>) -> FixtureResult<Vec<u8>> {
    mesh.validate()?;

    let mut out = String::with_capacity(mesh.vertex_count() * 32 + mesh.face_count() * 16);
    match comment {
        Some(text) => {
            for line in text.lines() {
                out.push_str(&format!("# {line}\n"));
            }
        }
        None => {
            out.push_str(&format!("# {} vertices, {} faces\n", mesh.vertex_count(), mesh.face_count()));
        }
    }

    for v in mesh.vertices() {
        out.push_str(&format!("v {:.6} {:.6} {:.6}\n", v.x, v.y, v.z));
    }
    for face in mesh.faces() {
        out.push('f');
        for &idx in face {
            out.push_str(&format!(" {}", idx + 1));
        }
        out.push('\n');
    }

    Ok(out.into_bytes())
}
