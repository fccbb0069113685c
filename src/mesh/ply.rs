//! Stanford PLY writer, ASCII or binary little-endian
//!
//! Vertices carry `float x y z`; faces use `list uchar int vertex_indices`.

use crate::formats::Encoding;
use crate::types::{FixtureError, FixtureResult, Mesh};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlyOptions {
    pub encoding: Encoding,
    /// Optional `comment` header line
    pub comment: Option<String>,
}

impl Default for PlyOptions {
    fn default() -> Self {
        Self { encoding: Encoding::Binary, comment: None }
    }
}

impl PlyOptions {
    pub fn ascii() -> Self {
        Self { encoding: Encoding::Ascii, comment: None }
    }
}

pub fn encode_ply(mesh: &Mesh, options: &PlyOptions) -> FixtureResult<Vec<u8>> {
    mesh.validate()?;
    check_limits(mesh)?;

    let mut out = header(mesh, options)?.into_bytes();
    match options.encoding {
        Encoding::Ascii => write_ascii_body(mesh, &mut out),
        Encoding::Binary => write_binary_body(mesh, &mut out),
    }
    Ok(out)
}

fn check_limits(mesh: &Mesh) -> FixtureResult<()> {
    if mesh.vertex_count() > i32::MAX as usize {
        return Err(FixtureError::invalid(format!(
            "{} vertices cannot be indexed by PLY int",
            mesh.vertex_count()
        )));
    }
    if let Some((i, face)) = mesh.faces().iter().enumerate().find(|(_, f)| f.len() > usize::from(u8::MAX)) {
        return Err(FixtureError::invalid(format!(
            "face {i} has {} indices, the uchar count allows 255",
            face.len()
        )));
    }
    Ok(())
}

fn header(mesh: &Mesh, options: &PlyOptions) -> FixtureResult<String> {
    let format = match options.encoding {
        Encoding::Ascii => "ascii",
        Encoding::Binary => "binary_little_endian",
    };

    let mut h = String::new();
    h.push_str("ply\n");
    h.push_str(&format!("format {format} 1.0\n"));
    if let Some(comment) = &options.comment {
        if comment.contains(['\n', '\r']) {
            return Err(FixtureError::invalid("PLY comment must be a single line"));
        }
        h.push_str(&format!("comment {comment}\n"));
    }
    h.push_str(&format!("element vertex {}\n", mesh.vertex_count()));
    h.push_str("property float x\nproperty float y\nproperty float z\n");
    h.push_str(&format!("element face {}\n", mesh.face_count()));
    h.push_str("property list uchar int vertex_indices\n");
    h.push_str("end_header\n");
    Ok(h)
}

fn write_ascii_body(mesh: &Mesh, out: &mut Vec<u8>) {
    let mut body = String::with_capacity(mesh.vertex_count() * 32);
    for v in mesh.vertices() {
        body.push_str(&format!("{:?} {:?} {:?}\n", v.x, v.y, v.z));
    }
    for face in mesh.faces() {
        body.push_str(&face.len().to_string());
        for idx in face {
            body.push_str(&format!(" {idx}"));
        }
        body.push('\n');
    }
    out.extend_from_slice(body.as_bytes());
}

fn write_binary_body(mesh: &Mesh, out: &mut Vec<u8>) {
    let expected = out.len()
        + mesh.vertex_count() * 12
        + mesh.faces().iter().map(|f| 1 + f.len() * 4).sum::<usize>();
    out.reserve(expected - out.len());

    for v in mesh.vertices() {
        for component in v.to_array() {
            out.extend_from_slice(&component.to_le_bytes());
        }
    }
    // lengths and index ranges checked in check_limits
    for face in mesh.faces() {
        out.push(face.len() as u8);
        for &idx in face {
            out.extend_from_slice(&(idx as i32).to_le_bytes());
        }
    }

    debug_assert_eq!(out.len(), expected);
}
