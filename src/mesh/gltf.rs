//! glTF 2.0 writer: JSON + external `.bin` pair, or a single GLB container
//!
//! Both variants share one document builder over a buffer laid out as
//! positions then, optionally, triangle indices.

use serde_json::{json, Value};

use crate::types::{FixtureError, FixtureResult, Mesh};

pub const GLB_MAGIC: &[u8; 4] = b"glTF";
pub const GLB_VERSION: u32 = 2;
pub const GLB_HEADER_LEN: usize = 12;
pub const GLB_CHUNK_HEADER_LEN: usize = 8;
/// "JSON" as a little-endian u32
pub const CHUNK_JSON: u32 = 0x4E4F_534A;
/// "BIN\0" as a little-endian u32
pub const CHUNK_BIN: u32 = 0x004E_4942;

const COMPONENT_UNSIGNED_SHORT: u32 = 5123;
const COMPONENT_UNSIGNED_INT: u32 = 5125;
const COMPONENT_FLOAT: u32 = 5126;
const TARGET_ARRAY_BUFFER: u32 = 34962;
const TARGET_ELEMENT_ARRAY_BUFFER: u32 = 34963;
const MODE_TRIANGLES: u32 = 4;

const GENERATOR: &str = concat!("pixie-fixtures ", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GltfOptions {
    /// `buffers[0].uri` of a `.gltf` document; unused in GLB
    pub buffer_uri: String,
    /// Emit a fan-triangulated index accessor
    pub indexed: bool,
}

impl Default for GltfOptions {
    fn default() -> Self {
        Self { buffer_uri: "buffer.bin".to_string(), indexed: true }
    }
}

impl GltfOptions {
    pub fn with_buffer_uri(uri: impl Into<String>) -> Self {
        Self { buffer_uri: uri.into(), ..Self::default() }
    }

    pub fn positions_only() -> Self {
        Self { indexed: false, ..Self::default() }
    }
}

/// `.gltf` document and the `.bin` it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GltfPair {
    pub json: Vec<u8>,
    pub bin: Vec<u8>,
}

/// Binary payload plus the document describing it
struct Assembled {
    document: Value,
    buffer: Vec<u8>,
}

fn assemble(mesh: &Mesh, options: &GltfOptions) -> FixtureResult<Assembled> {
    mesh.validate()?;

    let vertex_count = mesh.vertex_count();
    let mut buffer = Vec::with_capacity(vertex_count * 12);
    for v in mesh.vertices() {
        for component in v.to_array() {
            buffer.extend_from_slice(&component.to_le_bytes());
        }
    }
    let positions_len = buffer.len();
    let bounds = mesh.bounds();

    let mut accessors = vec![json!({
        "bufferView": 0,
        "componentType": COMPONENT_FLOAT,
        "count": vertex_count,
        "type": "VEC3",
        "min": bounds.min,
        "max": bounds.max,
    })];
    let mut views = vec![json!({
        "buffer": 0,
        "byteOffset": 0,
        "byteLength": positions_len,
        "target": TARGET_ARRAY_BUFFER,
    })];
    let mut primitive = json!({
        "attributes": { "POSITION": 0 },
        "mode": MODE_TRIANGLES,
    });

    let indices = if options.indexed { mesh.triangle_indices() } else { Vec::new() };
    if !indices.is_empty() {
        let component = if vertex_count <= usize::from(u16::MAX) {
            // every index < vertex_count <= 65535
            for &i in &indices {
                buffer.extend_from_slice(&(i as u16).to_le_bytes());
            }
            COMPONENT_UNSIGNED_SHORT
        } else {
            for &i in &indices {
                buffer.extend_from_slice(&i.to_le_bytes());
            }
            COMPONENT_UNSIGNED_INT
        };

        accessors.push(json!({
            "bufferView": 1,
            "componentType": component,
            "count": indices.len(),
            "type": "SCALAR",
        }));
        views.push(json!({
            "buffer": 0,
            "byteOffset": positions_len,
            "byteLength": buffer.len() - positions_len,
            "target": TARGET_ELEMENT_ARRAY_BUFFER,
        }));
        primitive["indices"] = json!(1);
    }

    let document = json!({
        "asset": { "version": "2.0", "generator": GENERATOR },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "mesh": 0 }],
        "meshes": [{ "primitives": [primitive] }],
        "accessors": accessors,
        "bufferViews": views,
        "buffers": [{ "byteLength": buffer.len() }],
    });

    Ok(Assembled { document, buffer })
}

/// Pretty-printed `.gltf` whose buffer lives in `options.buffer_uri`
pub fn encode_gltf(mesh: &Mesh, options: &GltfOptions) -> FixtureResult<GltfPair> {
    if options.buffer_uri.is_empty() {
        return Err(FixtureError::invalid("glTF buffer uri must not be empty"));
    }

    let Assembled { mut document, buffer } = assemble(mesh, options)?;
    document["buffers"][0]["uri"] = json!(options.buffer_uri);

    let json = serde_json::to_vec_pretty(&document).map_err(|e| FixtureError::codec("glTF", e))?;
    Ok(GltfPair { json, bin: buffer })
}

pub fn encode_glb(mesh: &Mesh, options: &GltfOptions) -> FixtureResult<Vec<u8>> {
    let Assembled { document, buffer } = assemble(mesh, options)?;
    let json = serde_json::to_vec(&document).map_err(|e| FixtureError::codec("GLB", e))?;
    assemble_glb(&json, &buffer)
}

const fn padding(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Exact container size for the given unpadded chunk payloads
pub const fn glb_len(json_len: usize, bin_len: usize) -> usize {
    let bin_chunk = if bin_len == 0 { 0 } else { GLB_CHUNK_HEADER_LEN + bin_len + padding(bin_len) };
    GLB_HEADER_LEN + GLB_CHUNK_HEADER_LEN + json_len + padding(json_len) + bin_chunk
}

/// Wrap a JSON document and binary buffer in the GLB container. JSON is
/// padded with spaces, BIN with zeros; an empty buffer gets no BIN chunk.
pub fn assemble_glb(json: &[u8], bin: &[u8]) -> FixtureResult<Vec<u8>> {
    let total = glb_len(json.len(), bin.len());
    let total_u32 = u32::try_from(total)
        .map_err(|_| FixtureError::invalid(format!("GLB of {total} bytes overflows the length field")))?;

    let json_padding = padding(json.len());
    let bin_padding = padding(bin.len());

    let mut glb = Vec::with_capacity(total);
    glb.extend_from_slice(GLB_MAGIC);
    glb.extend_from_slice(&GLB_VERSION.to_le_bytes());
    glb.extend_from_slice(&total_u32.to_le_bytes());

    // chunk lengths are bounded by total_u32
    glb.extend_from_slice(&((json.len() + json_padding) as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json);
    glb.extend(std::iter::repeat(b' ').take(json_padding));

    if !bin.is_empty() {
        glb.extend_from_slice(&((bin.len() + bin_padding) as u32).to_le_bytes());
        glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        glb.extend_from_slice(bin);
        glb.extend(std::iter::repeat(0u8).take(bin_padding));
    }

    debug_assert_eq!(glb.len(), total);
    Ok(glb)
}
