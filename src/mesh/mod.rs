//! Mesh synthesis and container writers

pub mod geometry;
pub mod gltf;
pub mod obj;
pub mod ply;
pub mod stl;

use crate::formats::MeshRequest;
use crate::types::{FixtureResult, Mesh};

pub use gltf::GltfPair;

/// Bytes produced for one mesh fixture
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshOutput {
    Single(Vec<u8>),
    /// `.gltf` document plus its companion buffer
    Gltf(GltfPair),
}

impl MeshOutput {
    pub fn total_len(&self) -> usize {
        match self {
            Self::Single(bytes) => bytes.len(),
            Self::Gltf(pair) => pair.json.len() + pair.bin.len(),
        }
    }
}

/// Encode `mesh` in the container named by `request`
pub fn encode_mesh(mesh: &Mesh, request: &MeshRequest) -> FixtureResult<MeshOutput> {
    let output = match request {
        MeshRequest::Obj { comment } => MeshOutput::Single(obj::encode_obj(mesh, comment.as_deref())?),
        MeshRequest::Stl(options) => MeshOutput::Single(stl::encode_stl(mesh, options)?),
        MeshRequest::Ply(options) => MeshOutput::Single(ply::encode_ply(mesh, options)?),
        MeshRequest::Gltf(options) => MeshOutput::Gltf(gltf::encode_gltf(mesh, options)?),
        MeshRequest::Glb(options) => MeshOutput::Single(gltf::encode_glb(mesh, options)?),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::Encoding;

    #[test]
    fn test_dispatch() {
        let mesh = geometry::simple_quad();
        let obj = encode_mesh(&mesh, &MeshRequest::Obj { comment: None }).unwrap();
        assert!(matches!(obj, MeshOutput::Single(ref b) if b.starts_with(b"# ")));

        let ply = encode_mesh(&mesh, &MeshRequest::Ply(ply::PlyOptions::ascii())).unwrap();
        assert!(matches!(ply, MeshOutput::Single(ref b) if b.starts_with(b"ply\n")));

        let stl = stl::StlOptions { encoding: Encoding::Binary, ..Default::default() };
        let out = encode_mesh(&mesh, &MeshRequest::Stl(stl)).unwrap();
        assert_eq!(out.total_len(), stl::binary_stl_len(2));

        let gltf = encode_mesh(&mesh, &MeshRequest::Gltf(gltf::GltfOptions::default())).unwrap();
        assert!(matches!(gltf, MeshOutput::Gltf(ref pair) if pair.bin.len() == 48 + 12));
    }
}
