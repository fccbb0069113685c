//! Mesh format handling

use serde::{Deserialize, Serialize};

use crate::mesh::gltf::GltfOptions;
use crate::mesh::ply::PlyOptions;
use crate::mesh::stl::StlOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeshFormat {
    Obj,  // Wavefront OBJ, text
    Stl,  // STereoLithography, ASCII or binary
    Ply,  // Stanford PLY, ASCII or binary little-endian
    Gltf, // glTF 2.0 JSON + external buffer
    Glb,  // glTF 2.0 binary container
}

impl MeshFormat {
    pub const ALL: [Self; 5] = [Self::Obj, Self::Stl, Self::Ply, Self::Gltf, Self::Glb];

    /// File extension, also the fixture subdirectory name
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Obj => "obj",
            Self::Stl => "stl",
            Self::Ply => "ply",
            Self::Gltf => "gltf",
            Self::Glb => "glb",
        }
    }
}

/// Text or binary body for formats that have both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    Ascii,
    /// Little-endian binary
    Binary,
}

/// Mesh encoding request, one variant per container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshRequest {
    Obj { comment: Option<String> },
    Stl(StlOptions),
    Ply(PlyOptions),
    Gltf(GltfOptions),
    Glb(GltfOptions),
}

impl MeshRequest {
    pub const fn format(&self) -> MeshFormat {
        match self {
            Self::Obj { .. } => MeshFormat::Obj,
            Self::Stl(_) => MeshFormat::Stl,
            Self::Ply(_) => MeshFormat::Ply,
            Self::Gltf(_) => MeshFormat::Gltf,
            Self::Glb(_) => MeshFormat::Glb,
        }
    }
}
