//! Round trips through conformant third-party readers

use std::io::Cursor;

use pixie_fixtures::image::pattern::{synthesize, with_radial_alpha, Pattern};
use pixie_fixtures::image::tga::encode_tga;
use pixie_fixtures::mesh::geometry::{cube, grid, icosphere, point_ring, simple_quad, simple_triangle, triangle_ring};
use pixie_fixtures::mesh::gltf::{encode_glb, encode_gltf, GltfOptions};
use pixie_fixtures::mesh::obj::encode_obj;
use pixie_fixtures::mesh::ply::{encode_ply, PlyOptions};
use pixie_fixtures::mesh::stl::{encode_stl, StlOptions};
use pixie_fixtures::{CodecRequest, ImageCrateCodec, Mesh, RasterCodec, TgaBitDepth};

use glam::Vec3;

use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Encoding as PlyEncoding, Property};

#[test]
fn tga_decodes_bottom_up() {
    let buffer = synthesize(20, 10, Pattern::Gradient).unwrap();
    for depth in [TgaBitDepth::Bpp24, TgaBitDepth::Bpp32] {
        let tga = encode_tga(&buffer, depth).unwrap();
        let decoded = image::load_from_memory_with_format(&tga, image::ImageFormat::Tga).unwrap().to_rgb8();
        // descriptor 0 declares a bottom-left origin while rows are written top first
        let flipped = image::imageops::flip_vertical(&decoded);
        assert_eq!(flipped.as_raw(), buffer.as_bytes());
    }
}

#[test]
fn tga_32bit_keeps_alpha() {
    let buffer = with_radial_alpha(&synthesize(16, 16, Pattern::Gradient).unwrap()).unwrap();
    let tga = encode_tga(&buffer, TgaBitDepth::Bpp32).unwrap();
    let decoded = image::load_from_memory_with_format(&tga, image::ImageFormat::Tga).unwrap().to_rgba8();
    let flipped = image::imageops::flip_vertical(&decoded);
    assert_eq!(flipped.as_raw(), buffer.as_bytes());
}

#[test]
fn binary_stl_reads_back() {
    let mesh = triangle_ring(100).unwrap();
    let stl = encode_stl(&mesh, &StlOptions::default()).unwrap();
    let read = stl_io::read_stl(&mut Cursor::new(&stl)).unwrap();
    assert_eq!(read.faces.len(), 100);

    for face in &read.faces {
        let n = face.normal;
        assert!((n[2].abs() - 1.0).abs() < 1e-5);
    }
    let first = read.vertices[read.faces[0].vertices[0]];
    assert!((first[0] - 1.0).abs() < 1e-6);
}

#[test]
fn ascii_stl_cube_reads_back() {
    let options = StlOptions::ascii("SimpleCube").with_triangulation();
    let stl = encode_stl(&cube(), &options).unwrap();
    let read = stl_io::read_stl(&mut Cursor::new(&stl)).unwrap();
    assert_eq!(read.faces.len(), 12);
    assert_eq!(read.vertices.len(), 8);
}

fn parse_ply(data: &[u8]) -> ply_rs::ply::Ply<DefaultElement> {
    Parser::<DefaultElement>::new().read_ply(&mut Cursor::new(data)).unwrap()
}

fn float(element: &DefaultElement, key: &str) -> f32 {
    match element[key] {
        Property::Float(v) => v,
        ref other => panic!("{key} is {other:?}"),
    }
}

fn indices(element: &DefaultElement) -> Vec<i32> {
    match &element["vertex_indices"] {
        Property::ListInt(v) => v.clone(),
        other => panic!("vertex_indices is {other:?}"),
    }
}

#[test]
fn binary_ply_reads_back() {
    let mesh = point_ring(100, 42).unwrap();
    let ply = parse_ply(&encode_ply(&mesh, &PlyOptions::default()).unwrap());
    assert_eq!(ply.header.encoding, PlyEncoding::BinaryLittleEndian);

    let vertices = &ply.payload["vertex"];
    let faces = &ply.payload["face"];
    assert_eq!(vertices.len(), 100);
    assert_eq!(faces.len(), 98);

    for (read, expected) in vertices.iter().zip(mesh.vertices()) {
        assert_eq!(float(read, "x"), expected.x);
        assert_eq!(float(read, "y"), expected.y);
        assert_eq!(float(read, "z"), expected.z);
    }
    assert_eq!(indices(&faces[97]), vec![97, 98, 99]);
}

#[test]
fn binary_ply_mixed_polygons_read_back() {
    let vertices = (0..6).map(|i| Vec3::new(i as f32, 0.5 * i as f32, 1.0)).collect();
    let faces = vec![vec![0, 1, 2, 3], vec![0, 1, 2, 3, 4], vec![3, 4, 5]];
    let mesh = Mesh::new(vertices, faces).unwrap();

    let ply = parse_ply(&encode_ply(&mesh, &PlyOptions::default()).unwrap());
    let read: Vec<Vec<i32>> = ply.payload["face"].iter().map(indices).collect();
    assert_eq!(read, vec![vec![0, 1, 2, 3], vec![0, 1, 2, 3, 4], vec![3, 4, 5]]);
    assert_eq!(float(&ply.payload["vertex"][5], "y"), 2.5);
}

#[test]
fn ascii_ply_reads_back() {
    let options = PlyOptions { comment: Some("simple quad".into()), ..PlyOptions::ascii() };
    let ply = parse_ply(&encode_ply(&simple_quad(), &options).unwrap());
    assert_eq!(ply.header.encoding, PlyEncoding::Ascii);
    assert_eq!(ply.header.comments, vec!["simple quad".to_string()]);
    assert_eq!(indices(&ply.payload["face"][1]), vec![0, 2, 3]);
    assert_eq!(float(&ply.payload["vertex"][2], "y"), 1.0);
}

fn load_obj(data: &[u8]) -> Vec<tobj::Model> {
    let (models, _) = tobj::load_obj_buf(&mut Cursor::new(data), &tobj::LoadOptions::default(), |_| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .unwrap();
    models
}

#[test]
fn obj_reads_back() {
    let models = load_obj(&encode_obj(&icosphere(2), None).unwrap());
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].mesh.positions.len(), 12 * 3);
    assert_eq!(models[0].mesh.indices.len(), 20 * 3);

    let models = load_obj(&encode_obj(&grid(10).unwrap(), Some("grid")).unwrap());
    assert_eq!(models[0].mesh.positions.len(), 11 * 11 * 3);
    assert_eq!(models[0].mesh.indices.len(), 200 * 3);
}

#[test]
fn obj_keeps_quads() {
    let models = load_obj(&encode_obj(&cube(), None).unwrap());
    assert_eq!(models[0].mesh.indices.len(), 24);
    assert_eq!(models[0].mesh.face_arities, vec![4; 6]);
}

#[test]
fn glb_passes_gltf_validation() {
    let glb = encode_glb(&cube(), &GltfOptions::default()).unwrap();
    let gltf = gltf::Gltf::from_slice(&glb).unwrap();
    assert_eq!(gltf.blob.as_ref().map(Vec::len), Some(96 + 72));

    let primitive = gltf.meshes().next().unwrap().primitives().next().unwrap();
    let indices = primitive.indices().unwrap();
    assert_eq!(indices.count(), 36);
    assert_eq!(indices.data_type(), gltf::accessor::DataType::U16);
    let positions = primitive.get(&gltf::Semantic::Positions).unwrap();
    assert_eq!(positions.count(), 8);
}

#[test]
fn positions_only_glb_validates() {
    let glb = encode_glb(&simple_triangle(), &GltfOptions::positions_only()).unwrap();
    let gltf = gltf::Gltf::from_slice(&glb).unwrap();
    let primitive = gltf.meshes().next().unwrap().primitives().next().unwrap();
    assert!(primitive.indices().is_none());
    assert_eq!(gltf.blob.unwrap().len(), 36);
}

#[test]
fn gltf_pair_validates() {
    let pair = encode_gltf(&simple_triangle(), &GltfOptions::with_buffer_uri("simple_triangle.bin")).unwrap();
    let gltf = gltf::Gltf::from_slice(&pair.json).unwrap();
    let buffer = gltf.buffers().next().unwrap();
    assert_eq!(buffer.length(), pair.bin.len());
    match buffer.source() {
        gltf::buffer::Source::Uri(uri) => assert_eq!(uri, "simple_triangle.bin"),
        gltf::buffer::Source::Bin => panic!("expected an external buffer"),
    }
}

#[test]
fn codec_outputs_decode() {
    let buffer = synthesize(40, 40, Pattern::Geometric { seed: 42 }).unwrap();
    let requests = [
        CodecRequest::Png,
        CodecRequest::Jpeg { quality: 95 },
        CodecRequest::WebP { quality: Some(30) },
        CodecRequest::Gif,
        CodecRequest::Bmp,
        CodecRequest::Tiff { lzw: false },
        CodecRequest::Tiff { lzw: true },
        CodecRequest::Ico,
    ];
    for request in requests {
        let data = ImageCrateCodec.encode(&buffer, &request).unwrap();
        let decoded = image::load_from_memory(&data).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 40), "{request:?}");
    }
}
