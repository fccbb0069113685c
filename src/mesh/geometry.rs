//! Primitive geometry synthesis
//!
//! Every generator is a pure function of its parameters. The point ring is
//! the one generator that draws from an RNG, and it takes the seed explicitly.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::types::{FixtureError, FixtureResult, Mesh};

/// Upper bound on icosphere faces kept per subdivision level
pub const ICOSPHERE_FACE_CAP: usize = 100;

/// Largest grid whose vertex indices fit in `u32`
pub const MAX_GRID_SIZE: u32 = 65_534;

/// Axis-aligned cube spanning -1..1, six quads
pub fn cube() -> Mesh {
    let vertices = vec![
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
        Vec3::new(1.0, 1.0, -1.0),
        Vec3::new(-1.0, 1.0, -1.0),
    ];
    let faces = vec![
        vec![0, 1, 2, 3],
        vec![7, 6, 5, 4],
        vec![3, 2, 6, 7],
        vec![4, 0, 3, 7],
        vec![4, 5, 1, 0],
        vec![1, 5, 6, 2],
    ];
    Mesh::from_trusted(vertices, faces)
}

const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Unit icosahedron with `level` passes of the bounded face cap.
///
/// No edge splitting happens: each level keeps at most
/// [`ICOSPHERE_FACE_CAP`] faces of the previous one, so every level yields
/// the same 12 vertices and 20 faces.
pub fn icosphere(level: u32) -> Mesh {
    let phi = (1.0 + 5.0f32.sqrt()) / 2.0;
    let vertices = [
        (-1.0, phi, 0.0),
        (1.0, phi, 0.0),
        (-1.0, -phi, 0.0),
        (1.0, -phi, 0.0),
        (0.0, -1.0, phi),
        (0.0, 1.0, phi),
        (0.0, -1.0, -phi),
        (0.0, 1.0, -phi),
        (phi, 0.0, -1.0),
        (phi, 0.0, 1.0),
        (-phi, 0.0, -1.0),
        (-phi, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect();

    let mut faces: Vec<Vec<u32>> = ICOSAHEDRON_FACES.iter().map(|f| f.to_vec()).collect();
    for _ in 0..level {
        faces.truncate(ICOSPHERE_FACE_CAP);
    }

    Mesh::from_trusted(vertices, faces)
}

/// Flat `size` x `size` grid in the XZ plane centered on the origin, two
/// triangles per cell
pub fn grid(size: u32) -> FixtureResult<Mesh> {
    if size > MAX_GRID_SIZE {
        return Err(FixtureError::invalid(format!("grid size {size} exceeds {MAX_GRID_SIZE}")));
    }
    let row = size + 1;
    let half = size as f32 / 2.0;

    let mut vertices = Vec::with_capacity(row as usize * row as usize);
    for y in 0..row {
        for x in 0..row {
            vertices.push(Vec3::new(x as f32 - half, 0.0, y as f32 - half));
        }
    }

    let mut faces = Vec::with_capacity(size as usize * size as usize * 2);
    for y in 0..size {
        for x in 0..size {
            let v1 = y * row + x;
            let v2 = v1 + 1;
            let v3 = v1 + row;
            let v4 = v3 + 1;
            faces.push(vec![v1, v2, v3]);
            faces.push(vec![v2, v4, v3]);
        }
    }

    Ok(Mesh::from_trusted(vertices, faces))
}

/// `count` separate triangles inscribed in the unit circle; triangle `i`
/// starts at angle `TAU * i / count` and sits at z 0 (even) or 1 (odd)
pub fn triangle_ring(count: u32) -> FixtureResult<Mesh> {
    if count == 0 {
        return Err(FixtureError::invalid("triangle ring needs at least one triangle"));
    }

    let mut vertices = Vec::with_capacity(count as usize * 3);
    let mut faces = Vec::with_capacity(count as usize);
    for i in 0..count {
        let angle = TAU * i as f32 / count as f32;
        let z = if i % 2 == 0 { 0.0 } else { 1.0 };
        for j in 0..3 {
            let a = angle + j as f32 * TAU / 3.0;
            vertices.push(Vec3::new(a.cos(), a.sin(), z));
        }
        faces.push(vec![3 * i, 3 * i + 1, 3 * i + 2]);
    }

    Mesh::new(vertices, faces)
}

/// `count` points on the unit circle with seeded z in [-1, 1), joined by
/// `count - 2` strip triangles `(i, i + 1, i + 2)`
pub fn point_ring(count: u32, seed: u64) -> FixtureResult<Mesh> {
    if count < 3 {
        return Err(FixtureError::invalid(format!("point ring needs at least 3 points, got {count}")));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let vertices = (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Vec3::new(angle.cos(), angle.sin(), rng.gen_range(-1.0..1.0))
        })
        .collect();
    let faces = (0..count - 2).map(|i| vec![i, i + 1, i + 2]).collect();

    Mesh::new(vertices, faces)
}

/// One triangle: (-1,-1,0), (1,-1,0), (0,1,0)
pub fn simple_triangle() -> Mesh {
    Mesh::from_trusted(
        vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)],
        vec![vec![0, 1, 2]],
    )
}

/// Unit quad in the XY plane split into two triangles
pub fn simple_quad() -> Mesh {
    Mesh::from_trusted(
        vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        vec![vec![0, 1, 2], vec![0, 2, 3]],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube() {
        let mesh = cube();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_icosphere_face_cap() {
        for level in [0, 2, 4] {
            let mesh = icosphere(level);
            assert_eq!(mesh.vertex_count(), 12);
            assert_eq!(mesh.face_count(), 20);
        }
        for v in icosphere(2).vertices() {
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_grid_counts() {
        let mesh = grid(50).unwrap();
        assert_eq!(mesh.vertex_count(), 51 * 51);
        assert_eq!(mesh.face_count(), 2 * 50 * 50);
        let bounds = mesh.bounds();
        assert_eq!(bounds.min, [-25.0, 0.0, -25.0]);
        assert_eq!(bounds.max, [25.0, 0.0, 25.0]);

        let cell = grid(1).unwrap();
        assert_eq!(cell.faces(), &[vec![0, 1, 2], vec![1, 3, 2]]);
    }

    #[test]
    fn test_grid_size_limit() {
        // 65535 * 65535 vertices still index within u32
        assert_eq!((MAX_GRID_SIZE + 1).checked_mul(MAX_GRID_SIZE + 1).map(|n| n - 1), Some(4_294_836_224));
        assert!(matches!(grid(MAX_GRID_SIZE + 1), Err(FixtureError::InvalidRequest(_))));
        assert!(matches!(grid(u32::MAX), Err(FixtureError::InvalidRequest(_))));
    }

    #[test]
    fn test_triangle_ring_alternates_height() {
        let mesh = triangle_ring(12).unwrap();
        assert_eq!(mesh.vertex_count(), 36);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.vertices()[0], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(mesh.vertices()[3].z, 1.0);
        assert!(triangle_ring(0).is_err());
    }

    #[test]
    fn test_point_ring_is_seeded() {
        let a = point_ring(100, 42).unwrap();
        let b = point_ring(100, 42).unwrap();
        let c = point_ring(100, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.face_count(), 98);
        assert!(a.vertices().iter().all(|v| (-1.0..1.0).contains(&v.z)));
        assert!(point_ring(2, 0).is_err());
    }

    #[test]
    fn test_simple_shapes() {
        assert_eq!(simple_triangle().triangle_indices(), vec![0, 1, 2]);
        assert_eq!(simple_quad().triangle_count(), 2);
    }
}
