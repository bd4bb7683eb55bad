//! The five regular solids used for canonical side counts.
//!
//! Each solid is described by its vertex set and its face normals; the faces
//! themselves are recovered as the vertices lying on the supporting plane of
//! each normal. That keeps the tables short and the winding consistent.

use bevy::prelude::*;

use super::Triangle;

/// Vertices closer than this to a face's supporting plane belong to the face
const FACE_EPSILON: f32 = 1e-4;

fn golden_ratio() -> f32 {
    (1.0 + 5.0_f32.sqrt()) / 2.0
}

fn signs(value: f32) -> &'static [f32] {
    if value == 0.0 {
        &[1.0]
    } else {
        &[1.0, -1.0]
    }
}

/// All sign variants of the cyclic permutations of `(a, b, c)`.
fn cyclic_permutations(a: f32, b: f32, c: f32) -> Vec<Vec3> {
    let mut points = Vec::new();
    for (x, y, z) in [(a, b, c), (c, a, b), (b, c, a)] {
        for sx in signs(x) {
            for sy in signs(y) {
                for sz in signs(z) {
                    points.push(Vec3::new(x * sx, y * sy, z * sz));
                }
            }
        }
    }
    points
}

fn cube_corners(half: f32) -> Vec<Vec3> {
    let mut corners = Vec::with_capacity(8);
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                corners.push(Vec3::new(sx, sy, sz) * half);
            }
        }
    }
    corners
}

/// Build outward-wound triangles for a convex solid.
///
/// Every face is sorted counter-clockwise around its normal and fanned from
/// its centroid, so triangles of one face are coplanar.
pub fn faces_from_normals(vertices: &[Vec3], normals: &[Vec3]) -> Vec<Triangle> {
    let mut triangles = Vec::new();

    for normal in normals {
        let n = normal.normalize();
        let support = vertices
            .iter()
            .map(|v| v.dot(n))
            .fold(f32::NEG_INFINITY, f32::max);

        let mut face: Vec<Vec3> = vertices
            .iter()
            .copied()
            .filter(|v| (v.dot(n) - support).abs() < FACE_EPSILON)
            .collect();
        if face.len() < 3 {
            continue;
        }

        let center = face.iter().copied().sum::<Vec3>() / face.len() as f32;
        let u = (face[0] - center).normalize();
        let w = n.cross(u);
        let angle = |p: &Vec3| {
            let d = *p - center;
            d.dot(w).atan2(d.dot(u))
        };
        face.sort_by(|a, b| angle(a).total_cmp(&angle(b)));

        for i in 0..face.len() {
            let next = (i + 1) % face.len();
            triangles.push([center, face[i], face[next]]);
        }
    }

    triangles
}

pub fn tetrahedron() -> Vec<Triangle> {
    let vertices = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ];
    // Each face is opposite one vertex
    let normals: Vec<Vec3> = vertices.iter().map(|v| -*v).collect();
    faces_from_normals(&vertices, &normals)
}

pub fn cube() -> Vec<Triangle> {
    let normals = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    faces_from_normals(&cube_corners(0.5), &normals)
}

pub fn octahedron() -> Vec<Triangle> {
    let vertices = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z];
    faces_from_normals(&vertices, &cube_corners(1.0))
}

pub fn dodecahedron() -> Vec<Triangle> {
    let phi = golden_ratio();
    let mut vertices = cube_corners(1.0);
    vertices.extend(cyclic_permutations(0.0, 1.0 / phi, phi));
    // Face normals point at the vertices of the dual icosahedron
    let normals = cyclic_permutations(0.0, phi, 1.0);
    faces_from_normals(&vertices, &normals)
}

pub fn icosahedron() -> Vec<Triangle> {
    let phi = golden_ratio();
    let vertices = cyclic_permutations(0.0, phi, 1.0);
    let mut normals = cube_corners(1.0);
    normals.extend(cyclic_permutations(0.0, 1.0 / phi, phi));
    faces_from_normals(&vertices, &normals)
}
