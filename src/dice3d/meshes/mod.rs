//! Procedural die geometry.
//!
//! `build_die_geometry` is pure: the same side count and orientation always
//! produce the same vertices, so results are shared through `GeometryCache`.

pub mod edges;
pub mod polyhedra;
pub mod prism;

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::sync::Arc;

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy_mesh::{Indices, PrimitiveTopology};

pub use edges::feature_edges;
pub use prism::MAX_PRISM_SIDES;

/// Three corners, counter-clockwise seen from outside.
pub type Triangle = [Vec3; 3];

/// Every die is scaled so its bounding sphere has this radius
pub const TARGET_RADIUS: f32 = 1.05;

/// Tilt about X so faces read at an angle rather than edge-on
pub const RESTING_TILT: f32 = 0.6;

pub const EDGE_ANGLE_THRESHOLD_DEGREES: f32 = 40.0;

pub const MIN_SIDES: u32 = 3;
pub const MAX_SIDES: u32 = 200;

/// Which base shape a side count maps to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SolidKind {
    Tetrahedron,
    Cube,
    Octahedron,
    Dodecahedron,
    Icosahedron,
    /// Beveled prism over a regular polygon with this many vertices
    Prism(u32),
}

impl SolidKind {
    pub fn for_sides(sides: u32) -> Self {
        match sides {
            4 => SolidKind::Tetrahedron,
            6 => SolidKind::Cube,
            8 => SolidKind::Octahedron,
            12 => SolidKind::Dodecahedron,
            20 => SolidKind::Icosahedron,
            n => SolidKind::Prism(n.clamp(MIN_SIDES, MAX_PRISM_SIDES)),
        }
    }

    pub fn name(&self) -> String {
        match self {
            SolidKind::Tetrahedron => "tetrahedron".to_string(),
            SolidKind::Cube => "cube".to_string(),
            SolidKind::Octahedron => "octahedron".to_string(),
            SolidKind::Dodecahedron => "dodecahedron".to_string(),
            SolidKind::Icosahedron => "icosahedron".to_string(),
            SolidKind::Prism(n) => format!("{n}-gon prism"),
        }
    }

    fn triangles(&self) -> Vec<Triangle> {
        match self {
            SolidKind::Tetrahedron => polyhedra::tetrahedron(),
            SolidKind::Cube => polyhedra::cube(),
            SolidKind::Octahedron => polyhedra::octahedron(),
            SolidKind::Dodecahedron => polyhedra::dodecahedron(),
            SolidKind::Icosahedron => polyhedra::icosahedron(),
            SolidKind::Prism(n) => prism::beveled_prism(*n),
        }
    }
}

/// Cache key for built geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryKey {
    pub sides: u32,
    pub orientation_degrees: u32,
}

impl GeometryKey {
    pub fn new(sides: u32, orientation_degrees: u32) -> Self {
        Self {
            sides: sides.clamp(MIN_SIDES, MAX_SIDES),
            orientation_degrees: orientation_degrees % 360,
        }
    }
}

/// Flat-shaded triangle soup plus the feature edges of one die.
#[derive(Clone, Debug, PartialEq)]
pub struct DieGeometry {
    pub key: GeometryKey,
    pub kind: SolidKind,
    /// Three entries per triangle
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub edges: Vec<[Vec3; 2]>,
}

impl DieGeometry {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Distance of the farthest vertex from the origin.
    pub fn bounding_radius(&self) -> f32 {
        self.positions
            .iter()
            .map(|p| p.length())
            .fold(0.0, f32::max)
    }

    pub fn to_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self.positions.iter().map(|p| p.to_array()).collect();
        let normals: Vec<[f32; 3]> = self.normals.iter().map(|n| n.to_array()).collect();
        let uvs: Vec<[f32; 2]> = self.uvs.iter().map(|uv| uv.to_array()).collect();
        let indices: Vec<u32> = (0..positions.len() as u32).collect();

        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
            .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
            .with_inserted_indices(Indices::U32(indices))
    }

    /// Line-list mesh of the feature edges.
    pub fn edge_mesh(&self) -> Mesh {
        let positions: Vec<[f32; 3]> = self
            .edges
            .iter()
            .flat_map(|[a, b]| [a.to_array(), b.to_array()])
            .collect();

        Mesh::new(PrimitiveTopology::LineList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    }
}

/// Spherical UV for one direction, `u` around Y and `v` from the north pole.
fn spherical_uv(p: Vec3) -> Vec2 {
    let dir = p.normalize_or_zero();
    let u = 0.5 + dir.z.atan2(dir.x) / TAU;
    let v = 0.5 - dir.y.clamp(-1.0, 1.0).asin() / PI;
    Vec2::new(u, v)
}

/// Triangles that straddle the `u` seam get their low side shifted by one
/// so the texture doesn't smear across the whole triangle.
fn triangle_uvs(tri: &Triangle) -> [Vec2; 3] {
    let mut uvs = tri.map(spherical_uv);
    let min_u = uvs.iter().map(|uv| uv.x).fold(f32::INFINITY, f32::min);
    let max_u = uvs.iter().map(|uv| uv.x).fold(f32::NEG_INFINITY, f32::max);
    if max_u - min_u > 0.5 {
        for uv in &mut uvs {
            if uv.x < 0.5 {
                uv.x += 1.0;
            }
        }
    }
    uvs
}

/// Re-center on the bounding-box center and scale to `TARGET_RADIUS`.
fn normalize(triangles: &mut [Triangle]) {
    let (min, max) = triangles.iter().flatten().fold(
        (Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY)),
        |(min, max), p| (min.min(*p), max.max(*p)),
    );
    let center = (min + max) / 2.0;

    let radius = triangles
        .iter()
        .flatten()
        .map(|p| (*p - center).length())
        .fold(0.0, f32::max);
    let scale = if radius > 0.0 { TARGET_RADIUS / radius } else { 1.0 };

    for p in triangles.iter_mut().flatten() {
        *p = (*p - center) * scale;
    }
}

/// Build the geometry for a die with `sides` faces resting at
/// `orientation_degrees` about Z.
pub fn build_die_geometry(sides: u32, orientation_degrees: u32) -> DieGeometry {
    let key = GeometryKey::new(sides, orientation_degrees);
    let kind = SolidKind::for_sides(key.sides);

    let mut triangles = kind.triangles();
    normalize(&mut triangles);

    let uvs: Vec<Vec2> = triangles.iter().flat_map(triangle_uvs).collect();

    let rotation = Quat::from_euler(
        EulerRot::XYZ,
        RESTING_TILT,
        0.0,
        (key.orientation_degrees as f32).to_radians(),
    );
    for p in triangles.iter_mut().flatten() {
        *p = rotation * *p;
    }

    let mut positions = Vec::with_capacity(triangles.len() * 3);
    let mut normals = Vec::with_capacity(triangles.len() * 3);
    for [a, b, c] in &triangles {
        let normal = (*b - *a).cross(*c - *a).normalize_or_zero();
        positions.extend([*a, *b, *c]);
        normals.extend([normal; 3]);
    }

    let edges = feature_edges(&triangles, EDGE_ANGLE_THRESHOLD_DEGREES);

    DieGeometry {
        key,
        kind,
        positions,
        normals,
        uvs,
        edges,
    }
}

/// Memoized geometry, shared by every instance with the same key.
#[derive(Resource, Default)]
pub struct GeometryCache {
    entries: HashMap<GeometryKey, Arc<DieGeometry>>,
}

impl GeometryCache {
    pub fn get_or_build(&mut self, sides: u32, orientation_degrees: u32) -> Arc<DieGeometry> {
        let key = GeometryKey::new(sides, orientation_degrees);
        self.entries
            .entry(key)
            .or_insert_with(|| {
                debug!("Building die geometry for {:?}", key);
                Arc::new(build_die_geometry(key.sides, key.orientation_degrees))
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
