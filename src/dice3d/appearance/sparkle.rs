//! Glitter points scattered inside translucent dice.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::color::DieColor;
use crate::dice3d::types::AppearanceOverrides;

pub const DEFAULT_SPARKLE_COUNT: u32 = 40;
pub const MAX_SPARKLE_COUNT: u32 = 400;

/// Half-extent of each sparkle octahedron
pub const SPARKLE_POINT_SIZE: f32 = 0.035;

const OPACITY_SCALE: f32 = 0.9;

#[derive(Clone, Debug, PartialEq)]
pub struct SparkleCloud {
    pub points: Vec<Vec3>,
    pub color: DieColor,
    pub opacity: f32,
}

impl SparkleCloud {
    /// `None` unless a positive sparkle intensity is set.
    pub fn from_overrides(appearance: Option<&AppearanceOverrides>) -> Option<Self> {
        let appearance = appearance?;
        let intensity = appearance.sparkle_intensity.unwrap_or(0.0);
        if intensity.is_nan() || intensity <= 0.0 {
            return None;
        }

        let count = appearance
            .sparkle_count
            .unwrap_or(DEFAULT_SPARKLE_COUNT)
            .min(MAX_SPARKLE_COUNT);
        let color = appearance
            .sparkle_color
            .as_deref()
            .map(DieColor::parse_or_gray)
            .unwrap_or(DieColor::WHITE);

        Some(Self {
            points: sample_points(count),
            color,
            opacity: (intensity * OPACITY_SCALE).min(1.0),
        })
    }

    /// All points merged into one mesh of tiny octahedra.
    pub fn to_mesh(&self) -> Mesh {
        let s = SPARKLE_POINT_SIZE;
        let corners = [
            Vec3::X * s,
            Vec3::NEG_X * s,
            Vec3::Y * s,
            Vec3::NEG_Y * s,
            Vec3::Z * s,
            Vec3::NEG_Z * s,
        ];
        // Eight outward faces as indices into `corners`
        const FACES: [[u32; 3]; 8] = [
            [0, 2, 4],
            [2, 1, 4],
            [1, 3, 4],
            [3, 0, 4],
            [2, 0, 5],
            [1, 2, 5],
            [3, 1, 5],
            [0, 3, 5],
        ];

        let mut positions = Vec::with_capacity(self.points.len() * corners.len());
        let mut normals = Vec::with_capacity(self.points.len() * corners.len());
        let mut indices = Vec::with_capacity(self.points.len() * FACES.len() * 3);

        for (i, point) in self.points.iter().enumerate() {
            let base = (i * corners.len()) as u32;
            for corner in corners {
                positions.push((*point + corner).to_array());
                normals.push(corner.normalize().to_array());
            }
            for face in FACES {
                indices.extend(face.iter().map(|f| base + f));
            }
        }

        Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default())
            .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
            .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
            .with_inserted_indices(Indices::U32(indices))
    }

    /// Unlit additive material; additive blending never writes depth.
    pub fn to_material(&self) -> StandardMaterial {
        StandardMaterial {
            base_color: self.color.to_bevy().with_alpha(self.opacity),
            alpha_mode: AlphaMode::Add,
            unlit: true,
            ..default()
        }
    }
}

/// `count` points uniformly inside the unit sphere.
///
/// Seeded by `count` so every die with the same count shares one cloud.
pub fn sample_points(count: u32) -> Vec<Vec3> {
    let mut rng = StdRng::seed_from_u64(u64::from(count));
    let mut points = Vec::with_capacity(count as usize);
    while points.len() < count as usize {
        let p = Vec3::new(
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
            rng.gen_range(-1.0..=1.0),
        );
        if p.length_squared() <= 1.0 {
            points.push(p);
        }
    }
    points
}
