//! Beveled polygon prisms for side counts without a regular solid.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use bevy::prelude::*;

use super::Triangle;

/// Circumradius of the base polygon before normalization
pub const PRISM_RADIUS: f32 = 1.05;
pub const PRISM_DEPTH: f32 = 0.5;
pub const BEVEL_THICKNESS: f32 = 0.04;
pub const BEVEL_SIZE: f32 = 0.04;
pub const BEVEL_SEGMENTS: u32 = 2;

/// Cap on polygon vertices. Larger side counts still key separately but
/// render as a 64-gon.
pub const MAX_PRISM_SIDES: u32 = 64;

/// One ring of the extrusion profile: depth and outward bevel offset.
#[derive(Clone, Copy, Debug)]
struct ProfileRing {
    z: f32,
    offset: f32,
}

fn profile() -> Vec<ProfileRing> {
    let mut rings = Vec::with_capacity(2 * (BEVEL_SEGMENTS as usize + 1));
    for k in 0..=BEVEL_SEGMENTS {
        let a = k as f32 / BEVEL_SEGMENTS as f32 * FRAC_PI_2;
        rings.push(ProfileRing {
            z: -BEVEL_THICKNESS * a.cos(),
            offset: BEVEL_SIZE * a.sin(),
        });
    }
    for k in (0..=BEVEL_SEGMENTS).rev() {
        let a = k as f32 / BEVEL_SEGMENTS as f32 * FRAC_PI_2;
        rings.push(ProfileRing {
            z: PRISM_DEPTH + BEVEL_THICKNESS * a.cos(),
            offset: BEVEL_SIZE * a.sin(),
        });
    }
    rings
}

/// Push `[a, b, c]` wound so its normal faces away from `center`.
fn push_outward(triangles: &mut Vec<Triangle>, a: Vec3, b: Vec3, c: Vec3, center: Vec3) {
    let normal = (b - a).cross(c - a);
    let centroid = (a + b + c) / 3.0;
    if normal.dot(centroid - center) < 0.0 {
        triangles.push([a, c, b]);
    } else {
        triangles.push([a, b, c]);
    }
}

/// Triangles for a prism over a regular polygon with `sides` vertices.
///
/// `sides` is clamped to `[3, MAX_PRISM_SIDES]`. The first vertex sits at
/// -90 degrees so odd polygons point down.
pub fn beveled_prism(sides: u32) -> Vec<Triangle> {
    let n = sides.clamp(3, MAX_PRISM_SIDES) as usize;
    let rings = profile();
    // Moving every edge out by `offset` moves the corners by offset / cos(pi/n)
    let corner_scale = 1.0 / (PI / n as f32).cos();
    let center = Vec3::new(0.0, 0.0, PRISM_DEPTH / 2.0);

    let directions: Vec<Vec2> = (0..n)
        .map(|i| {
            let theta = i as f32 / n as f32 * TAU - FRAC_PI_2;
            Vec2::new(theta.cos(), theta.sin())
        })
        .collect();

    let ring_points: Vec<Vec<Vec3>> = rings
        .iter()
        .map(|ring| {
            let radius = PRISM_RADIUS + ring.offset * corner_scale;
            directions
                .iter()
                .map(|d| Vec3::new(d.x * radius, d.y * radius, ring.z))
                .collect()
        })
        .collect();

    let mut triangles = Vec::new();

    for pair in ring_points.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            push_outward(&mut triangles, lower[i], lower[j], upper[j], center);
            push_outward(&mut triangles, lower[i], upper[j], upper[i], center);
        }
    }

    if let (Some(front), Some(back)) = (ring_points.first(), ring_points.last()) {
        for ring in [front, back] {
            let hub = Vec3::new(0.0, 0.0, ring[0].z);
            for i in 0..n {
                push_outward(&mut triangles, hub, ring[i], ring[(i + 1) % n], center);
            }
        }
    }

    triangles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count() {
        // 5 bands of wall quads plus two fan caps
        for sides in [3, 5, 7, 10] {
            let rings = 2 * (BEVEL_SEGMENTS as usize + 1);
            let expected = (rings - 1) * sides * 2 + 2 * sides;
            assert_eq!(beveled_prism(sides as u32).len(), expected, "{sides}");
        }
    }

    #[test]
    fn test_sides_are_clamped() {
        assert_eq!(beveled_prism(1).len(), beveled_prism(3).len());
        assert_eq!(beveled_prism(150).len(), beveled_prism(MAX_PRISM_SIDES).len());
    }

    #[test]
    fn test_first_vertex_points_down() {
        let lowest = beveled_prism(5)
            .iter()
            .flatten()
            .map(|p| p.y)
            .fold(f32::INFINITY, f32::min);
        let expected = -(PRISM_RADIUS + BEVEL_SIZE / (PI / 5.0).cos());
        assert!((lowest - expected).abs() < 1e-5);
    }

    #[test]
    fn test_winding_is_outward() {
        let center = Vec3::new(0.0, 0.0, PRISM_DEPTH / 2.0);
        for [a, b, c] in beveled_prism(7) {
            let normal = (b - a).cross(c - a);
            assert!(normal.dot((a + b + c) / 3.0 - center) >= 0.0);
        }
    }
}
