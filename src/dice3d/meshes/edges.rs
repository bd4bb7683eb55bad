//! Feature-edge extraction for the wireframe overlay.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::Triangle;

/// Positions are welded on a grid of this size before edges are matched
pub const WELD_PRECISION: f32 = 1e-4;

type WeldedPoint = (i64, i64, i64);

fn weld(p: Vec3) -> WeldedPoint {
    let q = |v: f32| (v / WELD_PRECISION).round() as i64;
    (q(p.x), q(p.y), q(p.z))
}

struct EdgeRecord {
    endpoints: [Vec3; 2],
    normals: Vec<Vec3>,
}

/// Edges between faces meeting at more than `threshold_degrees`, plus edges
/// used by only one triangle.
///
/// Degenerate triangles are ignored. Output order is deterministic.
pub fn feature_edges(triangles: &[Triangle], threshold_degrees: f32) -> Vec<[Vec3; 2]> {
    let cos_threshold = threshold_degrees.to_radians().cos();
    let mut records: BTreeMap<(WeldedPoint, WeldedPoint), EdgeRecord> = BTreeMap::new();

    for tri in triangles {
        let welded = tri.map(weld);
        if welded[0] == welded[1] || welded[1] == welded[2] || welded[0] == welded[2] {
            continue;
        }
        let normal = (tri[1] - tri[0]).cross(tri[2] - tri[0]).normalize_or_zero();
        if normal == Vec3::ZERO {
            continue;
        }

        for (i, j) in [(0, 1), (1, 2), (2, 0)] {
            let key = if welded[i] <= welded[j] {
                (welded[i], welded[j])
            } else {
                (welded[j], welded[i])
            };
            records
                .entry(key)
                .or_insert_with(|| EdgeRecord {
                    endpoints: [tri[i], tri[j]],
                    normals: Vec::new(),
                })
                .normals
                .push(normal);
        }
    }

    records
        .into_values()
        .filter(|record| match record.normals.as_slice() {
            [_] => true,
            [a, b] => a.dot(*b) < cos_threshold,
            _ => true,
        })
        .map(|record| record.endpoints)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> [Triangle; 2] {
        [[a, b, c], [a, c, d]]
    }

    #[test]
    fn test_flat_quad_keeps_only_boundary() {
        let tris = quad(Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y);
        assert_eq!(feature_edges(&tris, 40.0).len(), 4);
    }

    #[test]
    fn test_fold_angle_threshold() {
        // Two triangles sharing the x axis, folded by 30 and by 90 degrees
        let shared = [Vec3::ZERO, Vec3::X];
        let flap = |deg: f32| {
            let r = deg.to_radians();
            Vec3::new(0.5, r.cos(), r.sin())
        };
        let mesh = |deg: f32| {
            vec![
                [shared[0], shared[1], Vec3::new(0.5, -1.0, 0.0)],
                [shared[1], shared[0], flap(deg)],
            ]
        };
        let shallow = mesh(-30.0);
        let sharp = mesh(-90.0);
        // 4 outer boundary edges, plus the crease when sharp
        assert_eq!(feature_edges(&shallow, 40.0).len(), 4);
        assert_eq!(feature_edges(&sharp, 40.0).len(), 5);
    }

    #[test]
    fn test_near_duplicate_positions_are_welded() {
        let e = 1e-6;
        let tris = [
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec3::new(1.0 + e, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.0, 1.0 - e, 0.0)],
        ];
        assert_eq!(feature_edges(&tris, 40.0).len(), 4);
    }
}
