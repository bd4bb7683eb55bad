//! Ray hit tests against die bounding spheres.

use bevy::prelude::*;

/// Distance along the ray to the first intersection with the sphere, if any.
///
/// `direction` must be normalized. An origin inside the sphere hits at 0.
pub fn ray_sphere_hit(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - origin;
    let along = to_center.dot(direction);
    let closest_sq = to_center.length_squared() - along * along;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let near = along - half_chord;
    let far = along + half_chord;
    if far < 0.0 {
        None
    } else {
        Some(near.max(0.0))
    }
}

/// The candidate whose sphere the ray hits first.
///
/// Overlapping volumes resolve to a single key, so one press never starts
/// two drags. Ties keep the earlier candidate.
pub fn nearest_hit<K: Clone>(
    origin: Vec3,
    direction: Vec3,
    candidates: impl IntoIterator<Item = (K, Vec3, f32)>,
) -> Option<K> {
    let mut best: Option<(K, f32)> = None;
    for (key, center, radius) in candidates {
        if let Some(distance) = ray_sphere_hit(origin, direction, center, radius) {
            if best.as_ref().is_none_or(|(_, d)| distance < *d) {
                best = Some((key, distance));
            }
        }
    }
    best.map(|(key, _)| key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_and_miss() {
        let hit = ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0);
        assert!((hit.unwrap() - 9.0).abs() < 1e-5);
        assert!(ray_sphere_hit(Vec3::new(2.0, 0.0, 10.0), Vec3::NEG_Z, Vec3::ZERO, 1.0).is_none());
        // Sphere behind the origin
        assert!(ray_sphere_hit(Vec3::new(0.0, 0.0, 10.0), Vec3::Z, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn test_nearest_wins() {
        let origin = Vec3::new(0.0, 0.0, 10.0);
        let candidates = vec![
            ("far", Vec3::new(0.0, 0.0, -2.0), 1.2),
            ("near", Vec3::new(0.3, 0.0, 0.0), 1.2),
            ("off", Vec3::new(5.0, 0.0, 0.0), 1.2),
        ];
        assert_eq!(nearest_hit(origin, Vec3::NEG_Z, candidates), Some("near"));
    }

    #[test]
    fn test_no_candidates() {
        let empty: Vec<(u32, Vec3, f32)> = Vec::new();
        assert_eq!(nearest_hit(Vec3::ZERO, Vec3::X, empty), None);
    }
}
