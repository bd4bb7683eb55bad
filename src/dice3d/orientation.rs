//! Deterministic resting orientation per die id.
//!
//! Otherwise identical dice get distinguishable, stable poses without any
//! rotation state being persisted.

/// Orientation angles are snapped to multiples of this many degrees.
pub const ORIENTATION_STEP_DEGREES: u32 = 15;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// 32-bit FNV-1a over the UTF-16 code units of `id`.
pub fn fnv1a_utf16(id: &str) -> u32 {
    id.encode_utf16().fold(FNV_OFFSET_BASIS, |hash, unit| {
        (hash ^ u32::from(unit)).wrapping_mul(FNV_PRIME)
    })
}

/// Resting angle for `id` in whole degrees, a multiple of 15 in `[0, 360)`.
pub fn orientation_degrees(id: &str) -> u32 {
    // The hash is read as signed before folding, so ids whose hash has the
    // top bit set land on the mirrored angle.
    let full = (fnv1a_utf16(id) as i32).unsigned_abs() % 360;
    let step = ORIENTATION_STEP_DEGREES;
    let snapped = (full + step / 2) / step * step;
    snapped % 360
}

pub fn orientation_radians(id: &str) -> f32 {
    (orientation_degrees(id) as f32).to_radians()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_id_hashes_to_offset_basis() {
        assert_eq!(fnv1a_utf16(""), FNV_OFFSET_BASIS);
        // 2166136261 as i32 is -2128831035; |.| % 360 = 195
        assert_eq!(orientation_degrees(""), 195);
    }

    #[test]
    fn test_known_hash() {
        // FNV-1a("a") = 0xE40C292C
        assert_eq!(fnv1a_utf16("a"), 0xE40C_292C);
    }

    #[test]
    fn test_multiple_of_step_and_in_range() {
        for id in ["instruments", "personas", "devices", "x", "a much longer identifier", "🎲"] {
            let angle = orientation_degrees(id);
            assert_eq!(angle % ORIENTATION_STEP_DEGREES, 0, "{id}");
            assert!(angle < 360, "{id}");
        }
    }

    #[test]
    fn test_pure() {
        let id = "oblique-strategies";
        assert_eq!(orientation_degrees(id), orientation_degrees(id));
        assert_eq!(orientation_radians("d20"), orientation_radians("d20"));
    }
}
