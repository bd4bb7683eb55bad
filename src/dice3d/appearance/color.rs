//! Die color parsing and contrast helpers.

use std::fmt;

use bevy::prelude::*;

use crate::dice3d::types::StageError;

/// An opaque sRGB color as supplied by the collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DieColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl DieColor {
    pub const WHITE: DieColor = DieColor::rgb(0xff, 0xff, 0xff);
    pub const NEAR_BLACK: DieColor = DieColor::rgb(0x11, 0x11, 0x11);
    pub const BLACK: DieColor = DieColor::rgb(0x00, 0x00, 0x00);
    /// Used for colors that fail to parse
    pub const NEUTRAL_GRAY: DieColor = DieColor::rgb(0x88, 0x88, 0x88);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse any CSS color (`#rgb`, `#rrggbb`, `rgb(...)`, names). Alpha is
    /// dropped; opacity comes from the appearance overrides instead.
    pub fn parse(value: &str) -> Result<Self, StageError> {
        let parsed = csscolorparser::parse(value.trim()).map_err(|e| StageError::InvalidColor {
            value: value.to_string(),
            reason: e.to_string(),
        })?;
        let [r, g, b, _] = parsed.to_rgba8();
        Ok(Self { r, g, b })
    }

    pub fn parse_or_gray(value: &str) -> Self {
        match Self::parse(value) {
            Ok(color) => color,
            Err(e) => {
                warn!("{}; using neutral gray", e);
                Self::NEUTRAL_GRAY
            }
        }
    }

    /// Perceived brightness in `[0, 1]` (Rec. 601 weights).
    pub fn luminance(&self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Channel-wise interpolation, rounded to the nearest integer.
    pub fn lerp(self, other: DieColor, t: f32) -> DieColor {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        DieColor::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }

    pub fn to_bevy(&self) -> Color {
        Color::srgb_u8(self.r, self.g, self.b)
    }

    pub fn to_linear(&self) -> LinearRgba {
        self.to_bevy().to_linear()
    }
}

impl fmt::Display for DieColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Wireframe color that contrasts with the die body.
pub fn edge_color(body: DieColor) -> DieColor {
    if body.luminance() < 0.5 {
        DieColor::WHITE
    } else {
        DieColor::NEAR_BLACK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!(DieColor::parse("#ff0000").unwrap(), DieColor::rgb(255, 0, 0));
        assert_eq!(DieColor::parse("#0f0").unwrap(), DieColor::rgb(0, 255, 0));
        assert_eq!(DieColor::parse(" white ").unwrap(), DieColor::WHITE);
    }

    #[test]
    fn test_parse_invalid() {
        let err = DieColor::parse("not-a-color").unwrap_err();
        assert!(matches!(err, StageError::InvalidColor { .. }));
        assert_eq!(DieColor::parse_or_gray("#zzz"), DieColor::NEUTRAL_GRAY);
    }

    #[test]
    fn test_edge_contrast() {
        assert_eq!(edge_color(DieColor::BLACK), DieColor::WHITE);
        assert_eq!(edge_color(DieColor::WHITE), DieColor::NEAR_BLACK);
        // Pure blue is dark by luminance
        assert_eq!(edge_color(DieColor::rgb(0, 0, 255)), DieColor::WHITE);
        assert_eq!(edge_color(DieColor::rgb(255, 255, 0)), DieColor::NEAR_BLACK);
    }

    #[test]
    fn test_display_hex() {
        assert_eq!(DieColor::rgb(0x38, 0xbd, 0xf8).to_string(), "#38bdf8");
    }

    #[test]
    fn test_lerp_rounds() {
        let mid = DieColor::WHITE.lerp(DieColor::BLACK, 0.5);
        assert_eq!(mid, DieColor::rgb(128, 128, 128));
    }
}
