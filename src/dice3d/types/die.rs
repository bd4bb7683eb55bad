//! Die definitions supplied by the collaborator, and per-instance components.
//!
//! A `DieDefinition` is owned by whoever embeds the stage (a dice library, a
//! song/roll bookkeeping layer, ...). The stage only reads it; every rendered
//! occurrence of a definition is a separate instance with its own id.

use std::fmt;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::StageError;

/// Dice library bundled with the viewer.
pub const DEFAULT_LIBRARY_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/default_dice.json"
));

/// Surface pattern key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiePattern {
    Stripes,
    Gradient,
    /// Unknown pattern names also land here so new collaborator patterns
    /// render as a flat color instead of failing the whole library.
    /// (`#[serde(other)]` must be on the last variant.)
    #[default]
    #[serde(other)]
    Solid,
}

impl DiePattern {
    pub const ALL: [DiePattern; 3] = [DiePattern::Solid, DiePattern::Stripes, DiePattern::Gradient];

    pub fn name(&self) -> &'static str {
        match self {
            DiePattern::Solid => "solid",
            DiePattern::Stripes => "stripes",
            DiePattern::Gradient => "gradient",
        }
    }

    pub fn parse(s: &str) -> Option<DiePattern> {
        match s.to_lowercase().as_str() {
            "solid" => Some(DiePattern::Solid),
            "stripes" => Some(DiePattern::Stripes),
            "gradient" => Some(DiePattern::Gradient),
            _ => None,
        }
    }
}

/// Optional material overrides for the 3D die surface.
///
/// Every field falls back to a default when absent, see
/// `appearance::SurfaceMaterial::resolve`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceOverrides {
    /// 0 = mirror, 1 = diffuse
    pub roughness: Option<f32>,
    pub metalness: Option<f32>,
    pub reflectivity: Option<f32>,
    /// Glass-like translucency (0-1)
    pub transmission: Option<f32>,
    /// Index of refraction, roughly 1.1 - 2.3
    pub ior: Option<f32>,
    pub thickness: Option<f32>,
    #[serde(alias = "attenuationDistance")]
    pub attenuation_distance: Option<f32>,
    #[serde(alias = "attenuationColor")]
    pub attenuation_color: Option<String>,
    pub opacity: Option<f32>,
    pub clearcoat: Option<f32>,
    #[serde(alias = "clearcoatRoughness")]
    pub clearcoat_roughness: Option<f32>,
    pub sheen: Option<f32>,
    #[serde(alias = "sheenColor")]
    pub sheen_color: Option<String>,
    /// 0 or less disables the sparkle cloud entirely
    #[serde(alias = "sparkleIntensity")]
    pub sparkle_intensity: Option<f32>,
    #[serde(alias = "sparkleCount")]
    pub sparkle_count: Option<u32>,
    #[serde(alias = "sparkleColor")]
    pub sparkle_color: Option<String>,
}

/// A die as defined by the collaborator. Immutable while rendered.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DieDefinition {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub sides: u32,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(alias = "colorHex")]
    pub color_hex: String,
    #[serde(default)]
    pub pattern: DiePattern,
    #[serde(default)]
    pub appearance: Option<AppearanceOverrides>,
}

impl DieDefinition {
    pub fn new(id: impl Into<String>, sides: u32, color_hex: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            sides,
            options: (1..=sides).map(|n| n.to_string()).collect(),
            color_hex: color_hex.into(),
            pattern: DiePattern::Solid,
            appearance: None,
        }
    }

    pub fn with_pattern(mut self, pattern: DiePattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn with_appearance(mut self, appearance: AppearanceOverrides) -> Self {
        self.appearance = Some(appearance);
        self
    }

    /// Label shown under the die; falls back to the id when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

/// Parse a JSON array of die definitions.
pub fn parse_library(json: &str) -> Result<Vec<DieDefinition>, StageError> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON dice library from disk.
pub fn load_library(path: &Path) -> Result<Vec<DieDefinition>, StageError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StageError::io(path, e))?;
    parse_library(&contents)
}

/// The library bundled with the crate.
pub fn default_library() -> Vec<DieDefinition> {
    match parse_library(DEFAULT_LIBRARY_JSON) {
        Ok(dice) => dice,
        Err(e) => {
            warn!("Failed to parse bundled dice library: {}", e);
            Vec::new()
        }
    }
}

/// Identity of one rendered die occurrence within a stage.
///
/// In library mode this is the die id; in selection mode it is the
/// selection slot id, so the same die can be on the stage several times.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub String);

impl InstanceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(value: &str) -> Self {
        InstanceId(value.to_string())
    }
}

impl From<String> for InstanceId {
    fn from(value: String) -> Self {
        InstanceId(value)
    }
}

/// Component attached to each rendered die group
#[derive(Component, Clone, Debug)]
pub struct DieInstance {
    pub id: InstanceId,
    pub die: DieDefinition,
    /// Grid slot, recomputed whenever the instance list changes
    pub index: usize,
}

/// Marker for the mesh child carrying the die surface
#[derive(Component)]
pub struct DieBody;

/// Marker for the wireframe edge overlay child
#[derive(Component)]
pub struct DieEdges;

/// Marker for the sparkle point cloud child
#[derive(Component)]
pub struct DieSparkle;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_parse() {
        assert_eq!(DiePattern::parse("solid"), Some(DiePattern::Solid));
        assert_eq!(DiePattern::parse("Stripes"), Some(DiePattern::Stripes));
        assert_eq!(DiePattern::parse("GRADIENT"), Some(DiePattern::Gradient));
        assert_eq!(DiePattern::parse("dots"), None);
    }

    #[test]
    fn test_unknown_pattern_deserializes_as_solid() {
        let json = r##"{"id":"a","sides":6,"color_hex":"#ff0000","pattern":"crosshatch"}"##;
        let die: DieDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(die.pattern, DiePattern::Solid);
    }

    #[test]
    fn test_camel_case_aliases() {
        let json = r##"{
            "id": "p",
            "sides": 8,
            "colorHex": "#38bdf8",
            "pattern": "gradient",
            "appearance": { "sparkleIntensity": 0.5, "sparkleCount": 130 }
        }"##;
        let die: DieDefinition = serde_json::from_str(json).unwrap();
        assert_eq!(die.color_hex, "#38bdf8");
        let appearance = die.appearance.unwrap();
        assert_eq!(appearance.sparkle_intensity, Some(0.5));
        assert_eq!(appearance.sparkle_count, Some(130));
        assert_eq!(appearance.roughness, None);
    }

    #[test]
    fn test_default_library_is_consistent() {
        let dice = default_library();
        assert_eq!(dice.len(), 5);
        for die in &dice {
            assert_eq!(die.options.len(), die.sides as usize, "{}", die.id);
            assert!(die.options.iter().all(|o| !o.trim().is_empty()));
        }
    }

    #[test]
    fn test_display_name_falls_back_to_id() {
        let mut die = DieDefinition::new("d6", 6, "#ffffff");
        die.name = "  ".to_string();
        assert_eq!(die.display_name(), "d6");
    }
}
