//! Stage settings types and loading
//!
//! Settings are read from a `.ron` or `.json` file. Every field has a
//! default, so partial files are fine.

use std::path::Path;

use bevy::log::info;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::StageError;

// ============================================================================
// Gesture Settings
// ============================================================================

/// Tunables for drag-to-rotate and inertia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureSettings {
    /// Pointer travel (px, either axis) above which a press becomes a drag
    #[serde(default = "default_drag_threshold_px")]
    pub drag_threshold_px: f32,

    /// Radians of rotation per pixel of pointer travel
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,

    /// Fraction of angular velocity left after one second of inertia
    #[serde(default = "default_damping_base")]
    pub damping_base: f32,

    /// Inertia entries are dropped once both axes fall below this (rad/s)
    #[serde(default = "default_rest_epsilon")]
    pub rest_epsilon: f32,

    /// Release velocities at or below this (rad/s) commit no inertia
    #[serde(default = "default_min_commit_velocity")]
    pub min_commit_velocity: f32,

    /// Lower bound for the velocity sampling interval, in milliseconds
    #[serde(default = "default_min_sample_interval_ms")]
    pub min_sample_interval_ms: f32,
}

fn default_drag_threshold_px() -> f32 {
    2.0
}
fn default_sensitivity() -> f32 {
    0.01
}
fn default_damping_base() -> f32 {
    0.1
}
fn default_rest_epsilon() -> f32 {
    0.01
}
fn default_min_commit_velocity() -> f32 {
    0.0001
}
fn default_min_sample_interval_ms() -> f32 {
    1.0
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            drag_threshold_px: default_drag_threshold_px(),
            sensitivity: default_sensitivity(),
            damping_base: default_damping_base(),
            rest_epsilon: default_rest_epsilon(),
            min_commit_velocity: default_min_commit_velocity(),
            min_sample_interval_ms: default_min_sample_interval_ms(),
        }
    }
}

// ============================================================================
// Roll Settings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollSettings {
    #[serde(default = "default_roll_duration_ms")]
    pub duration_ms: u64,

    /// Spin speed about Y while a roll is playing (rad/s)
    #[serde(default = "default_roll_speed")]
    pub speed: f32,
}

fn default_roll_duration_ms() -> u64 {
    900
}
fn default_roll_speed() -> f32 {
    5.2
}

impl Default for RollSettings {
    fn default() -> Self {
        Self {
            duration_ms: default_roll_duration_ms(),
            speed: default_roll_speed(),
        }
    }
}

// ============================================================================
// Stage Settings
// ============================================================================

/// Stage configuration resource.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageSettings {
    /// Same for every mode so the apparent die size never changes
    #[serde(default = "default_columns")]
    pub columns: usize,

    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    #[serde(default = "default_camera_distance")]
    pub camera_distance: f32,

    #[serde(default = "default_camera_fov_degrees")]
    pub camera_fov_degrees: f32,

    /// Approximate pixels per grid row, used for initial window sizing
    #[serde(default = "default_row_px")]
    pub row_px: f32,

    /// Scale applied to the die under the cursor
    #[serde(default = "default_hover_scale")]
    pub hover_scale: f32,

    #[serde(default = "default_show_labels")]
    pub show_labels: bool,

    #[serde(default)]
    pub gesture: GestureSettings,

    #[serde(default)]
    pub roll: RollSettings,
}

fn default_columns() -> usize {
    5
}
fn default_cell_size() -> f32 {
    2.4
}
fn default_camera_distance() -> f32 {
    12.0
}
fn default_camera_fov_degrees() -> f32 {
    40.0
}
fn default_row_px() -> f32 {
    120.0
}
fn default_hover_scale() -> f32 {
    1.06
}
fn default_show_labels() -> bool {
    true
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            columns: default_columns(),
            cell_size: default_cell_size(),
            camera_distance: default_camera_distance(),
            camera_fov_degrees: default_camera_fov_degrees(),
            row_px: default_row_px(),
            hover_scale: default_hover_scale(),
            show_labels: default_show_labels(),
            gesture: GestureSettings::default(),
            roll: RollSettings::default(),
        }
    }
}

impl StageSettings {
    /// Load settings from a `.ron` or `.json` file.
    ///
    /// Files with any other extension are tried as RON first, then JSON.
    pub fn load(path: &Path) -> Result<Self, StageError> {
        let contents = std::fs::read_to_string(path).map_err(|e| StageError::io(path, e))?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        let parsed = match extension.as_deref() {
            Some("json") => Self::from_json(&contents),
            Some("ron") => Self::from_ron(&contents),
            _ => Self::from_ron(&contents).or_else(|ron_err| {
                Self::from_json(&contents).map_err(|json_err| format!("{ron_err}; {json_err}"))
            }),
        };

        let settings = parsed.map_err(|reason| StageError::Settings {
            path: path.to_path_buf(),
            reason,
        })?;
        info!("Loaded stage settings from {}", path.display());
        Ok(settings.sanitized())
    }

    pub fn from_ron(text: &str) -> Result<Self, String> {
        ron::from_str::<StageSettings>(text).map_err(|e| format!("RON: {e}"))
    }

    pub fn from_json(text: &str) -> Result<Self, String> {
        serde_json::from_str::<StageSettings>(text).map_err(|e| format!("JSON: {e}"))
    }

    /// Clamp values that would otherwise break layout or integration.
    pub fn sanitized(mut self) -> Self {
        self.columns = self.columns.max(1);
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            self.cell_size = default_cell_size();
        }
        self.camera_fov_degrees = self.camera_fov_degrees.clamp(5.0, 150.0);
        self.gesture.damping_base = self.gesture.damping_base.clamp(0.0001, 0.9999);
        self.gesture.min_sample_interval_ms = self.gesture.min_sample_interval_ms.max(0.001);
        self.gesture.drag_threshold_px = self.gesture.drag_threshold_px.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = StageSettings::default();
        assert_eq!(settings.columns, 5);
        assert_eq!(settings.cell_size, 2.4);
        assert_eq!(settings.gesture.drag_threshold_px, 2.0);
        assert_eq!(settings.gesture.sensitivity, 0.01);
        assert_eq!(settings.roll.duration_ms, 900);
        assert_eq!(settings.roll.speed, 5.2);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let settings = StageSettings::from_ron("(columns: 4, roll: (speed: 3.0))").unwrap();
        assert_eq!(settings.columns, 4);
        assert_eq!(settings.cell_size, 2.4);
        assert_eq!(settings.roll.speed, 3.0);
        assert_eq!(settings.roll.duration_ms, 900);
        assert_eq!(settings.gesture, GestureSettings::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings =
            StageSettings::from_json(r#"{"gesture": {"damping_base": 0.08}}"#).unwrap();
        assert_eq!(settings.gesture.damping_base, 0.08);
        assert_eq!(settings.gesture.rest_epsilon, 0.01);
        assert_eq!(settings.columns, 5);
    }

    #[test]
    fn test_sanitized_clamps() {
        let mut settings = StageSettings::default();
        settings.columns = 0;
        settings.cell_size = -1.0;
        settings.gesture.damping_base = 2.0;
        let settings = settings.sanitized();
        assert_eq!(settings.columns, 1);
        assert_eq!(settings.cell_size, 2.4);
        assert!(settings.gesture.damping_base < 1.0);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = StageSettings::load(Path::new("/definitely/not/here.ron")).unwrap_err();
        assert!(matches!(err, StageError::Io { .. }));
    }
}
