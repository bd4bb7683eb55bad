//! Short spin played whenever the collaborator bumps the roll pulse.

use bevy::prelude::*;

use crate::dice3d::types::{RollSettings, StageMode};

#[derive(Resource, Debug, Clone, Default)]
pub struct RollTrigger {
    settings: RollSettings,
    last_pulse: Option<u64>,
    spin_until: f64,
}

impl RollTrigger {
    pub fn new(settings: RollSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn set_settings(&mut self, settings: RollSettings) {
        self.settings = settings;
    }

    /// Record the pulse seen at `now_secs`. Returns true when a roll starts.
    ///
    /// The first pulse observed is taken as the baseline, so mounting a stage
    /// with a non-zero pulse does not spin.
    pub fn observe(&mut self, pulse: u64, now_secs: f64) -> bool {
        let previous = self.last_pulse.replace(pulse);
        match previous {
            Some(previous) if previous != pulse => {
                self.spin_until = now_secs + self.settings.duration_ms as f64 / 1000.0;
                info!("Roll started (pulse {})", pulse);
                true
            }
            _ => false,
        }
    }

    pub fn is_spinning(&self, now_secs: f64) -> bool {
        now_secs < self.spin_until
    }

    /// Extra spin about Y for a frame of `dt` seconds ending at `now_secs`.
    pub fn spin_increment(&self, now_secs: f64, dt: f32) -> f32 {
        if self.is_spinning(now_secs) {
            self.settings.speed * dt
        } else {
            0.0
        }
    }

    /// Spin to add this frame in `mode`. Only the selection view rolls.
    pub fn roll_spin(&self, mode: StageMode, now_secs: f64, dt: f32) -> f32 {
        match mode {
            StageMode::Library => 0.0,
            StageMode::Selection => self.spin_increment(now_secs, dt),
        }
    }
}
