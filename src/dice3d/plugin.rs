use bevy::prelude::*;

use crate::dice3d::gesture::GestureController;
use crate::dice3d::layout::PixelStability;
use crate::dice3d::roll::RollTrigger;
use crate::dice3d::systems::*;
use crate::dice3d::types::*;

/// Everything needed to render and interact with a `DiceStage`.
///
/// Insert a `DiceStage` before or after adding the plugin and read
/// `StageSelection` messages to react to clicks.
#[derive(Default)]
pub struct DiceStagePlugin {
    pub settings: StageSettings,
}

impl DiceStagePlugin {
    pub fn new(settings: StageSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for DiceStagePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(self.settings.clone())
            .init_resource::<DiceStage>()
            .insert_resource(GestureController::new(self.settings.gesture.clone()))
            .insert_resource(RollTrigger::new(self.settings.roll.clone()))
            .init_resource::<PixelStability>()
            .init_resource::<DieAssetCache>()
            .init_resource::<HoveredDie>()
            .add_message::<StageSelection>()
            .add_systems(Startup, setup_stage)
            // Input only touches controller state; integration happens after it
            .add_systems(
                Update,
                (
                    sync_stage_instances,
                    handle_pointer_input,
                    advance_die_rotations,
                    apply_die_transforms,
                    apply_pixel_stability,
                    frame_stage_camera,
                    update_die_labels,
                )
                    .chain(),
            );
    }
}
