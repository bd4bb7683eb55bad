//! Systems module for the dice stage
//!
//! This module contains the Bevy systems that drive the stage, organized
//! into submodules by functionality:
//!
//! - `setup`: Camera, lights and the stage root
//! - `scene`: Spawning and despawning die entities from the `DiceStage`
//! - `input`: Cursor picking and pointer gestures
//! - `animation`: Roll spin, inertia, transforms and camera framing
//! - `labels`: Die name labels

mod animation;
mod input;
mod labels;
mod scene;
mod setup;

// Re-export all public systems
pub use animation::{
    advance_die_rotations, apply_die_transforms, apply_pixel_stability, frame_stage_camera,
};
pub use input::handle_pointer_input;
pub use labels::update_die_labels;
pub use scene::{sync_stage_instances, DieAssetCache};
pub use setup::setup_stage;
