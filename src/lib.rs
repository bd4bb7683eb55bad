//! Procedural polyhedral dice on a Bevy stage.
//!
//! Add [`dice3d::DiceStagePlugin`], fill the [`dice3d::DiceStage`] resource
//! with a library and selection, and listen for
//! [`dice3d::StageSelection`] messages.

pub mod dice3d;
