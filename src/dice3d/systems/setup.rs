//! Stage setup system
//!
//! Spawns the camera, lights and the root that all dice hang from.

use bevy::prelude::*;

use crate::dice3d::gesture::GestureController;
use crate::dice3d::types::*;

/// Key light intensity; the fill light is a third of it
const KEY_LIGHT_LUX: f32 = 9_000.0;
const FILL_LIGHT_LUX: f32 = 3_000.0;

pub fn setup_stage(
    mut commands: Commands,
    settings: Res<StageSettings>,
    mut controller: ResMut<GestureController>,
) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: settings.camera_fov_degrees.to_radians(),
            ..default()
        }),
        Transform::from_xyz(0.0, 0.0, settings.camera_distance).looking_at(Vec3::ZERO, Vec3::Y),
        StageCamera,
        Name::new("DiceStageCamera"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: KEY_LIGHT_LUX,
            ..default()
        },
        Transform::from_xyz(6.0, 8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("DiceStageKeyLight"),
    ));

    commands.spawn((
        DirectionalLight {
            illuminance: FILL_LIGHT_LUX,
            ..default()
        },
        Transform::from_xyz(-6.0, -8.0, 6.0).looking_at(Vec3::ZERO, Vec3::Y),
        Name::new("DiceStageFillLight"),
    ));

    commands.spawn((
        Transform::default(),
        Visibility::Visible,
        DiceStageRoot,
        Name::new("DiceStageRoot"),
    ));

    controller.set_settings(settings.gesture.clone());
    controller.mount();

    info!(
        "Dice stage ready: camera at z {} with {} degree fov",
        settings.camera_distance, settings.camera_fov_degrees
    );
}
