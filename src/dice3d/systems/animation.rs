//! Per-frame rotation, scaling and camera framing.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::dice3d::gesture::GestureController;
use crate::dice3d::layout::{GridLayout, PixelStability};
use crate::dice3d::roll::RollTrigger;
use crate::dice3d::types::*;

/// Roll spin, inertia integration and click-guard expiry.
pub fn advance_die_rotations(
    time: Res<Time>,
    stage: Res<DiceStage>,
    mut trigger: ResMut<RollTrigger>,
    mut controller: ResMut<GestureController>,
) {
    let now = time.elapsed_secs_f64();
    let dt = time.delta_secs();

    trigger.observe(stage.roll_pulse, now);
    let dy = trigger.roll_spin(stage.mode, now, dt);
    if dy != 0.0 {
        let ids: Vec<InstanceId> = controller.ids().cloned().collect();
        for id in &ids {
            controller.spin(id, dy);
        }
    }

    controller.step(dt);
    controller.end_tick();
}

/// Copy controller rotations onto die transforms and enlarge the hovered die.
pub fn apply_die_transforms(
    controller: Res<GestureController>,
    hovered: Res<HoveredDie>,
    settings: Res<StageSettings>,
    mut dice_query: Query<(&DieInstance, &mut Transform)>,
) {
    for (instance, mut transform) in dice_query.iter_mut() {
        if let Some(rotation) = controller.rotation(&instance.id) {
            transform.rotation = rotation.to_quat();
        }
        let scale = if hovered.0.as_ref() == Some(&instance.id) {
            settings.hover_scale
        } else {
            1.0
        };
        transform.scale = Vec3::splat(scale);
    }
}

/// Scale the stage root so dice keep their on-screen size when the window
/// height changes.
pub fn apply_pixel_stability(
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut stability: ResMut<PixelStability>,
    mut root_query: Query<&mut Transform, With<DiceStageRoot>>,
) {
    let Ok(window) = window_query.single() else {
        return;
    };
    let scale = stability.observe(window.height());
    for mut transform in root_query.iter_mut() {
        let target = Vec3::splat(scale);
        if transform.scale != target {
            transform.scale = target;
        }
    }
}

/// Keep the grid vertically centered in view.
pub fn frame_stage_camera(
    stage: Res<DiceStage>,
    settings: Res<StageSettings>,
    root_query: Query<&Transform, (With<DiceStageRoot>, Without<StageCamera>)>,
    mut camera_query: Query<(&mut Transform, &mut Projection), With<StageCamera>>,
) {
    let root_scale = root_query
        .single()
        .map(|transform| transform.scale.y)
        .unwrap_or(1.0);

    let layout = GridLayout::new(settings.columns, settings.cell_size);
    let center_y = layout.vertical_center(stage.instances().len()) * root_scale;

    for (mut transform, mut projection) in camera_query.iter_mut() {
        let target = Vec3::new(0.0, center_y, settings.camera_distance);
        if transform.translation != target {
            transform.translation = target;
        }

        if settings.is_changed() {
            if let Projection::Perspective(perspective) = &mut *projection {
                perspective.fov = settings.camera_fov_degrees.to_radians();
            }
        }
    }
}
