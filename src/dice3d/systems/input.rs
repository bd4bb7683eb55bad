//! Pointer input systems
//!
//! Casts a ray from the stage camera through the cursor, picks the nearest
//! die and feeds press/move/release into the gesture controller. Clicks the
//! controller accepts become `StageSelection` messages.

use bevy::prelude::*;
use bevy::window::{CursorMoved, PrimaryWindow};

use crate::dice3d::gesture::{
    nearest_hit, GestureController, GestureOutcome, PointerId, PointerSample, ReleaseTarget,
};
use crate::dice3d::meshes::TARGET_RADIUS;
use crate::dice3d::types::*;

/// The die under `cursor`, nearest to the camera first.
fn pick_die(
    cursor: Vec2,
    camera: &Camera,
    camera_transform: &GlobalTransform,
    dice_query: &Query<(&DieInstance, &GlobalTransform)>,
) -> Option<InstanceId> {
    let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
    let candidates = dice_query.iter().map(|(instance, transform)| {
        let scale = transform.compute_transform().scale.max_element();
        (instance.id.clone(), transform.translation(), TARGET_RADIUS * scale)
    });
    nearest_hit(ray.origin, *ray.direction, candidates)
}

fn selection_for(stage: &DiceStage, id: InstanceId) -> Option<StageSelection> {
    match stage.mode {
        StageMode::Library => stage
            .library_die(id.as_str())
            .map(|die| StageSelection::AddFromLibrary {
                die_id: die.id.clone(),
            }),
        StageMode::Selection => Some(StageSelection::RemoveFromSelection { instance_id: id }),
    }
}

#[allow(clippy::too_many_arguments)]
pub fn handle_pointer_input(
    stage: Res<DiceStage>,
    time: Res<Time>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut cursor_moved: MessageReader<CursorMoved>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&Camera, &GlobalTransform), With<StageCamera>>,
    dice_query: Query<(&DieInstance, &GlobalTransform)>,
    mut controller: ResMut<GestureController>,
    mut hovered: ResMut<HoveredDie>,
    mut selections: MessageWriter<StageSelection>,
) {
    // Only the latest position per frame; several samples with one
    // timestamp would read as absurd velocities.
    let latest_move = cursor_moved.read().last().map(|moved| moved.position);

    if stage.hidden {
        if hovered.0.is_some() {
            hovered.0 = None;
        }
        return;
    }

    let Ok(window) = window_query.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };

    let now_ms = time.elapsed_secs_f64() * 1000.0;
    let pointer = PointerId::MOUSE;
    let cursor = window.cursor_position();
    let hit = cursor.and_then(|c| pick_die(c, camera, camera_transform, &dice_query));

    if hovered.0 != hit {
        hovered.0 = hit.clone();
    }

    if mouse.just_pressed(MouseButton::Left) {
        if let (Some(id), Some(position)) = (&hit, cursor) {
            controller.pointer_down(pointer, id, PointerSample::new(position, now_ms));
        }
    }

    let mut outcome = None;

    if let Some(position) = latest_move {
        // A release this frame is handled below, so it still counts as held
        let held = mouse.pressed(MouseButton::Left) || mouse.just_released(MouseButton::Left);
        outcome = controller.pointer_move(pointer, PointerSample::new(position, now_ms), held);
    }

    if mouse.just_released(MouseButton::Left) {
        let target = match &hit {
            Some(id) => ReleaseTarget::Instance(id.clone()),
            None => ReleaseTarget::Window,
        };
        outcome = controller.release(pointer, target).or(outcome);
    }

    match outcome {
        Some(GestureOutcome::Click(id)) => {
            if let Some(selection) = selection_for(&stage, id) {
                debug!("Die clicked: {:?}", selection);
                selections.write(selection);
            }
        }
        Some(GestureOutcome::Released {
            id,
            inertia: Some(velocity),
        }) => {
            debug!("Die {} released with inertia {:?}", id, velocity);
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> DiceStage {
        DiceStage::new(vec![
            DieDefinition::new("d6", 6, "#ff0000"),
            DieDefinition::new("d20", 20, "#00ff00"),
        ])
    }

    #[test]
    fn test_library_click_adds_die() {
        let stage = stage();
        let selection = selection_for(&stage, InstanceId::from("d20"));
        assert_eq!(
            selection,
            Some(StageSelection::AddFromLibrary {
                die_id: "d20".to_string()
            })
        );
    }

    #[test]
    fn test_selection_click_removes_slot() {
        let mut stage = stage();
        let slot = stage.select("d6").unwrap();
        stage.mode = StageMode::Selection;
        let selection = selection_for(&stage, slot.clone());
        assert_eq!(
            selection,
            Some(StageSelection::RemoveFromSelection { instance_id: slot })
        );
    }

    #[test]
    fn test_unknown_library_die_selects_nothing() {
        let stage = stage();
        assert_eq!(selection_for(&stage, InstanceId::from("d100")), None);
    }
}
