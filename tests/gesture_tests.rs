//! Tests for drag-to-rotate, click disambiguation and inertia

use bevy::math::Vec2;
use dicestage::dice3d::gesture::{
    GestureController, GestureOutcome, PointerId, PointerSample, ReleaseTarget, TILT_LIMIT,
};
use dicestage::dice3d::types::{GestureSettings, InstanceId};

const FRAME: f32 = 1.0 / 60.0;

fn controller_with(ids: &[&str]) -> GestureController {
    let mut controller = GestureController::new(GestureSettings::default());
    for id in ids {
        controller.register(InstanceId::from(*id));
    }
    controller.mount();
    controller
}

fn sample(x: f32, y: f32, t: f64) -> PointerSample {
    PointerSample::new(Vec2::new(x, y), t)
}

/// Press on `id`, drag right in 20px steps every 16ms, release over the window.
fn fling(controller: &mut GestureController, id: &InstanceId) -> Option<GestureOutcome> {
    let pointer = PointerId::MOUSE;
    assert!(controller.pointer_down(pointer, id, sample(0.0, 0.0, 0.0)));
    for step in 1..=4 {
        let outcome = controller.pointer_move(
            pointer,
            sample(20.0 * step as f32, 0.0, 16.0 * step as f64),
            true,
        );
        assert_eq!(outcome, None);
    }
    controller.release(pointer, ReleaseTarget::Window)
}

#[test]
fn test_sub_threshold_drag_is_a_click() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");

    assert!(controller.pointer_down(PointerId::MOUSE, &a, sample(100.0, 100.0, 0.0)));
    controller.pointer_move(PointerId::MOUSE, sample(101.0, 101.5, 16.0), true);
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Instance(a.clone()));

    assert_eq!(outcome, Some(GestureOutcome::Click(a.clone())));
    assert_eq!(controller.inertia(&a), None);
    assert!(!controller.is_dragging(&a));
}

#[test]
fn test_release_over_other_die_is_not_a_click() {
    let mut controller = controller_with(&["a", "b"]);
    let a = InstanceId::from("a");

    controller.pointer_down(PointerId::MOUSE, &a, sample(0.0, 0.0, 0.0));
    let b = InstanceId::from("b");
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Instance(b));
    assert_eq!(
        outcome,
        Some(GestureOutcome::Released {
            id: a,
            inertia: None
        })
    );
}

#[test]
fn test_drag_suppresses_click_and_leaves_inertia() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");

    let Some(GestureOutcome::Released { id, inertia }) = fling(&mut controller, &a) else {
        panic!("drag should end without a click");
    };
    assert_eq!(id, a);
    let inertia = inertia.expect("a fast drag commits inertia");
    assert!(inertia.y > 0.0);
    assert_eq!(controller.inertia(&a), Some(inertia));

    // The click that arrives right after the drag's release is swallowed
    controller.pointer_down(PointerId::MOUSE, &a, sample(80.0, 0.0, 75.0));
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Instance(a.clone()));
    assert!(!matches!(outcome, Some(GestureOutcome::Click(_))));

    // Next frame clicks work again
    controller.end_tick();
    controller.pointer_down(PointerId::MOUSE, &a, sample(80.0, 0.0, 100.0));
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Instance(a.clone()));
    assert_eq!(outcome, Some(GestureOutcome::Click(a)));
}

#[test]
fn test_inertia_decays_and_is_removed() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");
    fling(&mut controller, &a);
    controller.end_tick();

    let released_at = controller.rotation(&a).unwrap().y;
    controller.step(FRAME);
    let after_one_frame = controller.rotation(&a).unwrap().y;
    assert!(after_one_frame > released_at);

    for _ in 0..600 {
        controller.step(FRAME);
    }
    assert_eq!(controller.inertia(&a), None);
    assert_eq!(controller.active_inertia_count(), 0);

    let settled = controller.rotation(&a).unwrap();
    controller.step(FRAME);
    assert_eq!(controller.rotation(&a).unwrap(), settled);
}

#[test]
fn test_new_drag_clears_inertia() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");
    fling(&mut controller, &a);
    controller.end_tick();
    assert!(controller.inertia(&a).is_some());

    controller.pointer_down(PointerId::MOUSE, &a, sample(0.0, 0.0, 200.0));
    assert_eq!(controller.inertia(&a), None);
    assert!(controller.is_dragging(&a));

    let held = controller.rotation(&a).unwrap();
    controller.step(FRAME);
    assert_eq!(controller.rotation(&a).unwrap(), held);
}

#[test]
fn test_vertical_drag_clamps_tilt() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");

    controller.pointer_down(PointerId::MOUSE, &a, sample(0.0, 0.0, 0.0));
    controller.pointer_move(PointerId::MOUSE, sample(0.0, 5000.0, 16.0), true);
    assert!((controller.rotation(&a).unwrap().x - TILT_LIMIT).abs() < 1e-6);

    controller.pointer_move(PointerId::MOUSE, sample(0.0, -5000.0, 32.0), true);
    assert!((controller.rotation(&a).unwrap().x + TILT_LIMIT).abs() < 1e-6);
}

#[test]
fn test_press_on_unknown_die_is_ignored() {
    let mut controller = controller_with(&["a"]);
    let ghost = InstanceId::from("ghost");
    assert!(!controller.pointer_down(PointerId::MOUSE, &ghost, sample(0.0, 0.0, 0.0)));
    assert!(!controller.is_dragging(&ghost));
}

#[test]
fn test_window_release_needs_mount() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");
    controller.unmount();

    controller.pointer_down(PointerId::MOUSE, &a, sample(0.0, 0.0, 0.0));
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Window);
    assert_eq!(outcome, None);
    assert!(controller.is_dragging(&a));

    controller.mount();
    let outcome = controller.release(PointerId::MOUSE, ReleaseTarget::Window);
    assert!(matches!(outcome, Some(GestureOutcome::Released { .. })));
}

#[test]
fn test_missed_release_ends_drag_on_next_move() {
    let mut controller = controller_with(&["a"]);
    let a = InstanceId::from("a");

    controller.pointer_down(PointerId::MOUSE, &a, sample(0.0, 0.0, 0.0));
    controller.pointer_move(PointerId::MOUSE, sample(30.0, 0.0, 16.0), true);
    let outcome = controller.pointer_move(PointerId::MOUSE, sample(40.0, 0.0, 32.0), false);
    assert!(matches!(outcome, Some(GestureOutcome::Released { .. })));
    assert!(!controller.is_dragging(&a));
}

#[test]
fn test_forgotten_die_drops_all_state() {
    let mut controller = controller_with(&["a", "b"]);
    let a = InstanceId::from("a");
    fling(&mut controller, &a);

    controller.retain([&InstanceId::from("b")]);
    assert!(!controller.is_registered(&a));
    assert_eq!(controller.inertia(&a), None);
    assert_eq!(controller.active_inertia_count(), 0);
}
