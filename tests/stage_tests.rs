//! Tests for stage state, layout, pixel stability and the roll spin

use bevy::math::Vec3;
use dicestage::dice3d::gesture::GestureController;
use dicestage::dice3d::layout::{GridLayout, PixelStability};
use dicestage::dice3d::roll::RollTrigger;
use dicestage::dice3d::types::{
    default_library, parse_library, DiceStage, DieDefinition, GestureSettings, InstanceId,
    RollSettings, StageMode,
};

fn sample_stage() -> DiceStage {
    DiceStage::new(vec![
        DieDefinition::new("d6", 6, "#ffffff"),
        DieDefinition::new("d20", 20, "#7b5df9"),
    ])
}

#[test]
fn test_library_mode_uses_die_ids() {
    let stage = sample_stage();
    let ids: Vec<String> = stage
        .instances()
        .into_iter()
        .map(|(id, _)| id.0)
        .collect();
    assert_eq!(ids, vec!["d6", "d20"]);
}

#[test]
fn test_same_die_selected_twice_gets_distinct_slots() {
    let mut stage = sample_stage();
    let first = stage.select("d6").unwrap();
    let second = stage.select("d6").unwrap();
    assert_ne!(first, second);
    assert_eq!(stage.select("d100"), None);

    stage.mode = StageMode::Selection;
    let instances = stage.instances();
    assert_eq!(instances.len(), 2);
    assert!(instances.iter().all(|(_, die)| die.id == "d6"));

    assert!(stage.deselect(&first));
    assert!(!stage.deselect(&first));
    assert_eq!(stage.instances()[0].0, second);
}

#[test]
fn test_hidden_stage_has_no_instances() {
    let mut stage = sample_stage();
    stage.hidden = true;
    assert!(stage.instances().is_empty());
}

#[test]
fn test_library_json_accepts_camel_case() {
    let json = r##"[
        {"id": "personas", "name": "Personas", "sides": 3,
         "options": ["a", "b", "c"], "colorHex": "#f97316", "pattern": "stripes"}
    ]"##;
    let dice = parse_library(json).unwrap();
    assert_eq!(dice.len(), 1);
    assert_eq!(dice[0].color_hex, "#f97316");
    assert!(parse_library("{not json").is_err());
}

#[test]
fn test_thirteen_dice_in_five_columns() {
    let layout = GridLayout::new(5, 2.4);
    let positions = layout.positions(13);

    assert_eq!(positions.len(), 13);
    assert_eq!(layout.rows(13), 3);
    // Same column spacing on every row, rows stacked downward
    assert!((positions[7].x - positions[2].x).abs() < 1e-6);
    assert!((positions[5].y - positions[0].y + 2.4).abs() < 1e-6);
    assert!((positions[10].y - positions[5].y + 2.4).abs() < 1e-6);
    assert!(positions.iter().all(|p| p.z == 0.0));
    assert_eq!(positions[0].x, -positions[4].x);
}

#[test]
fn test_layout_shared_across_modes() {
    let mut stage = DiceStage::new(default_library());
    stage.select("instruments");
    let layout = GridLayout::new(5, 2.4);

    let library_first = layout.position(0);
    stage.mode = StageMode::Selection;
    assert_eq!(stage.instances().len(), 1);
    assert_eq!(layout.position(0), library_first);
    assert_eq!(library_first, Vec3::new(-4.8, 0.0, 0.0));
}

#[test]
fn test_halved_height_doubles_scale() {
    let mut stability = PixelStability::default();
    assert_eq!(stability.observe(720.0), 1.0);
    assert_eq!(stability.observe(360.0), 2.0);
    assert_eq!(stability.observe(720.0), 1.0);
}

#[test]
fn test_roll_spins_for_duration_then_stops() {
    let settings = RollSettings::default();
    let mut trigger = RollTrigger::new(settings.clone());
    let mut controller = GestureController::new(GestureSettings::default());
    let id = InstanceId::from("instruments");
    controller.register(id.clone());

    let dt = 1.0 / 60.0;
    let mut now = 0.0_f64;
    let mut stage = sample_stage();
    trigger.observe(stage.roll_pulse, now);

    stage.trigger_roll();
    assert!(trigger.observe(stage.roll_pulse, now));

    let roll_secs = settings.duration_ms as f64 / 1000.0;
    let mut last_y = controller.rotation(&id).unwrap().y;
    while now + (dt as f64) < roll_secs {
        now += dt as f64;
        controller.spin(&id, trigger.spin_increment(now, dt));
        let y = controller.rotation(&id).unwrap().y;
        assert!(y > last_y, "spin stalled at {now:.3}s");
        last_y = y;
    }

    now = roll_secs + 0.05;
    for _ in 0..30 {
        now += dt as f64;
        controller.spin(&id, trigger.spin_increment(now, dt));
    }
    assert_eq!(controller.rotation(&id).unwrap().y, last_y);
}
