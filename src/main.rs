// Hide console window on Windows for release builds (GUI app).
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use std::path::PathBuf;

use bevy::prelude::*;
use clap::Parser;

use dicestage::dice3d::layout::GridLayout;
use dicestage::dice3d::types::{default_library, load_library};
use dicestage::dice3d::{DiceStage, DiceStagePlugin, StageMode, StageSelection, StageSettings};

const WINDOW_WIDTH: u32 = 1280;
const MIN_WINDOW_HEIGHT: f32 = 360.0;

/// Dice stage viewer
///
/// Click a die in the library to add it to the selection, click a selected
/// die to remove it. Drag to rotate, R to roll, Tab to switch views and
/// H to hide the stage.
#[derive(Parser, Debug)]
#[command(name = "dicestage", author, version, about, long_about = None)]
struct Args {
    /// JSON dice library (defaults to the bundled one)
    #[arg(short, long)]
    library: Option<PathBuf>,

    /// Stage settings file (.ron or .json)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// View to start in: "library" or "selection"
    #[arg(short, long, default_value = "library", value_parser = parse_mode_arg)]
    mode: StageMode,

    /// Die ids to pre-select. Can be repeated.
    #[arg(long = "select")]
    select: Vec<String>,
}

fn parse_mode_arg(s: &str) -> Result<StageMode, String> {
    StageMode::parse(s).ok_or_else(|| format!("Unknown mode: {}. Valid: library, selection", s))
}

fn load_settings(path: Option<&PathBuf>) -> StageSettings {
    let Some(path) = path else {
        return StageSettings::default();
    };
    match StageSettings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Warning: {}; using default stage settings", e);
            StageSettings::default()
        }
    }
}

fn load_dice(path: Option<&PathBuf>) -> DiceStage {
    let library = match path {
        Some(path) => load_library(path).unwrap_or_else(|e| {
            eprintln!("Warning: {}; using the bundled dice library", e);
            default_library()
        }),
        None => default_library(),
    };
    DiceStage::new(library)
}

fn main() {
    let args = Args::parse();

    // Logging isn't up until the app runs, so load problems go to stderr
    let settings = load_settings(args.settings.as_ref());
    let mut stage = load_dice(args.library.as_ref());
    for die_id in &args.select {
        if stage.select(die_id).is_none() {
            eprintln!("Warning: no die '{}' in the library, not selecting it", die_id);
        }
    }
    stage.mode = args.mode;

    let layout = GridLayout::new(settings.columns, settings.cell_size);
    let height = layout.content_height(
        stage.instances().len(),
        settings.row_px,
        Some(MIN_WINDOW_HEIGHT),
    );

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Dice Stage".to_string(),
                resolution: (WINDOW_WIDTH, height.round() as u32).into(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(DiceStagePlugin::new(settings))
        .insert_resource(stage)
        .add_systems(Update, (apply_stage_selections, handle_stage_keys))
        .run();
}

/// Plays the collaborator role: turns clicks into selection changes.
fn apply_stage_selections(
    mut selections: MessageReader<StageSelection>,
    mut stage: ResMut<DiceStage>,
) {
    for selection in selections.read() {
        match selection {
            StageSelection::AddFromLibrary { die_id } => {
                if let Some(slot) = stage.select(die_id) {
                    info!("Selected {} as {}", die_id, slot);
                }
            }
            StageSelection::RemoveFromSelection { instance_id } => {
                if stage.deselect(instance_id) {
                    info!("Removed {} from the selection", instance_id);
                }
            }
        }
    }
}

fn handle_stage_keys(keyboard: Res<ButtonInput<KeyCode>>, mut stage: ResMut<DiceStage>) {
    if keyboard.just_pressed(KeyCode::KeyR) {
        stage.trigger_roll();
    }
    if keyboard.just_pressed(KeyCode::Tab) {
        stage.mode = stage.mode.toggled();
        info!("Showing {:?}", stage.mode);
    }
    if keyboard.just_pressed(KeyCode::KeyH) {
        stage.hidden = !stage.hidden;
    }
}
