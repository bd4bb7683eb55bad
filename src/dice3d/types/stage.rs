//! Collaborator-facing stage state and the selection messages it receives back.

use bevy::ecs::message::Message;
use bevy::prelude::*;

use super::die::{DieDefinition, InstanceId};

/// Which collection the stage renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum StageMode {
    /// The full library; a click asks to add the die to the selection
    #[default]
    Library,
    /// The current selection; a click asks to remove that slot
    Selection,
}

impl StageMode {
    pub fn toggled(self) -> Self {
        match self {
            StageMode::Library => StageMode::Selection,
            StageMode::Selection => StageMode::Library,
        }
    }

    pub fn parse(s: &str) -> Option<StageMode> {
        match s.to_lowercase().as_str() {
            "library" => Some(StageMode::Library),
            "selection" | "selected" => Some(StageMode::Selection),
            _ => None,
        }
    }
}

/// One slot of the selection. The same die may occupy several slots.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedDie {
    pub slot: InstanceId,
    pub die: DieDefinition,
}

/// Everything the collaborator feeds into the stage.
///
/// Mutating this resource is how the embedding app adds/removes dice,
/// switches mode, or plays a roll (by bumping `roll_pulse`).
#[derive(Resource, Clone, Debug, Default)]
pub struct DiceStage {
    pub mode: StageMode,
    pub library: Vec<DieDefinition>,
    pub selection: Vec<SelectedDie>,
    /// Incremented by the collaborator whenever a roll should play
    pub roll_pulse: u64,
    /// While true the stage renders nothing and ignores pointer input
    pub hidden: bool,
    next_slot: u64,
}

impl DiceStage {
    pub fn new(library: Vec<DieDefinition>) -> Self {
        Self {
            library,
            ..Default::default()
        }
    }

    /// Instances for the current mode, in grid order.
    pub fn instances(&self) -> Vec<(InstanceId, &DieDefinition)> {
        if self.hidden {
            return Vec::new();
        }
        match self.mode {
            StageMode::Library => self
                .library
                .iter()
                .map(|die| (InstanceId(die.id.clone()), die))
                .collect(),
            StageMode::Selection => self
                .selection
                .iter()
                .map(|sel| (sel.slot.clone(), &sel.die))
                .collect(),
        }
    }

    pub fn library_die(&self, die_id: &str) -> Option<&DieDefinition> {
        self.library.iter().find(|d| d.id == die_id)
    }

    /// Append a library die to the selection under a fresh slot id.
    pub fn select(&mut self, die_id: &str) -> Option<InstanceId> {
        let die = self.library_die(die_id)?.clone();
        self.next_slot += 1;
        let slot = InstanceId(format!("{}#{}", die.id, self.next_slot));
        self.selection.push(SelectedDie {
            slot: slot.clone(),
            die,
        });
        Some(slot)
    }

    /// Remove a selection slot. Returns false if it was not present.
    pub fn deselect(&mut self, slot: &InstanceId) -> bool {
        let before = self.selection.len();
        self.selection.retain(|s| &s.slot != slot);
        self.selection.len() != before
    }

    pub fn trigger_roll(&mut self) {
        self.roll_pulse = self.roll_pulse.wrapping_add(1);
    }
}

/// Emitted only for disambiguated clicks, never for drags.
#[derive(Message, Clone, Debug, PartialEq)]
pub enum StageSelection {
    AddFromLibrary { die_id: String },
    RemoveFromSelection { instance_id: InstanceId },
}

/// The instance currently under the cursor, if any.
#[derive(Resource, Default, Debug)]
pub struct HoveredDie(pub Option<InstanceId>);

/// Parent of every die entity; carries the pixel-stability scale
#[derive(Component)]
pub struct DiceStageRoot;

/// Marker for the camera looking at the stage
#[derive(Component)]
pub struct StageCamera;

/// UI text that follows a die on screen
#[derive(Component)]
pub struct DieLabel {
    pub die_entity: Entity,
}
