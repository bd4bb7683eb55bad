//! Drag-to-rotate with inertia, and click/drag disambiguation.
//!
//! The controller is a plain state machine keyed by instance id. Bevy
//! systems translate window input into `pointer_down` / `pointer_move` /
//! `release` calls and read rotations back out; nothing here touches the
//! ECS, so the whole gesture model is testable without an `App`.

use std::collections::HashMap;

use bevy::prelude::*;

use super::click_guard::ClickGuard;
use crate::dice3d::types::{GestureSettings, InstanceId};

/// Maximum tilt about X in either direction (radians)
pub const TILT_LIMIT: f32 = 1.2;

pub fn clamp_tilt(x: f32) -> f32 {
    x.clamp(-TILT_LIMIT, TILT_LIMIT)
}

/// Identifies the device driving a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

impl PointerId {
    pub const MOUSE: PointerId = PointerId(0);
}

/// Per-instance rotation in radians: `x` tilts, `y` spins.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DieRotation {
    pub x: f32,
    pub y: f32,
}

impl DieRotation {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x: clamp_tilt(x), y }
    }

    pub fn to_quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.x, self.y, 0.0)
    }
}

/// Radians per second about each axis.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AngularVelocity {
    pub x: f32,
    pub y: f32,
}

impl AngularVelocity {
    fn exceeds(&self, threshold: f32) -> bool {
        self.x.abs() > threshold || self.y.abs() > threshold
    }
}

/// A pointer position with the time it was observed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Logical pixels, y growing downward
    pub position: Vec2,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(position: Vec2, timestamp_ms: f64) -> Self {
        Self {
            position,
            timestamp_ms,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DragSession {
    pub pointer: PointerId,
    pub start_position: Vec2,
    pub start_rotation: DieRotation,
    /// Set once the pointer strays past the drag threshold; never cleared
    pub moved: bool,
    pub last_rotation: DieRotation,
    pub last_timestamp_ms: f64,
    pub last_velocity: AngularVelocity,
}

/// Where a pointer was released.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseTarget {
    /// Over this instance's hit volume
    Instance(InstanceId),
    /// Anywhere else; only delivered while the controller is mounted
    Window,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// A press and release on the same die without a drag
    Click(InstanceId),
    /// The session ended without a click, possibly leaving inertia behind
    Released {
        id: InstanceId,
        inertia: Option<AngularVelocity>,
    },
}

#[derive(Resource, Debug, Clone, Default)]
pub struct GestureController {
    settings: GestureSettings,
    rotations: HashMap<InstanceId, DieRotation>,
    sessions: HashMap<InstanceId, DragSession>,
    inertia: HashMap<InstanceId, AngularVelocity>,
    click_guard: ClickGuard,
    mounted: bool,
}

impl GestureController {
    pub fn new(settings: GestureSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn settings(&self) -> &GestureSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GestureSettings) {
        self.settings = settings;
    }

    // ------------------------------------------------------------------
    // Instance bookkeeping
    // ------------------------------------------------------------------

    /// Start tracking `id` at rest. Existing state is kept.
    pub fn register(&mut self, id: InstanceId) {
        self.rotations.entry(id).or_default();
    }

    pub fn forget(&mut self, id: &InstanceId) {
        self.rotations.remove(id);
        self.sessions.remove(id);
        self.inertia.remove(id);
    }

    /// Drop all state for instances not in `ids`.
    pub fn retain<'a>(&mut self, ids: impl IntoIterator<Item = &'a InstanceId>) {
        let keep: std::collections::HashSet<&InstanceId> = ids.into_iter().collect();
        self.rotations.retain(|id, _| keep.contains(id));
        self.sessions.retain(|id, _| keep.contains(id));
        self.inertia.retain(|id, _| keep.contains(id));
    }

    pub fn is_registered(&self, id: &InstanceId) -> bool {
        self.rotations.contains_key(id)
    }

    pub fn rotation(&self, id: &InstanceId) -> Option<DieRotation> {
        self.rotations.get(id).copied()
    }

    pub fn set_rotation(&mut self, id: &InstanceId, rotation: DieRotation) {
        if let Some(current) = self.rotations.get_mut(id) {
            *current = DieRotation::new(rotation.x, rotation.y);
        }
    }

    pub fn inertia(&self, id: &InstanceId) -> Option<AngularVelocity> {
        self.inertia.get(id).copied()
    }

    pub fn session(&self, id: &InstanceId) -> Option<&DragSession> {
        self.sessions.get(id)
    }

    pub fn is_dragging(&self, id: &InstanceId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn active_inertia_count(&self) -> usize {
        self.inertia.len()
    }

    // ------------------------------------------------------------------
    // Window-level release subscription
    // ------------------------------------------------------------------

    pub fn mount(&mut self) {
        self.mounted = true;
    }

    /// Stop listening for window releases and abandon open drags.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.sessions.clear();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ------------------------------------------------------------------
    // Pointer events
    // ------------------------------------------------------------------

    fn session_for(&self, pointer: PointerId) -> Option<InstanceId> {
        self.sessions
            .iter()
            .find(|(_, session)| session.pointer == pointer)
            .map(|(id, _)| id.clone())
    }

    /// Begin a drag on `id`.
    ///
    /// Returns `true` when the press was consumed and must not reach any
    /// other hit region. Unknown instances are ignored.
    pub fn pointer_down(
        &mut self,
        pointer: PointerId,
        id: &InstanceId,
        sample: PointerSample,
    ) -> bool {
        let Some(rotation) = self.rotations.get(id).copied() else {
            debug!("Ignoring press on unknown die instance {}", id);
            return false;
        };

        // A pointer drives one die at a time
        if self.session_for(pointer).is_some() {
            self.cancel(pointer);
        }

        self.inertia.remove(id);
        self.sessions.insert(
            id.clone(),
            DragSession {
                pointer,
                start_position: sample.position,
                start_rotation: rotation,
                moved: false,
                last_rotation: rotation,
                last_timestamp_ms: sample.timestamp_ms,
                last_velocity: AngularVelocity::default(),
            },
        );
        true
    }

    /// Rotate the die dragged by `pointer`.
    ///
    /// A move with no buttons held means the release was missed; it ends the
    /// session as a window-level release.
    pub fn pointer_move(
        &mut self,
        pointer: PointerId,
        sample: PointerSample,
        buttons_down: bool,
    ) -> Option<GestureOutcome> {
        let id = self.session_for(pointer)?;
        if !buttons_down {
            return self.finish(&id, false);
        }

        let sensitivity = self.settings.sensitivity;
        let threshold = self.settings.drag_threshold_px;
        let min_interval = self.settings.min_sample_interval_ms as f64;

        let session = self.sessions.get_mut(&id)?;
        let delta = sample.position - session.start_position;
        if delta.x.abs() > threshold || delta.y.abs() > threshold {
            session.moved = true;
        }

        let rotation = DieRotation {
            x: clamp_tilt(session.start_rotation.x + delta.y * sensitivity),
            y: session.start_rotation.y + delta.x * sensitivity,
        };

        let elapsed_ms = (sample.timestamp_ms - session.last_timestamp_ms).max(min_interval);
        let dt = (elapsed_ms / 1000.0) as f32;
        session.last_velocity = AngularVelocity {
            x: (rotation.x - session.last_rotation.x) / dt,
            y: (rotation.y - session.last_rotation.y) / dt,
        };
        session.last_rotation = rotation;
        session.last_timestamp_ms = sample.timestamp_ms;

        self.rotations.insert(id, rotation);
        None
    }

    /// End the drag owned by `pointer`.
    ///
    /// Inertia comes from the velocity of the last move; a release carries
    /// no position of its own.
    pub fn release(&mut self, pointer: PointerId, target: ReleaseTarget) -> Option<GestureOutcome> {
        let id = self.session_for(pointer)?;
        match target {
            ReleaseTarget::Instance(over) => {
                let over_same = over == id;
                self.finish(&id, over_same)
            }
            ReleaseTarget::Window if self.mounted => self.finish(&id, false),
            ReleaseTarget::Window => None,
        }
    }

    /// Abandon the drag owned by `pointer`. Never produces a click.
    pub fn cancel(&mut self, pointer: PointerId) -> Option<GestureOutcome> {
        let id = self.session_for(pointer)?;
        self.finish(&id, false)
    }

    /// Close the session on `id`. Only a moved session commits inertia, taken
    /// from the velocity of its last move.
    fn finish(&mut self, id: &InstanceId, over_same: bool) -> Option<GestureOutcome> {
        let session = self.sessions.remove(id)?;

        if !session.moved {
            if over_same && self.click_guard.try_claim() {
                return Some(GestureOutcome::Click(id.clone()));
            }
            return Some(GestureOutcome::Released {
                id: id.clone(),
                inertia: None,
            });
        }

        // The click that follows this release belongs to the drag
        self.click_guard.engage();

        let velocity = session.last_velocity;

        let inertia = if velocity.exceeds(self.settings.min_commit_velocity) {
            self.inertia.insert(id.clone(), velocity);
            Some(velocity)
        } else {
            None
        };

        Some(GestureOutcome::Released {
            id: id.clone(),
            inertia,
        })
    }

    // ------------------------------------------------------------------
    // Per-frame updates
    // ------------------------------------------------------------------

    /// Integrate inertia over `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        let damping = self.settings.damping_base.powf(dt);
        let rest = self.settings.rest_epsilon;
        let rotations = &mut self.rotations;

        self.inertia.retain(|id, velocity| {
            let Some(rotation) = rotations.get_mut(id) else {
                return false;
            };
            rotation.x = clamp_tilt(rotation.x + velocity.x * dt);
            rotation.y += velocity.y * dt;
            velocity.x *= damping;
            velocity.y *= damping;
            velocity.x.abs() >= rest || velocity.y.abs() >= rest
        });
    }

    /// Add `dy` to the spin of `id`, e.g. while a roll plays.
    pub fn spin(&mut self, id: &InstanceId, dy: f32) {
        if let Some(rotation) = self.rotations.get_mut(id) {
            rotation.y += dy;
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &InstanceId> {
        self.rotations.keys()
    }

    /// Expire the click guard. Call once per frame after input handling.
    pub fn end_tick(&mut self) {
        self.click_guard.advance();
    }
}
