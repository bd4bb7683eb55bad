pub mod click_guard;
pub mod controller;
pub mod picking;

pub use click_guard::ClickGuard;
pub use controller::{
    clamp_tilt, AngularVelocity, DieRotation, DragSession, GestureController, GestureOutcome,
    PointerId, PointerSample, ReleaseTarget, TILT_LIMIT,
};
pub use picking::{nearest_hit, ray_sphere_hit};
