pub mod appearance;
pub mod gesture;
pub mod layout;
pub mod meshes;
pub mod orientation;
pub mod plugin;
pub mod roll;
pub mod systems;
pub mod types;

pub use plugin::*;
pub use systems::*;
pub use types::*;
