//! Type definitions for the dice stage
//!
//! This module is organized into submodules:
//! - `die` - Die definitions, instance ids and per-instance components
//! - `stage` - The collaborator-owned stage resource and selection messages
//! - `settings` - Stage configuration and loading
//! - `error` - Error type for loaders and resolvers

pub mod die;
pub mod error;
pub mod settings;
pub mod stage;

// Re-export all public types for convenient access
pub use die::*;
pub use error::*;
pub use settings::*;
pub use stage::*;
