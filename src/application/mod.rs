//! Application layer
//!
//! Outer collaborators built on the resolution engine.

pub mod settings;

pub use settings::{SettingsError, SettingsRegistry};
