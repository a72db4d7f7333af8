//! World module - terrain, level data and the finish gate.

mod builder;
mod components;
mod data;
mod error;
mod materials;
mod plugin;

pub use builder::build_level_from_data;
pub use components::{Bounds, FinishGate, LevelGeometry, Platform, PlatformMotion};
pub use data::{BobDef, CurrentLevel, LevelDefinition, PlatformDef, PlatformShape, LEVEL_PATH};
pub use error::DataLoadError;
pub use plugin::{animate_platforms, check_victory, setup_level, WorldPlugin};
