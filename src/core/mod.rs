//! Core game module - states, fixed-step clock, events, tuning and progression.
//!
//! This module provides the foundation that all other game systems build upon.

mod events;
mod plugin;
pub mod progression;
mod states;
mod step;
pub mod tuning;
mod tween;

pub use events::*;
pub use plugin::CorePlugin;
pub use progression::PlayerStats;
pub use states::*;
pub use step::*;
pub use tuning::Tuning;
pub use tween::*;
