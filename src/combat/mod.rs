//! Combat module - sword, bow, and projectiles.

mod components;
mod plugin;
mod systems;
pub mod weapons;

pub use components::*;
pub use plugin::CombatPlugin;
pub use systems::{spawn_projectile, step_projectiles, CombatAssets};
