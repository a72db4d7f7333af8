//! Objects module - pooled props: collectibles, targets, fragments and
//! moving platforms, plus standing on platforms.

pub mod collision;
mod components;
mod plugin;
mod systems;

pub use components::*;
pub use plugin::ObjectsPlugin;
pub use systems::{spawn_collectible, spawn_moving_platform, spawn_target, ObjectAssets};
