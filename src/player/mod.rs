//! Player module - player entity, movement, and camera control.

mod components;
mod movement;
mod plugin;

pub use components::*;
pub use movement::{camera_pose, integrate_motion, player_movement, spawn_player};
pub use plugin::PlayerPlugin;
