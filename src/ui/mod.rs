//! UI module - menus, HUD, and floating feedback text.

mod hud;
mod plugin;

pub use hud::{floating_text_pose, hud_line, HudText};
pub use plugin::UiPlugin;
