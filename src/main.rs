//! Cloud Bounce - Entry Point
//!
//! Controls:
//! - WASD: Move
//! - Shift: Sprint
//! - Space: Jump
//! - Mouse: Look around
//! - Left mouse: Swing sword / hold and release to fire the bow
//! - Q/E or 1/2: Switch weapon
//! - V: Toggle first/third person
//! - P or Escape: Pause/Unpause

use bevy::prelude::*;

fn main() {
    App::new()
        // Bevy default plugins
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Cloud Bounce".to_string(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))

        // Our game plugin
        .add_plugins(cloud_bounce::CloudBouncePlugin)

        .run();
}
