//! Cloud Bounce - a small 3D action game about hopping between cloud platforms.
//!
//! The player jumps across floating platforms toward a finish gate while
//! fighting wandering enemies with a sword and a chargeable bow, breaking
//! targets and picking up collectibles for score and experience.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, fixed logic step, events, tuning, progression
//! - **Player**: Movement integration, input, first/third-person camera
//! - **Combat**: Sword, bow, projectiles
//! - **Objects**: Collectibles, targets, fragments, moving platforms
//! - **Enemies**: Wander/chase AI, contact damage, respawning
//! - **World**: Level data, platforms, finish gate
//! - **Rendering**: Sky colour, fog and lighting config
//! - **UI**: Menus, HUD, floating feedback text
//!
//! All gameplay runs in `FixedUpdate` at 60 steps per second, ordered by
//! [`core::StepSet`]. Rendering-only work (camera smoothing, HUD) runs in
//! `Update`.

pub mod combat;
pub mod core;
pub mod enemies;
pub mod objects;
pub mod player;
pub mod rendering;
pub mod ui;
pub mod world;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct CloudBouncePlugin;

impl Plugin for CloudBouncePlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Pooled objects
            .add_plugins(objects::ObjectsPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // World systems
            .add_plugins(world::WorldPlugin)

            // Rendering systems
            .add_plugins(rendering::RenderingPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
