//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::components::Enemy;
use super::spawning::{setup_enemy_assets, spawn_initial_enemies};
use crate::core::{despawn_all, GameState, LevelSet, StepSet};

/// Enemy plugin - handles enemy spawning, AI and defeats.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_enemy_assets)
            .add_systems(
                OnEnter(GameState::InGame),
                despawn_all::<Enemy>.in_set(LevelSet::Reset),
            )
            .add_systems(
                OnEnter(GameState::InGame),
                spawn_initial_enemies.in_set(LevelSet::Populate),
            )
            .add_systems(OnEnter(GameState::MainMenu), despawn_all::<Enemy>)
            .add_systems(
                FixedUpdate,
                (ai::enemy_ai, ai::projectile_hits, ai::handle_enemy_defeats)
                    .chain()
                    .in_set(StepSet::Enemies),
            );
    }
}
