//! Combat plugin - weapons and projectiles.

use bevy::prelude::*;

use super::components::Projectile;
use super::systems::*;
use crate::core::{despawn_all, GameState, LevelSet, StepSet};
use crate::player::player_movement;

/// Combat plugin - handles all combat systems.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, setup_combat_assets)
            .add_systems(
                FixedUpdate,
                (handle_weapon_switch, handle_attack_input, step_projectiles)
                    .chain()
                    .in_set(StepSet::Player)
                    .after(player_movement),
            )
            .add_systems(
                OnEnter(GameState::InGame),
                despawn_all::<Projectile>.in_set(LevelSet::Reset),
            )
            .add_systems(OnEnter(GameState::MainMenu), despawn_all::<Projectile>);
    }
}
