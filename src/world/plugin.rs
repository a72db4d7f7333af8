//! World plugin - level loading, terrain motion and the win condition.

use bevy::prelude::*;

use crate::core::progression::apply_experience;
use crate::core::{advance_clock, despawn_all, GameState, LevelSet, PlayerStats, StepSet, Tuning};
use crate::player::{spawn_player, Player};
use crate::rendering::VisualConfig;

use super::builder::build_level_from_data;
use super::components::{FinishGate, LevelGeometry, PlatformMotion};
use super::data::{load_level_definition, CurrentLevel};

/// World plugin - handles level loading and world setup.
pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CurrentLevel>()
            .add_systems(Startup, load_level_definition)
            .add_systems(
                OnEnter(GameState::InGame),
                despawn_all::<LevelGeometry>.in_set(LevelSet::Reset),
            )
            .add_systems(OnEnter(GameState::InGame), setup_level.in_set(LevelSet::Build))
            .add_systems(OnEnter(GameState::MainMenu), despawn_all::<LevelGeometry>)
            .add_systems(
                FixedUpdate,
                animate_platforms.in_set(StepSet::Clock).after(advance_clock),
            )
            .add_systems(
                FixedUpdate,
                check_victory.in_set(StepSet::Outcome).after(apply_experience),
            );
    }
}

/// Set up the level from data.
pub fn setup_level(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    current_level: Res<CurrentLevel>,
    visual_config: Res<VisualConfig>,
    tuning: Res<Tuning>,
) {
    let level = &current_level.0;
    info!("Building level: {}", level.name);

    let player_pos = build_level_from_data(
        &mut commands,
        &mut meshes,
        &mut materials,
        level,
        &visual_config,
    );

    spawn_player(
        &mut commands,
        &mut meshes,
        &mut materials,
        player_pos,
        &tuning,
        &visual_config,
    );
}

/// Advance every moving platform by one step.
pub fn animate_platforms(mut query: Query<(&mut Transform, &mut PlatformMotion)>) {
    for (mut transform, mut motion) in query.iter_mut() {
        transform.translation.y = motion.advance();
    }
}

/// End the run once the player reaches the finish gate.
///
/// Runs last in the step; a player who died this step does not win.
pub fn check_victory(
    tuning: Res<Tuning>,
    stats: Res<PlayerStats>,
    player_query: Query<&Transform, With<Player>>,
    gate_query: Query<&Transform, (With<FinishGate>, Without<Player>)>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    if stats.is_dead() {
        return;
    }
    let Ok(player) = player_query.get_single() else {
        return;
    };
    let Ok(gate) = gate_query.get_single() else {
        return;
    };

    if player.translation.distance(gate.translation) < tuning.progression.victory_distance {
        info!("Finish gate reached! Transitioning to Victory...");
        next_state.set(GameState::Victory);
    }
}
