//! Player plugin - input, movement and camera.

use bevy::prelude::*;

use super::components::*;
use super::movement::*;
use crate::core::{despawn_all, update_smooth_follow, GameState, LevelSet, PlayState, StepSet};

/// Player plugin - handles player input, movement, and camera.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PlayerInput>()
            .add_systems(OnEnter(PlayState::Running), grab_cursor)
            .add_systems(OnExit(PlayState::Running), release_cursor)
            .add_systems(
                OnEnter(GameState::InGame),
                (
                    despawn_all::<Player>,
                    despawn_all::<PlayerCamera>,
                    reset_input,
                )
                    .in_set(LevelSet::Reset),
            )
            .add_systems(
                OnEnter(GameState::MainMenu),
                (despawn_all::<Player>, despawn_all::<PlayerCamera>),
            )
            // Input is sampled every rendered frame
            .add_systems(
                Update,
                (read_player_input, mouse_look).run_if(in_state(PlayState::Running)),
            )
            .add_systems(
                Update,
                (toggle_view, update_camera)
                    .chain()
                    .before(update_smooth_follow)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(FixedUpdate, player_movement.in_set(StepSet::Player));
    }
}

/// Drop anything latched during the previous run.
fn reset_input(mut input: ResMut<PlayerInput>) {
    *input = PlayerInput::default();
}
