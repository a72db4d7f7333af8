//! Core plugin that sets up game states, events, the fixed step and progression.

use bevy::prelude::*;

use super::events::*;
use super::progression::{apply_experience, apply_player_hits, reset_progression, PlayerStats};
use super::states::*;
use super::step::*;
use super::tuning::{load_tuning, Tuning};
use super::tween::*;

/// Core plugin - must be added first as other plugins depend on it.
///
/// This plugin sets up:
/// - Game states (Loading, MainMenu, InGame, GameOver, Victory) and the
///   Running/Paused sub-state
/// - The 60 Hz fixed step and its ordered `StepSet`s
/// - Global events (PlayerHitEvent, ExperienceEvent, LevelUpEvent)
/// - Tuning loading and progression
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        app
            // Initialize game states
            .init_state::<GameState>()
            .add_sub_state::<PlayState>()

            // Register global events
            .add_event::<PlayerHitEvent>()
            .add_event::<ExperienceEvent>()
            .add_event::<LevelUpEvent>()

            // Resources
            .insert_resource(Time::<Fixed>::from_hz(STEP_HZ))
            .init_resource::<Tuning>()
            .init_resource::<SimClock>()
            .init_resource::<PlayerStats>()

            // Logic step ordering, only while a run is active and unpaused
            .configure_sets(
                FixedUpdate,
                (
                    StepSet::Clock,
                    StepSet::Player,
                    StepSet::Collision,
                    StepSet::Objects,
                    StepSet::Enemies,
                    StepSet::Outcome,
                )
                    .chain()
                    .run_if(in_state(PlayState::Running)),
            )
            .configure_sets(
                OnEnter(GameState::InGame),
                (LevelSet::Reset, LevelSet::Build, LevelSet::Populate).chain(),
            )

            // Data files are read once at startup
            .add_systems(Startup, load_tuning)
            .add_systems(OnEnter(GameState::Loading), transition_to_main_menu)

            .add_systems(OnEnter(GameState::InGame), reset_progression.in_set(LevelSet::Reset))
            .add_systems(FixedUpdate, advance_clock.in_set(StepSet::Clock))
            .add_systems(
                FixedUpdate,
                (apply_player_hits, apply_experience)
                    .chain()
                    .in_set(StepSet::Outcome),
            )

            // Pause/unpause with P or Escape
            .add_systems(Update, handle_pause_input.run_if(in_state(GameState::InGame)))

            // Camera smoothing (runs every rendered frame)
            .add_systems(Update, update_smooth_follow);
    }
}

/// Move on to the title screen once startup loading has run.
fn transition_to_main_menu(mut next_state: ResMut<NextState<GameState>>) {
    next_state.set(GameState::MainMenu);
}

/// Handle P/Escape to pause and unpause the run.
fn handle_pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    current_state: Res<State<PlayState>>,
    mut next_state: ResMut<NextState<PlayState>>,
) {
    if keyboard.any_just_pressed([KeyCode::KeyP, KeyCode::Escape]) {
        match current_state.get() {
            PlayState::Running => next_state.set(PlayState::Paused),
            PlayState::Paused => next_state.set(PlayState::Running),
        }
    }
}
