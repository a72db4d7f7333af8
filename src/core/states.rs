//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. For example,
//! the fixed-step simulation only runs while `PlayState::Running` is active,
//! while menu systems only run in the MainMenu state.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` while tuning and level data are read
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when the player starts (or restarts) a run
/// - `GameOver` when player health reaches zero
/// - `Victory` when the player reaches the finish gate
///
/// `GameOver` and `Victory` leave the world visible behind an overlay; the
/// simulation no longer steps until the run is restarted.
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading data files
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Active run (running or paused)
    InGame,
    /// Player has died
    GameOver,
    /// Player reached the finish gate
    Victory,
}

/// Sub-states for a run - only active when GameState::InGame.
///
/// Pausing keeps rendering going but skips the fixed logic step entirely.
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(GameState = GameState::InGame)]
pub enum PlayState {
    /// Simulation steps every fixed tick
    #[default]
    Running,
    /// Simulation frozen, pause menu visible
    Paused,
}

/// Despawn every entity carrying `T`.
///
/// Registered by each plugin for its own markers in `LevelSet::Reset` and on
/// returning to the main menu, so a run never leaks into the next one.
pub fn despawn_all<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
