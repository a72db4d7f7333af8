//! Objects plugin - collectibles, targets, fragments and moving platforms.

use bevy::prelude::*;

use super::components::*;
use super::systems::*;
use crate::core::{despawn_all, GameState, LevelSet, StepSet};

/// Objects plugin - pooled props the player interacts with.
pub struct ObjectsPlugin;

impl Plugin for ObjectsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ScoreBoard>()
            .init_resource::<ObjectState>()
            .add_systems(Startup, setup_object_assets)
            .add_systems(
                OnEnter(GameState::InGame),
                (
                    despawn_all::<Collectible>,
                    despawn_all::<Target>,
                    despawn_all::<Fragment>,
                    despawn_all::<MovingPlatform>,
                    reset_objects,
                )
                    .in_set(LevelSet::Reset),
            )
            .add_systems(
                OnEnter(GameState::InGame),
                spawn_object_pools.in_set(LevelSet::Populate),
            )
            .add_systems(
                OnEnter(GameState::MainMenu),
                (
                    despawn_all::<Collectible>,
                    despawn_all::<Target>,
                    despawn_all::<Fragment>,
                    despawn_all::<MovingPlatform>,
                ),
            )
            .add_systems(FixedUpdate, check_object_collisions.in_set(StepSet::Collision))
            .add_systems(FixedUpdate, update_objects.in_set(StepSet::Objects));
    }
}
