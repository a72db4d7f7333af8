//! Enemy spawning.

use bevy::prelude::*;
use rand::Rng;

use super::ai::random_direction;
use super::components::{Enemy, Wander};
use crate::combat::Health;
use crate::core::tuning::EnemyTuning;
use crate::core::Tuning;

/// Shared mesh and material for enemies.
#[derive(Resource)]
pub struct EnemyAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Create enemy render assets once at startup.
pub fn setup_enemy_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(EnemyAssets {
        mesh: meshes.add(Sphere::new(0.5).mesh().uv(24, 12)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.85, 0.15, 0.15),
            perceptual_roughness: 0.6,
            ..default()
        }),
    });
}

/// Random point on the spawn square at enemy height.
pub fn random_spawn_position(rng: &mut impl Rng, tuning: &EnemyTuning) -> Vec3 {
    let extent = tuning.spawn_extent.max(0.0);
    if extent == 0.0 {
        return Vec3::new(0.0, tuning.base_height, 0.0);
    }
    Vec3::new(
        rng.gen_range(-extent..=extent),
        tuning.base_height,
        rng.gen_range(-extent..=extent),
    )
}

/// Fresh wander state with a random heading and interval.
pub fn random_wander(rng: &mut impl Rng, tuning: &EnemyTuning) -> Wander {
    let min = tuning.wander_interval_min.max(1);
    let interval = if tuning.wander_interval_max > min {
        rng.gen_range(min..tuning.wander_interval_max)
    } else {
        min
    };
    Wander {
        direction: random_direction(rng),
        timer: 0,
        interval,
    }
}

/// Spawn one enemy. Render assets are optional so tests can run headless.
pub fn spawn_enemy(
    commands: &mut Commands,
    assets: Option<&EnemyAssets>,
    position: Vec3,
    wander: Wander,
    tuning: &EnemyTuning,
) -> Entity {
    let mut entity = commands.spawn((
        Name::new("Enemy"),
        Enemy {
            wander,
            ..default()
        },
        Health::new(tuning.max_health),
        Transform::from_translation(position),
        Visibility::default(),
    ));
    if let Some(assets) = assets {
        entity.insert((
            Mesh3d(assets.mesh.clone()),
            MeshMaterial3d(assets.material.clone()),
        ));
    }
    debug!("Spawned enemy at {:?}", position);
    entity.id()
}

/// Fill the enemy pool for a new run.
pub fn spawn_initial_enemies(
    mut commands: Commands,
    tuning: Res<Tuning>,
    assets: Option<Res<EnemyAssets>>,
) {
    let tuning = &tuning.enemies;
    let mut rng = rand::thread_rng();

    for _ in 0..tuning.pool_size {
        let position = random_spawn_position(&mut rng, tuning);
        let wander = random_wander(&mut rng, tuning);
        spawn_enemy(&mut commands, assets.as_deref(), position, wander, tuning);
    }
    info!("Spawned {} enemies", tuning.pool_size);
}
