//! Object pool systems: spawning, pickups, targets and fragments.

use bevy::prelude::*;
use rand::Rng;
use std::collections::HashSet;

use super::collision::resolve_support;
use super::components::*;
use crate::combat::{Loadout, Projectile};
use crate::core::tuning::ObjectTuning;
use crate::core::{ExperienceEvent, ExperienceSource, SimClock, Tuning};
use crate::player::{Player, PlayerBody};
use crate::world::{Platform, PlatformMotion};

/// Attempts at finding a target position away from the player.
const TARGET_PLACEMENT_ATTEMPTS: usize = 32;

/// Shared meshes and materials for pooled objects.
#[derive(Resource)]
pub struct ObjectAssets {
    pub collectible_mesh: Handle<Mesh>,
    pub collectible_material: Handle<StandardMaterial>,
    pub target_mesh: Handle<Mesh>,
    pub target_material: Handle<StandardMaterial>,
    pub fragment_mesh: Handle<Mesh>,
    pub platform_mesh: Handle<Mesh>,
    pub platform_material: Handle<StandardMaterial>,
}

/// Create object render assets once at startup.
pub fn setup_object_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let target_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.8, 0.2, 0.2),
        emissive: LinearRgba::new(0.4, 0.1, 0.1, 1.0),
        ..default()
    });

    commands.insert_resource(ObjectAssets {
        // Low-poly gem
        collectible_mesh: meshes.add(Sphere::new(0.25).mesh().uv(8, 4)),
        collectible_material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.8, 0.0),
            emissive: LinearRgba::new(0.5, 0.4, 0.0, 1.0),
            ..default()
        }),
        target_mesh: meshes.add(Cuboid::new(2.0, 2.0, 0.5)),
        // Fragments share the target's look
        fragment_mesh: meshes.add(Cuboid::new(0.5, 0.5, 0.5)),
        target_material,
        platform_mesh: meshes.add(Cuboid::new(3.0, 0.5, 3.0)),
        platform_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.2, 0.6, 1.0),
            emissive: LinearRgba::new(0.1, 0.3, 0.5, 1.0),
            ..default()
        }),
    });
}

fn random_point(rng: &mut impl Rng, extent: f32, y_range: std::ops::Range<f32>) -> Vec3 {
    let extent = extent.max(0.01);
    Vec3::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(y_range),
        rng.gen_range(-extent..extent),
    )
}

/// Random pickup/target position in the play area.
pub fn random_object_position(rng: &mut impl Rng, tuning: &ObjectTuning) -> Vec3 {
    random_point(rng, tuning.spawn_extent, 2.0..12.0)
}

/// Random target position at least `min_target_distance` from `avoid`.
///
/// Gives up after a bounded number of attempts and keeps the last candidate.
pub fn random_target_position(rng: &mut impl Rng, tuning: &ObjectTuning, avoid: Option<Vec3>) -> Vec3 {
    let mut candidate = random_object_position(rng, tuning);
    let Some(avoid) = avoid else {
        return candidate;
    };
    for _ in 1..TARGET_PLACEMENT_ATTEMPTS {
        if candidate.distance(avoid) >= tuning.min_target_distance {
            break;
        }
        candidate = random_object_position(rng, tuning);
    }
    candidate
}

pub fn spawn_collectible(commands: &mut Commands, assets: Option<&ObjectAssets>, position: Vec3) -> Entity {
    let mut entity = commands.spawn((
        Name::new("Collectible"),
        Collectible,
        Transform::from_translation(position),
        Visibility::default(),
    ));
    if let Some(assets) = assets {
        entity.insert((
            Mesh3d(assets.collectible_mesh.clone()),
            MeshMaterial3d(assets.collectible_material.clone()),
        ));
    }
    entity.id()
}

pub fn spawn_target(commands: &mut Commands, assets: Option<&ObjectAssets>, position: Vec3) -> Entity {
    let mut entity = commands.spawn((
        Name::new("Target"),
        Target,
        Transform::from_translation(position),
        Visibility::default(),
    ));
    if let Some(assets) = assets {
        entity.insert((
            Mesh3d(assets.target_mesh.clone()),
            MeshMaterial3d(assets.target_material.clone()),
        ));
    }
    entity.id()
}

/// Spawn a pool platform that rises and falls around `position`.
pub fn spawn_moving_platform(
    commands: &mut Commands,
    assets: Option<&ObjectAssets>,
    position: Vec3,
    tuning: &ObjectTuning,
) -> Entity {
    let mut entity = commands.spawn((
        Name::new("Moving Platform"),
        MovingPlatform,
        Platform::new(Vec3::new(3.0, 0.5, 3.0)),
        PlatformMotion::Ramp {
            base_y: position.y,
            rise: tuning.moving_platform_rise,
            period: tuning.moving_platform_period,
            tick: 0,
        },
        Transform::from_translation(position),
        Visibility::default(),
    ));
    if let Some(assets) = assets {
        entity.insert((
            Mesh3d(assets.platform_mesh.clone()),
            MeshMaterial3d(assets.platform_material.clone()),
        ));
    }
    entity.id()
}

/// Throw out fragments at `position`, evicting the oldest when the pool is full.
fn spawn_fragments(
    commands: &mut Commands,
    assets: Option<&ObjectAssets>,
    state: &mut ObjectState,
    position: Vec3,
    tuning: &ObjectTuning,
    rng: &mut impl Rng,
) {
    if tuning.max_fragments == 0 {
        return;
    }

    for _ in 0..tuning.fragments_per_target {
        while state.fragments.len() >= tuning.max_fragments {
            let Some(oldest) = state.fragments.pop_front() else {
                break;
            };
            if let Some(mut entity) = commands.get_entity(oldest) {
                entity.despawn();
            }
        }

        let fragment = Fragment {
            velocity: Vec3::new(
                rng.gen_range(-0.1..0.1),
                rng.gen_range(0.1..0.4),
                rng.gen_range(-0.1..0.1),
            ),
            spin: Vec3::new(
                rng.gen_range(-0.05..0.05),
                rng.gen_range(-0.05..0.05),
                rng.gen_range(-0.05..0.05),
            ),
            lifetime: tuning.fragment_lifetime,
        };
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
            rng.gen_range(0.0..std::f32::consts::TAU),
        );

        let mut entity = commands.spawn((
            Name::new("Fragment"),
            fragment,
            Transform::from_translation(position).with_rotation(rotation),
            Visibility::default(),
        ));
        if let Some(assets) = assets {
            entity.insert((
                Mesh3d(assets.fragment_mesh.clone()),
                MeshMaterial3d(assets.target_material.clone()),
            ));
        }
        state.fragments.push_back(entity.id());
    }
}

/// Break a target: score, experience and debris.
#[allow(clippy::too_many_arguments)]
fn destroy_target(
    commands: &mut Commands,
    assets: Option<&ObjectAssets>,
    state: &mut ObjectState,
    score: &mut ScoreBoard,
    experience: &mut EventWriter<ExperienceEvent>,
    target: Entity,
    position: Vec3,
    tuning: &ObjectTuning,
    rng: &mut impl Rng,
) {
    commands.entity(target).despawn_recursive();
    score.score += tuning.target_score;
    experience.send(ExperienceEvent {
        amount: tuning.target_experience,
        source: ExperienceSource::Target,
    });
    spawn_fragments(commands, assets, state, position, tuning, rng);
}

/// Fill the object pools for a new run.
pub fn spawn_object_pools(
    mut commands: Commands,
    tuning: Res<Tuning>,
    assets: Option<Res<ObjectAssets>>,
    player_query: Query<&Transform, With<Player>>,
) {
    let tuning = &tuning.objects;
    let assets = assets.as_deref();
    let mut rng = rand::thread_rng();
    let player_pos = player_query.get_single().ok().map(|t| t.translation);

    for _ in 0..tuning.max_collectibles {
        let position = random_object_position(&mut rng, tuning);
        spawn_collectible(&mut commands, assets, position);
    }

    for i in 0..tuning.max_platforms {
        let extent = tuning.spawn_extent.max(0.01);
        let position = Vec3::new(
            rng.gen_range(-extent..extent),
            2.0 + i as f32 * 2.0,
            rng.gen_range(-extent..extent),
        );
        spawn_moving_platform(&mut commands, assets, position, tuning);
    }

    for _ in 0..tuning.max_targets {
        let position = random_target_position(&mut rng, tuning, player_pos);
        spawn_target(&mut commands, assets, position);
    }

    info!(
        "Spawned {} collectibles, {} moving platforms, {} targets",
        tuning.max_collectibles, tuning.max_platforms, tuning.max_targets
    );
}

/// Fresh score and pool bookkeeping for a new run.
pub fn reset_objects(mut commands: Commands, tuning: Res<Tuning>) {
    commands.insert_resource(ScoreBoard::default());
    commands.insert_resource(ObjectState::new(
        tuning.objects.update_interval_ms,
        tuning.objects.cleanup_interval_ms,
    ));
}

/// Player pickups, touched targets and platform support.
#[allow(clippy::too_many_arguments)]
pub fn check_object_collisions(
    mut commands: Commands,
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    assets: Option<Res<ObjectAssets>>,
    mut state: ResMut<ObjectState>,
    mut score: ResMut<ScoreBoard>,
    mut experience: EventWriter<ExperienceEvent>,
    mut player_query: Query<(&mut Transform, &mut PlayerBody, Option<&mut Loadout>), With<Player>>,
    collectible_query: Query<(Entity, &Transform), (With<Collectible>, Without<Player>)>,
    target_query: Query<(Entity, &Transform), (With<Target>, Without<Player>)>,
    platform_query: Query<(Entity, &Transform, &Platform), Without<Player>>,
    mut warned: Local<HashSet<Entity>>,
) {
    if !state.collision_limiter.ready(clock.elapsed_ms) {
        return;
    }
    let Ok((mut transform, mut body, mut loadout)) = player_query.get_single_mut() else {
        return;
    };
    let objects = &tuning.objects;
    let assets = assets.as_deref();
    let mut rng = rand::thread_rng();
    let player_pos = transform.translation;

    for (entity, collectible) in collectible_query.iter() {
        if player_pos.distance(collectible.translation) >= objects.pickup_radius {
            continue;
        }
        commands.entity(entity).despawn_recursive();
        score.score += objects.collectible_score;
        experience.send(ExperienceEvent {
            amount: objects.collectible_experience,
            source: ExperienceSource::Collectible,
        });
        if let Some(loadout) = loadout.as_mut() {
            let added = loadout.restock(objects.arrows_per_pickup);
            debug!("Picked up {} arrows ({} total)", added, loadout.arrows);
        }
    }

    for (entity, target) in target_query.iter() {
        if player_pos.distance(target.translation) >= objects.target_touch_radius {
            continue;
        }
        destroy_target(
            &mut commands,
            assets,
            &mut state,
            &mut score,
            &mut experience,
            entity,
            target.translation,
            objects,
            &mut rng,
        );
    }

    let bounds = platform_query.iter().filter_map(|(entity, platform_transform, platform)| {
        let bounds = platform.bounds(platform_transform.translation);
        if bounds.is_none() && warned.insert(entity) {
            warn!("Platform {:?} has no extents and cannot be stood on", entity);
        }
        bounds
    });
    let support = resolve_support(
        player_pos,
        body.velocity.y,
        bounds,
        objects.ground_height,
        tuning.player.half_height,
        objects.platform_tolerance,
    );

    if let Some(y) = support {
        transform.translation.y = y;
    }
    body.set_on_platform(support.is_some());
}

/// Fragments, projectile hits on targets, pool refills and the periodic sweep.
#[allow(clippy::too_many_arguments)]
pub fn update_objects(
    mut commands: Commands,
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    assets: Option<Res<ObjectAssets>>,
    mut state: ResMut<ObjectState>,
    mut score: ResMut<ScoreBoard>,
    mut experience: EventWriter<ExperienceEvent>,
    mut fragment_query: Query<(Entity, &mut Transform, &mut Fragment)>,
    mut collectible_query: Query<(Entity, &mut Transform), (With<Collectible>, Without<Fragment>)>,
    target_query: Query<(Entity, &Transform), (With<Target>, Without<Fragment>, Without<Collectible>)>,
    projectile_query: Query<
        (Entity, &Transform, &Projectile),
        (Without<Target>, Without<Fragment>, Without<Collectible>),
    >,
    player_query: Query<
        &Transform,
        (With<Player>, Without<Target>, Without<Fragment>, Without<Collectible>, Without<Projectile>),
    >,
) {
    let now = clock.elapsed_ms;
    if !state.update_limiter.ready(now) {
        return;
    }
    let objects = &tuning.objects;
    let assets = assets.as_deref();
    let mut rng = rand::thread_rng();

    // Fragments
    for (entity, mut transform, mut fragment) in fragment_query.iter_mut() {
        if !fragment.step(&mut transform, objects.fragment_gravity) {
            commands.entity(entity).despawn_recursive();
            state.fragments.retain(|&e| e != entity);
        }
    }

    // One turn per second
    let spin = std::f32::consts::TAU / 60.0;
    for (_, mut transform) in collectible_query.iter_mut() {
        transform.rotate_y(spin);
    }

    // Projectiles against targets, first match wins
    let mut destroyed = HashSet::new();
    for (projectile_entity, projectile_transform, _) in projectile_query.iter() {
        for (target_entity, target_transform) in target_query.iter() {
            if destroyed.contains(&target_entity) {
                continue;
            }
            if projectile_transform
                .translation
                .distance(target_transform.translation)
                < objects.target_hit_radius
            {
                destroy_target(
                    &mut commands,
                    assets,
                    &mut state,
                    &mut score,
                    &mut experience,
                    target_entity,
                    target_transform.translation,
                    objects,
                    &mut rng,
                );
                commands.entity(projectile_entity).despawn_recursive();
                destroyed.insert(target_entity);
                break;
            }
        }
    }

    // Refill empty pools
    let player_pos = player_query.get_single().ok().map(|t| t.translation);
    if target_query.iter().count() <= destroyed.len() {
        for _ in 0..objects.max_targets {
            let position = random_target_position(&mut rng, objects, player_pos);
            spawn_target(&mut commands, assets, position);
        }
        debug!("Target pool refilled");
    }
    if collectible_query.is_empty() {
        for _ in 0..objects.max_collectibles {
            let position = random_object_position(&mut rng, objects);
            spawn_collectible(&mut commands, assets, position);
        }
        debug!("Collectible pool refilled");
    }

    // Drop bookkeeping for fragments that no longer exist
    if state.cleanup_limiter.ready(now) {
        let before = state.fragments.len();
        state.fragments.retain(|&e| fragment_query.contains(e));
        let pruned = before - state.fragments.len();
        if pruned > 0 {
            debug!("Pruned {} stale fragments", pruned);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::progression::reset_progression;
    use crate::core::PlayerStats;
    use bevy::ecs::system::RunSystemOnce;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn object_world() -> World {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        world.insert_resource(SimClock::default());
        world.insert_resource(ScoreBoard::default());
        world.insert_resource(ObjectState::default());
        world.init_resource::<Events<ExperienceEvent>>();
        world
    }

    fn spawn_player_at(world: &mut World, position: Vec3) -> Entity {
        world
            .spawn((
                Player,
                PlayerBody::default(),
                Loadout {
                    arrows: 10,
                    ..default()
                },
                Transform::from_translation(position),
            ))
            .id()
    }

    fn step(world: &mut World, system: fn(&mut World)) {
        world.resource_mut::<SimClock>().advance();
        system(world);
    }

    fn run_collisions(world: &mut World) {
        world.run_system_once(check_object_collisions).unwrap();
    }

    fn run_updates(world: &mut World) {
        world.run_system_once(update_objects).unwrap();
    }

    fn experience(world: &World) -> Vec<u32> {
        world
            .resource::<Events<ExperienceEvent>>()
            .iter_current_update_events()
            .map(|e| e.amount)
            .collect()
    }

    #[test]
    fn collectible_pickup_grants_score_experience_and_arrows() {
        let mut world = object_world();
        let player = spawn_player_at(&mut world, Vec3::new(0.0, 5.0, 0.0));
        let pickup = world.spawn((Collectible, Transform::from_xyz(0.5, 5.0, 0.5))).id();
        world.spawn((Collectible, Transform::from_xyz(10.0, 5.0, 0.0)));

        step(&mut world, run_collisions);

        assert!(world.get::<Collectible>(pickup).is_none());
        assert_eq!(world.resource::<ScoreBoard>().score, 10);
        assert_eq!(experience(&world), vec![10]);
        assert_eq!(world.get::<Loadout>(player).unwrap().arrows, 15);
    }

    #[test]
    fn low_player_is_caught_by_ground() {
        let mut world = object_world();
        let player = spawn_player_at(&mut world, Vec3::new(0.0, 0.2, 0.0));
        step(&mut world, run_collisions);

        assert_eq!(world.get::<Transform>(player).unwrap().translation.y, 0.5);
        assert!(world.get::<PlayerBody>(player).unwrap().is_on_platform);
    }

    #[test]
    fn player_lands_on_platform_and_sizeless_platforms_are_ignored() {
        let mut world = object_world();
        let player = spawn_player_at(&mut world, Vec3::new(0.0, 4.05, 0.0));
        world.spawn((Platform::default(), Transform::from_xyz(0.0, 3.0, 0.0)));
        world.spawn((
            Platform::new(Vec3::new(4.0, 1.0, 4.0)),
            Transform::from_xyz(0.0, 3.0, 0.0),
        ));

        step(&mut world, run_collisions);

        assert_eq!(world.get::<Transform>(player).unwrap().translation.y, 4.0);
        assert!(world.get::<PlayerBody>(player).unwrap().is_on_platform);
    }

    #[test]
    fn arrow_breaks_target_and_throws_fragments() {
        let mut world = object_world();
        spawn_player_at(&mut world, Vec3::new(30.0, 1.0, 30.0));
        let target = world.spawn((Target, Transform::from_xyz(0.0, 5.0, 0.0))).id();
        world.spawn((Target, Transform::from_xyz(15.0, 5.0, 0.0)));
        let arrow = world
            .spawn((
                Projectile::new(Vec3::Z, 25.0, 0.0, 120),
                Transform::from_xyz(0.0, 5.0, 1.0),
            ))
            .id();

        step(&mut world, run_updates);

        assert!(world.get::<Target>(target).is_none());
        assert!(world.get::<Projectile>(arrow).is_none());
        assert_eq!(world.resource::<ScoreBoard>().score, 20);
        assert_eq!(experience(&world), vec![30]);
        assert_eq!(world.resource::<ObjectState>().fragments.len(), 2);
    }

    #[test]
    fn fragment_pool_evicts_oldest() {
        let mut world = object_world();
        spawn_player_at(&mut world, Vec3::new(30.0, 1.0, 30.0));
        for i in 0..3 {
            world.spawn((Target, Transform::from_xyz(i as f32 * 10.0, 5.0, 0.0)));
        }

        let mut first_fragments = Vec::new();
        for i in 0..3 {
            world.spawn((
                Projectile::new(Vec3::Z, 25.0, 0.0, 120),
                Transform::from_xyz(i as f32 * 10.0, 5.0, 0.5),
            ));
            step(&mut world, run_updates);
            if i == 0 {
                first_fragments = world.resource::<ObjectState>().fragments.iter().copied().collect();
            }
        }

        let state = world.resource::<ObjectState>();
        assert_eq!(state.fragments.len(), 4);
        let live = world.query::<&Fragment>().iter(&world).count();
        assert_eq!(live, 4);
        for old in first_fragments {
            assert!(world.get::<Fragment>(old).is_none());
        }
    }

    #[test]
    fn empty_target_pool_is_refilled() {
        let mut world = object_world();
        spawn_player_at(&mut world, Vec3::new(0.0, 1.0, 0.0));
        world.spawn((Collectible, Transform::from_xyz(10.0, 5.0, 0.0)));
        step(&mut world, run_updates);

        let targets: Vec<Vec3> = world
            .query_filtered::<&Transform, With<Target>>()
            .iter(&world)
            .map(|t| t.translation)
            .collect();
        assert_eq!(targets.len(), 3);
    }

    #[test]
    fn restart_clears_score_clock_and_stats() {
        let mut world = object_world();
        world.insert_resource(PlayerStats::default());
        world.resource_mut::<ScoreBoard>().score = 90;
        world.resource_mut::<PlayerStats>().take_damage(40.0);
        world.resource_mut::<ObjectState>().fragments.push_back(Entity::PLACEHOLDER);
        for _ in 0..30 {
            world.resource_mut::<SimClock>().advance();
        }

        world.run_system_once(reset_progression).unwrap();
        world.run_system_once(reset_objects).unwrap();

        assert_eq!(world.resource::<ScoreBoard>().score, 0);
        assert_eq!(*world.resource::<SimClock>(), SimClock::default());
        assert_eq!(world.resource::<PlayerStats>().health, 100.0);
        assert!(world.resource::<ObjectState>().fragments.is_empty());
    }

    #[test]
    fn targets_avoid_player() {
        let tuning = ObjectTuning::default();
        let mut rng = StdRng::seed_from_u64(5);
        let player = Vec3::new(0.0, 5.0, 0.0);
        for _ in 0..50 {
            let p = random_target_position(&mut rng, &tuning, Some(player));
            assert!(p.distance(player) >= tuning.min_target_distance);
            assert!(p.x.abs() <= 20.0 && p.z.abs() <= 20.0);
            assert!((2.0..12.0).contains(&p.y));
        }
    }
}
