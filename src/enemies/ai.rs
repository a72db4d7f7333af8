//! Enemy AI: steering, contact damage, projectile hits and defeats.

use bevy::prelude::*;
use rand::Rng;

use super::components::{Behavior, Enemy};
use super::spawning::{random_spawn_position, random_wander, spawn_enemy, EnemyAssets};
use crate::combat::{Health, Projectile};
use crate::core::tuning::EnemyTuning;
use crate::core::{ExperienceEvent, ExperienceSource, PlayerHitEvent, SimClock, Tuning};
use crate::player::Player;

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Random horizontal unit vector.
pub fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(angle.cos(), 0.0, angle.sin())
}

/// Chase when the player is within detection range on the ground plane.
pub fn choose_behavior(enemy_pos: Vec3, player_pos: Vec3, detection_range: f32) -> Behavior {
    if horizontal(player_pos - enemy_pos).length() < detection_range {
        Behavior::Chasing
    } else {
        Behavior::Wandering
    }
}

/// Displacement for one step of the given behaviour.
pub fn steer(
    enemy: &mut Enemy,
    behavior: Behavior,
    enemy_pos: Vec3,
    player_pos: Vec3,
    tuning: &EnemyTuning,
    rng: &mut impl Rng,
) -> Vec3 {
    match behavior {
        Behavior::Chasing => {
            horizontal(player_pos - enemy_pos).normalize_or_zero() * tuning.chase_speed
        }
        Behavior::Wandering => {
            let wander = &mut enemy.wander;
            wander.timer += 1;
            if wander.timer >= wander.interval {
                *wander = random_wander(rng, tuning);
            }

            // Turn back toward the centre once out of bounds
            if enemy_pos.x.abs() > tuning.bounds || enemy_pos.z.abs() > tuning.bounds {
                let home = horizontal(-enemy_pos).normalize_or_zero();
                if home != Vec3::ZERO {
                    wander.direction = home;
                }
            }

            wander.direction * tuning.wander_speed
        }
    }
}

/// Idle bob height after `age` steps.
pub fn bob_height(age: u32, tuning: &EnemyTuning) -> f32 {
    tuning.base_height + (age as f32 * tuning.bob_rate).sin() * tuning.bob_amplitude
}

/// Contact normal (enemy toward player) if this enemy may hurt the player now.
pub fn contact_check(
    enemy_pos: Vec3,
    player_pos: Vec3,
    last_contact_ms: Option<f64>,
    now_ms: f64,
    tuning: &EnemyTuning,
) -> Option<Vec3> {
    let offset = player_pos - enemy_pos;
    if offset.length() >= tuning.enemy_radius + tuning.player_radius {
        return None;
    }
    if let Some(last) = last_contact_ms {
        if now_ms - last < tuning.damage_cooldown_ms {
            return None;
        }
    }
    Some(horizontal(offset).normalize_or(Vec3::Z))
}

/// Move every living enemy and apply contact damage.
pub fn enemy_ai(
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    mut player_query: Query<&mut Transform, With<Player>>,
    mut enemy_query: Query<(Entity, &mut Transform, &mut Enemy, &Health), Without<Player>>,
    mut hits: EventWriter<PlayerHitEvent>,
) {
    let Ok(mut player_transform) = player_query.get_single_mut() else {
        return;
    };
    let tuning = &tuning.enemies;
    let now = clock.elapsed_ms;
    let mut rng = rand::thread_rng();

    for (entity, mut transform, mut enemy, health) in enemy_query.iter_mut() {
        if health.is_dead() {
            continue;
        }

        let enemy_pos = transform.translation;
        let player_pos = player_transform.translation;

        // Contact uses positions from before this step's movement
        let contact = contact_check(enemy_pos, player_pos, enemy.last_contact_ms, now, tuning);

        let behavior = choose_behavior(enemy_pos, player_pos, tuning.detection_range);
        let displacement = steer(&mut enemy, behavior, enemy_pos, player_pos, tuning, &mut rng);
        transform.translation += displacement;
        if displacement.length_squared() > 1e-8 {
            transform.rotation = Quat::from_rotation_y(displacement.x.atan2(displacement.z));
        }

        enemy.age += 1;
        transform.translation.y = bob_height(enemy.age, tuning);

        if let Some(normal) = contact {
            enemy.last_contact_ms = Some(now);
            hits.send(PlayerHitEvent {
                source: entity,
                amount: tuning.contact_damage,
            });
            player_transform.translation += normal * tuning.knockback;
            transform.translation -= normal * tuning.knockback * 0.5;
        }
    }
}

/// Apply projectile damage to the first living enemy each projectile touches.
pub fn projectile_hits(
    mut commands: Commands,
    tuning: Res<Tuning>,
    projectile_query: Query<(Entity, &Transform, &Projectile)>,
    mut enemy_query: Query<(&Transform, &mut Health), (With<Enemy>, Without<Projectile>)>,
) {
    let hit_radius = tuning.enemies.hit_radius;

    for (projectile_entity, projectile_transform, projectile) in projectile_query.iter() {
        for (enemy_transform, mut health) in enemy_query.iter_mut() {
            if health.is_dead() {
                continue;
            }
            if projectile_transform
                .translation
                .distance(enemy_transform.translation)
                < hit_radius
            {
                health.take_damage(projectile.damage);
                commands.entity(projectile_entity).despawn_recursive();
                break;
            }
        }
    }
}

/// Remove defeated enemies, reward the player and keep the pool full.
pub fn handle_enemy_defeats(
    mut commands: Commands,
    tuning: Res<Tuning>,
    assets: Option<Res<EnemyAssets>>,
    enemy_query: Query<(Entity, &Health), With<Enemy>>,
    mut experience: EventWriter<ExperienceEvent>,
) {
    let tuning = &tuning.enemies;
    let mut rng = rand::thread_rng();

    for (entity, health) in enemy_query.iter() {
        if !health.is_dead() {
            continue;
        }

        info!("Enemy {:?} defeated", entity);
        commands.entity(entity).despawn_recursive();
        experience.send(ExperienceEvent {
            amount: tuning.kill_experience,
            source: ExperienceSource::Enemy,
        });

        let position = random_spawn_position(&mut rng, tuning);
        let wander = random_wander(&mut rng, tuning);
        spawn_enemy(&mut commands, assets.as_deref(), position, wander, tuning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::Wander;
    use bevy::ecs::system::RunSystemOnce;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn detection_range_picks_behavior() {
        let enemy = Vec3::new(0.0, 1.0, 0.0);
        assert_eq!(
            choose_behavior(enemy, Vec3::new(10.0, 1.0, 0.0), 15.0),
            Behavior::Chasing
        );
        assert_eq!(
            choose_behavior(enemy, Vec3::new(15.0, 1.0, 0.0), 15.0),
            Behavior::Wandering
        );
    }

    #[test]
    fn chase_moves_toward_player_at_chase_speed() {
        let tuning = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut enemy = Enemy::default();
        let enemy_pos = Vec3::new(0.0, 1.0, 0.0);
        let player_pos = Vec3::new(6.0, 1.0, 8.0);

        let behavior = choose_behavior(enemy_pos, player_pos, tuning.detection_range);
        let step = steer(&mut enemy, behavior, enemy_pos, player_pos, &tuning, &mut rng);

        assert!((step.length() - 0.08).abs() < 1e-6);
        let expected = (player_pos - enemy_pos).normalize();
        assert!(step.normalize().dot(expected) > 0.9999);
    }

    #[test]
    fn wander_changes_direction_on_interval() {
        let tuning = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut enemy = Enemy {
            wander: Wander {
                direction: Vec3::X,
                timer: 0,
                interval: 2,
            },
            ..default()
        };
        let far = Vec3::new(100.0, 1.0, 0.0);
        let origin = Vec3::new(0.0, 1.0, 0.0);

        let first = steer(&mut enemy, Behavior::Wandering, origin, far, &tuning, &mut rng);
        assert_eq!(first, Vec3::X * 0.05);
        steer(&mut enemy, Behavior::Wandering, origin, far, &tuning, &mut rng);
        assert_eq!(enemy.wander.timer, 0);
        assert!((tuning.wander_interval_min..tuning.wander_interval_max)
            .contains(&enemy.wander.interval));
        assert!((enemy.wander.direction.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn out_of_bounds_wanderer_turns_home() {
        let tuning = EnemyTuning::default();
        let mut rng = StdRng::seed_from_u64(11);
        let mut enemy = Enemy::default();
        let pos = Vec3::new(45.0, 1.0, 0.0);
        let step = steer(
            &mut enemy,
            Behavior::Wandering,
            pos,
            Vec3::new(200.0, 1.0, 0.0),
            &tuning,
            &mut rng,
        );
        assert!(step.x < 0.0);
    }

    #[test]
    fn contact_respects_cooldown() {
        let tuning = EnemyTuning::default();
        let enemy = Vec3::new(0.0, 1.0, 0.0);
        let player = Vec3::new(0.0, 1.0, 0.6);
        let normal = contact_check(enemy, player, None, 0.0, &tuning).unwrap();
        assert!(normal.distance(Vec3::Z) < 1e-5);
        assert!(contact_check(enemy, player, Some(0.0), 999.0, &tuning).is_none());
        assert!(contact_check(enemy, player, Some(0.0), 1000.0, &tuning).is_some());
        assert!(contact_check(enemy, Vec3::new(0.0, 1.0, 1.0), None, 0.0, &tuning).is_none());
    }

    fn enemy_world() -> World {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        world.insert_resource(SimClock::default());
        world.init_resource::<Events<PlayerHitEvent>>();
        world.init_resource::<Events<ExperienceEvent>>();
        world
    }

    #[test]
    fn four_arrows_defeat_enemy_and_grant_experience() {
        let mut world = enemy_world();
        let enemy = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, 0.0)))
            .id();

        for shot in 1..=4 {
            let arrow = world
                .spawn((
                    Projectile::new(Vec3::Z, 25.0, 0.0, 120),
                    Transform::from_xyz(0.0, 1.0, 0.5),
                ))
                .id();
            world.run_system_once(projectile_hits).unwrap();
            world.run_system_once(handle_enemy_defeats).unwrap();
            assert!(world.get::<Projectile>(arrow).is_none());

            if shot < 4 {
                assert_eq!(
                    world.get::<Health>(enemy).unwrap().current,
                    100.0 - 25.0 * shot as f32
                );
            }
        }

        assert!(world.get::<Enemy>(enemy).is_none());
        let events = world.resource::<Events<ExperienceEvent>>();
        let granted: Vec<u32> = events.iter_current_update_events().map(|e| e.amount).collect();
        assert_eq!(granted, vec![50]);

        // The pool is replenished
        let remaining = world.query::<&Enemy>().iter(&world).count();
        assert_eq!(remaining, 1);
    }

    #[test]
    fn projectile_hits_only_first_enemy() {
        let mut world = enemy_world();
        let a = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, 0.0)))
            .id();
        let b = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, 0.2)))
            .id();
        world.spawn((
            Projectile::new(Vec3::Z, 25.0, 0.0, 120),
            Transform::from_xyz(0.0, 1.0, 0.1),
        ));
        world.run_system_once(projectile_hits).unwrap();

        let damaged = [a, b]
            .iter()
            .filter(|&&e| world.get::<Health>(e).unwrap().current < 100.0)
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn contact_damage_waits_for_cooldown() {
        let mut world = enemy_world();
        let player = world.spawn((Player, Transform::from_xyz(0.0, 1.0, 0.5))).id();
        let enemy = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, 0.0)))
            .id();

        for now in [0.0, 500.0, 999.0, 1000.0] {
            world.resource_mut::<SimClock>().elapsed_ms = now;
            // Put both back in contact before every step
            world.get_mut::<Transform>(player).unwrap().translation = Vec3::new(0.0, 1.0, 0.5);
            world.get_mut::<Transform>(enemy).unwrap().translation = Vec3::new(0.0, 1.0, 0.0);
            world.run_system_once(enemy_ai).unwrap();
        }

        let events = world.resource::<Events<PlayerHitEvent>>();
        let hits: Vec<f32> = events.iter_current_update_events().map(|e| e.amount).collect();
        assert_eq!(hits, vec![10.0, 10.0]);
        assert!(world.get::<Transform>(player).unwrap().translation.z > 0.5);
    }
}
