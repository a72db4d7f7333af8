//! Combat systems - weapon switching, sword swings, bow charge and projectiles.

use bevy::prelude::*;

use super::components::*;
use super::weapons::{bow_shot, charge_ratio, in_sword_arc};
use crate::core::{SimClock, Tuning};
use crate::enemies::Enemy;
use crate::player::{Player, PlayerBody, PlayerInput, WeaponSwitch};

/// Shared mesh and material for arrows.
#[derive(Resource)]
pub struct CombatAssets {
    pub arrow_mesh: Handle<Mesh>,
    pub arrow_material: Handle<StandardMaterial>,
}

/// Create arrow render assets once at startup.
pub fn setup_combat_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.insert_resource(CombatAssets {
        arrow_mesh: meshes.add(Cuboid::new(0.06, 0.06, 0.7)),
        arrow_material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.55, 0.35, 0.2),
            ..default()
        }),
    });
}

/// Spawn a projectile travelling along `direction`.
///
/// Render assets are optional so the simulation can run headless.
#[allow(clippy::too_many_arguments)]
pub fn spawn_projectile(
    commands: &mut Commands,
    assets: Option<&CombatAssets>,
    origin: Vec3,
    direction: Vec3,
    speed: f32,
    damage: f32,
    gravity: f32,
    lifetime: u32,
) -> Entity {
    let direction = direction.normalize_or(Vec3::Z);
    let transform = Transform::from_translation(origin).looking_to(direction, Vec3::Y);
    let mut entity = commands.spawn((
        Projectile::new(direction * speed, damage, gravity, lifetime),
        transform,
        Visibility::default(),
    ));
    if let Some(assets) = assets {
        entity.insert((
            Mesh3d(assets.arrow_mesh.clone()),
            MeshMaterial3d(assets.arrow_material.clone()),
        ));
    }
    entity.id()
}

/// Apply latched weapon switch requests.
pub fn handle_weapon_switch(
    mut input: ResMut<PlayerInput>,
    mut query: Query<&mut Loadout, With<Player>>,
) {
    let Some(request) = input.weapon_switch.take() else {
        return;
    };
    let Ok(mut loadout) = query.get_single_mut() else {
        return;
    };

    let target = match request {
        WeaponSwitch::Next => loadout.equipped.next(),
        WeaponSwitch::Previous => loadout.equipped.previous(),
        WeaponSwitch::Select(kind) => kind,
    };
    if loadout.switch_to(target) {
        info!("Switched to {}", target.label());
    }
}

/// Handle the primary button: sword swings on press, the bow charges on
/// press and fires on release.
pub fn handle_attack_input(
    mut commands: Commands,
    mut input: ResMut<PlayerInput>,
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    assets: Option<Res<CombatAssets>>,
    mut player_query: Query<(&Transform, &PlayerBody, &mut Loadout), With<Player>>,
    mut enemy_query: Query<(&Transform, &mut Health), (With<Enemy>, Without<Player>)>,
) {
    let pressed = std::mem::take(&mut input.attack_pressed);
    let released = std::mem::take(&mut input.attack_released);
    if !pressed && !released {
        return;
    }

    let Ok((transform, body, mut loadout)) = player_query.get_single_mut() else {
        return;
    };
    let combat = &tuning.combat;
    let now = clock.elapsed_ms;

    match loadout.equipped {
        WeaponKind::Sword => {
            if !pressed || !loadout.melee_ready(now, combat.sword_cooldown_ms) {
                return;
            }
            loadout.last_melee_ms = Some(now);

            let origin = transform.translation;
            let facing = body.forward();
            let mut hits = 0;
            for (enemy_transform, mut health) in enemy_query.iter_mut() {
                if health.is_dead() {
                    continue;
                }
                if in_sword_arc(
                    origin,
                    facing,
                    enemy_transform.translation,
                    combat.sword_range,
                    combat.sword_cone_dot,
                ) {
                    health.take_damage(combat.sword_damage);
                    hits += 1;
                }
            }
            debug!("Sword swing hit {} enemies", hits);
        }
        WeaponKind::Bow => {
            if pressed && !loadout.is_charging() {
                loadout.charge_started_ms = Some(now);
            }
            if !released {
                return;
            }
            let Some(started) = loadout.charge_started_ms.take() else {
                return;
            };
            if loadout.arrows == 0 {
                info!("Out of arrows!");
                return;
            }
            loadout.arrows -= 1;

            let ratio = charge_ratio(now - started, combat.max_charge_ms);
            let shot = bow_shot(ratio, combat);
            let origin = transform.translation + Vec3::Y * tuning.player.eye_height;
            spawn_projectile(
                &mut commands,
                assets.as_deref(),
                origin,
                body.aim(),
                shot.speed,
                shot.damage,
                combat.arrow_gravity,
                combat.projectile_lifetime,
            );
            debug!(
                "Arrow fired at {:.0}% charge for {} damage ({} left)",
                ratio * 100.0,
                shot.damage,
                loadout.arrows
            );
        }
    }
}

/// Move projectiles one step and remove expired or grounded ones.
pub fn step_projectiles(
    mut commands: Commands,
    mut query: Query<(Entity, &mut Transform, &mut Projectile)>,
) {
    for (entity, mut transform, mut projectile) in query.iter_mut() {
        let mut position = transform.translation;
        match projectile.advance(&mut position) {
            ProjectileFate::Flying => {
                transform.translation = position;
                if projectile.velocity.length_squared() > 1e-8 {
                    let direction = projectile.velocity.normalize();
                    transform.look_to(direction, Vec3::Y);
                }
            }
            ProjectileFate::Expired | ProjectileFate::Grounded => {
                commands.entity(entity).despawn_recursive();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn combat_world(weapon: WeaponKind) -> (World, Entity) {
        let mut world = World::new();
        world.insert_resource(Tuning::default());
        world.insert_resource(SimClock::default());
        world.insert_resource(PlayerInput::default());
        let mut loadout = Loadout::default();
        loadout.equipped = weapon;
        let player = world
            .spawn((
                Player,
                PlayerBody::default(),
                loadout,
                Transform::from_xyz(0.0, 1.0, 0.0),
            ))
            .id();
        (world, player)
    }

    fn press(world: &mut World) {
        world.resource_mut::<PlayerInput>().attack_pressed = true;
        world.run_system_once(handle_attack_input).unwrap();
    }

    fn release(world: &mut World) {
        world.resource_mut::<PlayerInput>().attack_released = true;
        world.run_system_once(handle_attack_input).unwrap();
    }

    fn projectiles(world: &mut World) -> Vec<Projectile> {
        world
            .query::<&Projectile>()
            .iter(world)
            .cloned()
            .collect()
    }

    #[test]
    fn full_charge_fires_strongest_arrow() {
        let (mut world, player) = combat_world(WeaponKind::Bow);
        press(&mut world);
        world.resource_mut::<SimClock>().elapsed_ms = 2000.0;
        release(&mut world);

        let fired = projectiles(&mut world);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].damage, 75.0);
        assert!((fired[0].velocity.length() - 1.5).abs() < 1e-4);
        assert_eq!(world.get::<Loadout>(player).unwrap().arrows, 29);
    }

    #[test]
    fn quick_release_fires_weakest_arrow() {
        let (mut world, _) = combat_world(WeaponKind::Bow);
        press(&mut world);
        release(&mut world);
        let fired = projectiles(&mut world);
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].damage, 25.0);
    }

    #[test]
    fn empty_quiver_does_not_fire() {
        let (mut world, player) = combat_world(WeaponKind::Bow);
        world.get_mut::<Loadout>(player).unwrap().arrows = 0;
        press(&mut world);
        release(&mut world);
        assert!(projectiles(&mut world).is_empty());
        assert!(!world.get::<Loadout>(player).unwrap().is_charging());
    }

    #[test]
    fn sword_damages_enemies_in_front() {
        let (mut world, _) = combat_world(WeaponKind::Sword);
        let front = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, 3.0)))
            .id();
        let behind = world
            .spawn((Enemy::default(), Health::new(100.0), Transform::from_xyz(0.0, 1.0, -3.0)))
            .id();

        press(&mut world);
        assert_eq!(world.get::<Health>(front).unwrap().current, 50.0);
        assert_eq!(world.get::<Health>(behind).unwrap().current, 100.0);

        // Still on cooldown
        press(&mut world);
        assert_eq!(world.get::<Health>(front).unwrap().current, 50.0);

        world.resource_mut::<SimClock>().elapsed_ms = 600.0;
        press(&mut world);
        assert!(world.get::<Health>(front).unwrap().is_dead());
    }

    #[test]
    fn weapon_switch_request_is_consumed() {
        let (mut world, player) = combat_world(WeaponKind::Bow);
        world.get_mut::<Loadout>(player).unwrap().charge_started_ms = Some(0.0);
        world.resource_mut::<PlayerInput>().weapon_switch = Some(WeaponSwitch::Next);
        world.run_system_once(handle_weapon_switch).unwrap();

        let loadout = world.get::<Loadout>(player).unwrap();
        assert_eq!(loadout.equipped, WeaponKind::Sword);
        assert!(!loadout.is_charging());
        assert!(world.resource::<PlayerInput>().weapon_switch.is_none());
    }

    #[test]
    fn projectiles_are_removed_after_lifetime() {
        let mut world = World::new();
        let arrow = world
            .spawn((
                Projectile::new(Vec3::Z * 0.5, 25.0, 0.0, 3),
                Transform::from_xyz(0.0, 5.0, 0.0),
            ))
            .id();
        for _ in 0..3 {
            world.run_system_once(step_projectiles).unwrap();
        }
        assert!(world.get::<Projectile>(arrow).is_some());
        assert!((world.get::<Transform>(arrow).unwrap().translation.z - 1.5).abs() < 1e-5);

        world.run_system_once(step_projectiles).unwrap();
        assert!(world.get::<Projectile>(arrow).is_none());
    }
}
