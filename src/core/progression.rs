//! Player health, experience and leveling.
//!
//! `PlayerStats` is owned exclusively by the systems in this module. Other
//! components request changes through `PlayerHitEvent` and `ExperienceEvent`,
//! which are applied at the end of each logic step.

use bevy::prelude::*;

use super::events::{ExperienceEvent, LevelUpEvent, PlayerHitEvent};
use super::states::GameState;
use super::step::SimClock;
use super::tuning::{ProgressionTuning, Tuning};

/// Health, level and experience of the player.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub exp: u32,
    pub exp_to_next_level: u32,
    pub health_per_level: f32,
    pub level_growth: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::from_tuning(&ProgressionTuning::default())
    }
}

impl PlayerStats {
    pub fn from_tuning(tuning: &ProgressionTuning) -> Self {
        Self {
            health: tuning.max_health,
            max_health: tuning.max_health,
            level: 1,
            exp: 0,
            exp_to_next_level: tuning.exp_to_next_level.max(1),
            health_per_level: tuning.health_per_level,
            level_growth: tuning.level_growth,
        }
    }

    /// Apply damage, returning how much health was actually lost.
    ///
    /// Non-positive amounts are ignored. Health stays within `[0, max_health]`.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        before - self.health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    /// Add experience and level up as many times as it covers.
    ///
    /// Each level carries the remainder over, raises max health, fully heals
    /// and grows the next threshold. Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.exp = self.exp.saturating_add(amount);
        let mut gained = 0;
        while self.exp >= self.exp_to_next_level {
            self.level += 1;
            self.exp -= self.exp_to_next_level;
            self.max_health += self.health_per_level;
            self.health = self.max_health;
            // Threshold never drops to zero, so the loop always terminates.
            let next = (self.exp_to_next_level as f32 * self.level_growth).floor() as u32;
            self.exp_to_next_level = next.max(1);
            gained += 1;
        }
        gained
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health
    }

    pub fn exp_fraction(&self) -> f32 {
        self.exp as f32 / self.exp_to_next_level as f32
    }
}

/// Reset progression and the simulation clock for a fresh run.
pub fn reset_progression(mut commands: Commands, tuning: Res<Tuning>) {
    commands.insert_resource(PlayerStats::from_tuning(&tuning.progression));
    commands.insert_resource(SimClock::default());
}

/// Apply damage events to the player, ending the run at zero health.
pub fn apply_player_hits(
    mut hits: EventReader<PlayerHitEvent>,
    mut stats: ResMut<PlayerStats>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    for hit in hits.read() {
        if stats.is_dead() {
            continue;
        }
        let lost = stats.take_damage(hit.amount);
        debug!("Player took {} damage from {:?}", lost, hit.source);

        if stats.is_dead() {
            info!("Player died! Transitioning to Game Over...");
            next_state.set(GameState::GameOver);
        }
    }
}

/// Apply experience events, announcing each level gained.
///
/// Experience earned in the step the player died is dropped, so a level-up
/// can never heal a dead player.
pub fn apply_experience(
    mut events: EventReader<ExperienceEvent>,
    mut stats: ResMut<PlayerStats>,
    mut level_ups: EventWriter<LevelUpEvent>,
) {
    if stats.is_dead() {
        events.clear();
        return;
    }
    for event in events.read() {
        let before = stats.level;
        if stats.gain_experience(event.amount) == 0 {
            continue;
        }
        for new_level in (before + 1)..=stats.level {
            level_ups.send(LevelUpEvent {
                new_level,
                max_health: stats.max_health,
            });
        }
        info!(
            "Level up! Now level {} ({} hp, next at {} exp)",
            stats.level, stats.max_health, stats.exp_to_next_level
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ExperienceSource;
    use bevy::ecs::system::RunSystemOnce;

    fn progression_world() -> World {
        let mut world = World::new();
        world.insert_resource(PlayerStats::default());
        world.init_resource::<NextState<GameState>>();
        world.init_resource::<Events<PlayerHitEvent>>();
        world.init_resource::<Events<ExperienceEvent>>();
        world.init_resource::<Events<LevelUpEvent>>();
        world
    }

    fn hit(world: &mut World, amount: f32) {
        let source = world.spawn_empty().id();
        world.send_event(PlayerHitEvent { source, amount });
    }

    fn grant(world: &mut World, amount: u32) {
        world.send_event(ExperienceEvent {
            amount,
            source: ExperienceSource::Enemy,
        });
    }

    fn end_of_step(world: &mut World) {
        world.run_system_once(apply_player_hits).unwrap();
        world.run_system_once(apply_experience).unwrap();
    }

    fn level_ups(world: &World) -> Vec<u32> {
        world
            .resource::<Events<LevelUpEvent>>()
            .iter_current_update_events()
            .map(|e| e.new_level)
            .collect()
    }

    #[test]
    fn fatal_hit_ends_the_run() {
        let mut world = progression_world();
        hit(&mut world, 60.0);
        end_of_step(&mut world);
        assert!(matches!(
            world.resource::<NextState<GameState>>(),
            NextState::Unchanged
        ));

        world.resource_mut::<Events<PlayerHitEvent>>().clear();
        hit(&mut world, 60.0);
        end_of_step(&mut world);
        assert_eq!(world.resource::<PlayerStats>().health, 0.0);
        assert!(matches!(
            world.resource::<NextState<GameState>>(),
            NextState::Pending(GameState::GameOver)
        ));
    }

    #[test]
    fn each_level_gained_is_announced() {
        let mut world = progression_world();
        grant(&mut world, 400);
        end_of_step(&mut world);

        assert_eq!(level_ups(&world), vec![2, 3, 4]);
        assert_eq!(world.resource::<PlayerStats>().level, 4);
    }

    #[test]
    fn experience_in_the_dying_step_does_not_revive() {
        let mut world = progression_world();
        hit(&mut world, 150.0);
        grant(&mut world, 100);
        end_of_step(&mut world);

        let stats = world.resource::<PlayerStats>();
        assert_eq!(stats.health, 0.0);
        assert_eq!(stats.level, 1);
        assert!(level_ups(&world).is_empty());
        assert!(matches!(
            world.resource::<NextState<GameState>>(),
            NextState::Pending(GameState::GameOver)
        ));
    }

    #[test]
    fn damage_is_clamped_to_zero() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.take_damage(30.0), 30.0);
        assert_eq!(stats.health, 70.0);
        assert_eq!(stats.take_damage(500.0), 70.0);
        assert_eq!(stats.health, 0.0);
        assert!(stats.is_dead());
    }

    #[test]
    fn non_positive_damage_is_ignored() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.take_damage(0.0), 0.0);
        assert_eq!(stats.take_damage(-15.0), 0.0);
        assert_eq!(stats.health, stats.max_health);
    }

    #[test]
    fn health_never_exceeds_max() {
        let mut stats = PlayerStats::default();
        for amount in [0.5, 3.0, -2.0, 10.0, 99.0, 1.0] {
            stats.take_damage(amount);
            assert!(stats.health >= 0.0 && stats.health <= stats.max_health);
        }
    }

    #[test]
    fn experience_below_threshold_does_not_level() {
        let mut stats = PlayerStats::default();
        stats.take_damage(40.0);
        assert_eq!(stats.gain_experience(50), 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.exp, 50);
        assert_eq!(stats.health, 60.0);
    }

    #[test]
    fn level_up_carries_remainder_and_heals() {
        let mut stats = PlayerStats::default();
        stats.take_damage(40.0);
        assert_eq!(stats.gain_experience(130), 1);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.exp, 30);
        assert_eq!(stats.exp_to_next_level, 120);
        assert_eq!(stats.max_health, 120.0);
        assert_eq!(stats.health, stats.max_health);
    }

    #[test]
    fn large_grant_levels_repeatedly() {
        let mut stats = PlayerStats::default();
        // 100 + 120 + 144 = 364
        assert_eq!(stats.gain_experience(400), 3);
        assert_eq!(stats.level, 4);
        assert_eq!(stats.exp, 36);
        assert_eq!(stats.exp_to_next_level, 172);
        assert!(stats.exp < stats.exp_to_next_level);
        assert_eq!(stats.health, 160.0);
    }

    #[test]
    fn degenerate_growth_still_terminates() {
        let mut stats = PlayerStats::from_tuning(&ProgressionTuning {
            exp_to_next_level: 0,
            level_growth: 0.0,
            ..default()
        });
        let levels = stats.gain_experience(5);
        assert_eq!(levels, 5);
        assert!(stats.exp < stats.exp_to_next_level);
    }
}
