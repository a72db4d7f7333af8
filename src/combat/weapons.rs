//! Weapon math: bow charge and the sword's reach.

use bevy::prelude::*;

use crate::core::tuning::CombatTuning;

/// Fraction of a full charge after holding for `held_ms`.
pub fn charge_ratio(held_ms: f64, max_charge_ms: f64) -> f32 {
    if max_charge_ms <= 0.0 {
        return 1.0;
    }
    (held_ms / max_charge_ms).clamp(0.0, 1.0) as f32
}

/// Speed and damage of a released arrow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowShot {
    pub speed: f32,
    pub damage: f32,
}

/// Arrow properties for a given charge ratio.
pub fn bow_shot(ratio: f32, tuning: &CombatTuning) -> BowShot {
    let ratio = ratio.clamp(0.0, 1.0);
    BowShot {
        speed: tuning.min_bow_speed + (tuning.max_bow_speed - tuning.min_bow_speed) * ratio,
        damage: tuning.min_bow_damage + (tuning.max_bow_damage - tuning.min_bow_damage) * ratio,
    }
}

/// Whether a sword swing from `origin` facing `facing` reaches `target`.
///
/// The target must be within `range` and its horizontal direction must lie
/// inside the cone `dot(facing, direction) > cone_dot`.
pub fn in_sword_arc(origin: Vec3, facing: Vec3, target: Vec3, range: f32, cone_dot: f32) -> bool {
    if origin.distance(target) > range {
        return false;
    }

    let flat_facing = Vec3::new(facing.x, 0.0, facing.z).normalize_or_zero();
    let to_target = Vec3::new(target.x - origin.x, 0.0, target.z - origin.z);
    // Straight above or below counts as a hit
    if to_target.length_squared() < 1e-6 {
        return true;
    }

    flat_facing.dot(to_target.normalize()) > cone_dot
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_charge_gives_max_damage_and_speed() {
        let tuning = CombatTuning::default();
        let shot = bow_shot(charge_ratio(2000.0, tuning.max_charge_ms), &tuning);
        assert_eq!(shot.damage, 75.0);
        assert_eq!(shot.speed, tuning.max_bow_speed);
    }

    #[test]
    fn no_charge_gives_min_damage() {
        let tuning = CombatTuning::default();
        let shot = bow_shot(charge_ratio(0.0, tuning.max_charge_ms), &tuning);
        assert_eq!(shot.damage, 25.0);
        assert_eq!(shot.speed, tuning.min_bow_speed);
    }

    #[test]
    fn overcharge_is_clamped() {
        assert_eq!(charge_ratio(5000.0, 2000.0), 1.0);
        assert_eq!(charge_ratio(1000.0, 2000.0), 0.5);
        assert_eq!(charge_ratio(-10.0, 2000.0), 0.0);
    }

    #[test]
    fn sword_hits_in_front_only() {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        let facing = Vec3::Z;
        assert!(in_sword_arc(origin, facing, Vec3::new(0.0, 1.0, 3.0), 4.5, 0.3));
        assert!(in_sword_arc(origin, facing, Vec3::new(2.0, 1.0, 2.0), 4.5, 0.3));
        assert!(!in_sword_arc(origin, facing, Vec3::new(0.0, 1.0, -3.0), 4.5, 0.3));
        assert!(!in_sword_arc(origin, facing, Vec3::new(3.0, 1.0, 0.0), 4.5, 0.3));
        assert!(!in_sword_arc(origin, facing, Vec3::new(0.0, 1.0, 5.0), 4.5, 0.3));
    }
}
