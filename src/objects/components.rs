//! Collectibles, targets, fragments and the score.

use bevy::prelude::*;
use std::collections::VecDeque;

use crate::core::RateLimiter;

/// A pickup that grants score, experience and arrows.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Collectible;

/// A breakable target.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Target;

/// A platform owned by the object pool (rises and falls).
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MovingPlatform;

/// Debris thrown out by a destroyed target.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// World units per step
    pub velocity: Vec3,
    /// Euler radians per step
    pub spin: Vec3,
    /// Steps left to live
    pub lifetime: i32,
}

impl Fragment {
    /// Advance one step. Returns false once the fragment should be removed.
    pub fn step(&mut self, transform: &mut Transform, gravity: f32) -> bool {
        self.lifetime -= 1;
        if self.lifetime <= 0 {
            return false;
        }

        transform.translation += self.velocity;
        transform.rotation *= Quat::from_euler(EulerRot::XYZ, self.spin.x, self.spin.y, self.spin.z);
        self.velocity.y -= gravity;

        transform.translation.y > 0.0
    }
}

/// Points earned this run.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    pub score: u32,
}

/// Pool bookkeeping for the object systems.
#[derive(Resource, Debug, Clone)]
pub struct ObjectState {
    /// Gate for player-vs-object collision checks.
    ///
    /// With the 16 ms interval and a 16.67 ms fixed step this passes every
    /// step; it only throttles when `update_interval_ms` is tuned above one
    /// step.
    pub collision_limiter: RateLimiter,
    /// Gate for fragment and projectile-vs-target updates, same interval
    pub update_limiter: RateLimiter,
    /// Gate for the periodic dead-fragment sweep
    pub cleanup_limiter: RateLimiter,
    /// Live fragments, oldest first
    pub fragments: VecDeque<Entity>,
}

impl ObjectState {
    pub fn new(update_interval_ms: f64, cleanup_interval_ms: f64) -> Self {
        let mut cleanup_limiter = RateLimiter::new(cleanup_interval_ms);
        // The first sweep is due one interval into the run
        cleanup_limiter.ready(0.0);
        Self {
            collision_limiter: RateLimiter::new(update_interval_ms),
            update_limiter: RateLimiter::new(update_interval_ms),
            cleanup_limiter,
            fragments: VecDeque::new(),
        }
    }
}

impl Default for ObjectState {
    fn default() -> Self {
        Self::new(16.0, 3000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_gates_follow_the_tuned_interval() {
        let mut clock = crate::core::SimClock::default();
        let mut every_step = ObjectState::default();
        let mut slow = ObjectState::new(40.0, 3000.0);
        let mut slow_passes = 0;
        for _ in 0..60 {
            clock.advance();
            assert!(every_step.update_limiter.ready(clock.elapsed_ms));
            if slow.update_limiter.ready(clock.elapsed_ms) {
                slow_passes += 1;
            }
        }
        // 40 ms rounds up to three steps
        assert_eq!(slow_passes, 20);
    }

    #[test]
    fn fragment_expires_after_lifetime() {
        let mut fragment = Fragment {
            velocity: Vec3::new(0.0, 0.5, 0.0),
            spin: Vec3::splat(0.05),
            lifetime: 3,
        };
        let mut transform = Transform::from_xyz(0.0, 2.0, 0.0);
        assert!(fragment.step(&mut transform, 0.01));
        assert!(fragment.step(&mut transform, 0.01));
        assert!(!fragment.step(&mut transform, 0.01));
        assert!((transform.translation.y - 2.99).abs() < 1e-5);
    }

    #[test]
    fn fragment_dies_on_ground() {
        let mut fragment = Fragment {
            velocity: Vec3::new(0.0, -0.5, 0.0),
            spin: Vec3::ZERO,
            lifetime: 30,
        };
        let mut transform = Transform::from_xyz(0.0, 0.4, 0.0);
        assert!(!fragment.step(&mut transform, 0.01));
    }
}
