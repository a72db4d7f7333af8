//! Enemy-related components.

use bevy::prelude::*;

/// An enemy in the fixed-size pool.
///
/// Whether it chases or wanders is decided fresh every step from the
/// distance to the player, so it is never stored.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct Enemy {
    pub wander: Wander,
    /// Simulation time of the last contact hit on the player
    pub last_contact_ms: Option<f64>,
    /// Steps lived, drives the idle bob
    pub age: u32,
}

/// Random-walk state used while the player is out of range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wander {
    /// Horizontal unit direction
    pub direction: Vec3,
    /// Steps since the direction last changed
    pub timer: u32,
    /// Steps until the next change
    pub interval: u32,
}

impl Default for Wander {
    fn default() -> Self {
        Self {
            direction: Vec3::X,
            timer: 0,
            interval: 100,
        }
    }
}

/// What an enemy does this step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Chasing,
    Wandering,
}
