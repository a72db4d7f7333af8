//! Combat-related components.

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::tuning::CombatTuning;

/// Component for entities that can take damage.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Health {
    pub current: f32,
    pub maximum: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Apply damage and return the amount actually lost.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let actual = amount.min(self.current);
        self.current -= actual;
        actual
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.maximum <= 0.0 {
            return 0.0;
        }
        (self.current / self.maximum).clamp(0.0, 1.0)
    }
}

/// The two weapons the player can wield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
pub enum WeaponKind {
    Sword,
    #[default]
    Bow,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 2] = [WeaponKind::Sword, WeaponKind::Bow];

    pub fn label(self) -> &'static str {
        match self {
            WeaponKind::Sword => "Sword",
            WeaponKind::Bow => "Bow",
        }
    }

    /// Next weapon in the cycle (wraps).
    pub fn next(self) -> Self {
        match self {
            WeaponKind::Sword => WeaponKind::Bow,
            WeaponKind::Bow => WeaponKind::Sword,
        }
    }

    /// Previous weapon in the cycle (wraps).
    pub fn previous(self) -> Self {
        // Two weapons, so the cycle is symmetric
        self.next()
    }
}

/// The player's weapons and ammunition.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Loadout {
    pub equipped: WeaponKind,
    pub arrows: u32,
    pub max_arrows: u32,
    /// Simulation time the bow started charging
    pub charge_started_ms: Option<f64>,
    /// Simulation time of the last sword swing
    pub last_melee_ms: Option<f64>,
}

impl Loadout {
    pub fn from_tuning(tuning: &CombatTuning) -> Self {
        Self {
            equipped: tuning.starting_weapon,
            arrows: tuning.starting_arrows.min(tuning.max_arrows),
            max_arrows: tuning.max_arrows,
            charge_started_ms: None,
            last_melee_ms: None,
        }
    }

    /// Equip `kind`, cancelling any bow charge. Returns false if already equipped.
    pub fn switch_to(&mut self, kind: WeaponKind) -> bool {
        if self.equipped == kind {
            return false;
        }
        self.equipped = kind;
        self.charge_started_ms = None;
        true
    }

    /// Add arrows up to the quiver cap. Returns how many were added.
    pub fn restock(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.max_arrows.saturating_sub(self.arrows));
        self.arrows += added;
        added
    }

    pub fn is_charging(&self) -> bool {
        self.charge_started_ms.is_some()
    }

    /// True when the sword cooldown has elapsed at `now_ms`.
    pub fn melee_ready(&self, now_ms: f64, cooldown_ms: f64) -> bool {
        self.last_melee_ms
            .map_or(true, |last| now_ms - last >= cooldown_ms)
    }
}

impl Default for Loadout {
    fn default() -> Self {
        Self::from_tuning(&CombatTuning::default())
    }
}

/// What happened to a projectile during one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    Flying,
    /// Lived longer than its lifetime
    Expired,
    /// Touched the ground
    Grounded,
}

/// A projectile in flight.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    /// World units per step
    pub velocity: Vec3,
    /// Subtracted from vertical velocity each step
    pub gravity: f32,
    pub damage: f32,
    /// Steps lived so far
    pub age: u32,
    pub lifetime: u32,
}

impl Projectile {
    pub fn new(velocity: Vec3, damage: f32, gravity: f32, lifetime: u32) -> Self {
        Self {
            velocity,
            gravity,
            damage,
            age: 0,
            lifetime,
        }
    }

    /// Advance one step, moving `position`.
    ///
    /// Age increments first, so a projectile is removed on exactly the step
    /// its age first exceeds its lifetime.
    pub fn advance(&mut self, position: &mut Vec3) -> ProjectileFate {
        self.age += 1;
        if self.age > self.lifetime {
            return ProjectileFate::Expired;
        }

        *position += self.velocity;
        self.velocity.y -= self.gravity;

        if position.y <= 0.0 {
            ProjectileFate::Grounded
        } else {
            ProjectileFate::Flying
        }
    }
}
