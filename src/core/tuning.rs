//! Gameplay tuning loaded from `assets/data/tuning.ron`.
//!
//! Every constant the simulation uses lives here so balance can be tweaked
//! without recompiling. Each section is `#[serde(default)]`, so a file only
//! needs to list the values it overrides. Speeds are in world units per logic
//! step and lifetimes in logic steps; durations are in simulated milliseconds.

use bevy::prelude::*;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::combat::WeaponKind;
use crate::world::DataLoadError;

/// Default location of the tuning file.
pub const TUNING_PATH: &str = "assets/data/tuning.ron";

/// All gameplay tuning.
#[derive(Resource, Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub camera: CameraTuning,
    pub combat: CombatTuning,
    pub enemies: EnemyTuning,
    pub objects: ObjectTuning,
    pub progression: ProgressionTuning,
}

/// Player movement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub move_speed: f32,
    pub sprint_multiplier: f32,
    pub jump_force: f32,
    pub gravity: f32,
    /// Maximum horizontal speed
    pub max_speed: f32,
    pub jump_cooldown_ms: f64,
    /// Lowest y the player body can reach
    pub floor_height: f32,
    /// Eye offset above the body centre
    pub eye_height: f32,
    /// Distance from the body centre to the feet
    pub half_height: f32,
    /// Radians per pixel of mouse motion
    pub mouse_sensitivity: f32,
    /// Pitch limit in radians
    pub max_pitch: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_speed: 0.12,
            sprint_multiplier: 1.6,
            jump_force: 0.25,
            gravity: 0.015,
            max_speed: 0.3,
            jump_cooldown_ms: 500.0,
            floor_height: 1.0,
            eye_height: 0.7,
            half_height: 0.5,
            mouse_sensitivity: 0.003,
            max_pitch: std::f32::consts::FRAC_PI_3,
        }
    }
}

/// Camera placement.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    pub first_person: bool,
    /// Third-person distance behind the player
    pub distance: f32,
    /// Third-person height above the player
    pub height: f32,
    /// Extra distance per radian of upward look
    pub pullback: f32,
    /// Third-person smoothing rate (per second)
    pub smoothing: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            first_person: true,
            distance: 8.0,
            height: 3.0,
            pullback: 4.0,
            smoothing: 8.0,
        }
    }
}

/// Weapons and projectiles.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub starting_weapon: WeaponKind,
    pub sword_damage: f32,
    pub sword_range: f32,
    /// Minimum dot product between facing and enemy direction (0.3 is about 145 degrees)
    pub sword_cone_dot: f32,
    pub sword_cooldown_ms: f64,
    pub min_bow_damage: f32,
    pub max_bow_damage: f32,
    pub min_bow_speed: f32,
    pub max_bow_speed: f32,
    pub max_charge_ms: f64,
    /// Downward acceleration applied to arrows each step
    pub arrow_gravity: f32,
    pub max_arrows: u32,
    pub starting_arrows: u32,
    /// Steps a projectile lives before it expires
    pub projectile_lifetime: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            starting_weapon: WeaponKind::Bow,
            sword_damage: 50.0,
            sword_range: 4.5,
            sword_cone_dot: 0.3,
            sword_cooldown_ms: 600.0,
            min_bow_damage: 25.0,
            max_bow_damage: 75.0,
            min_bow_speed: 0.5,
            max_bow_speed: 1.5,
            max_charge_ms: 2000.0,
            arrow_gravity: 0.004,
            max_arrows: 30,
            starting_arrows: 30,
            projectile_lifetime: 120,
        }
    }
}

/// Enemy pool, AI and contact damage.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub pool_size: usize,
    pub max_health: f32,
    pub wander_speed: f32,
    pub chase_speed: f32,
    pub detection_range: f32,
    pub contact_damage: f32,
    pub damage_cooldown_ms: f64,
    pub enemy_radius: f32,
    pub player_radius: f32,
    pub knockback: f32,
    /// Wandering enemies beyond this on either horizontal axis turn back
    pub bounds: f32,
    /// Spawn positions are drawn from [-spawn_extent, spawn_extent]
    pub spawn_extent: f32,
    pub hit_radius: f32,
    pub kill_experience: u32,
    pub wander_interval_min: u32,
    pub wander_interval_max: u32,
    pub base_height: f32,
    pub bob_amplitude: f32,
    pub bob_rate: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            pool_size: 5,
            max_health: 100.0,
            wander_speed: 0.05,
            chase_speed: 0.08,
            detection_range: 15.0,
            contact_damage: 10.0,
            damage_cooldown_ms: 1000.0,
            enemy_radius: 0.5,
            player_radius: 0.5,
            knockback: 0.3,
            bounds: 40.0,
            spawn_extent: 20.0,
            hit_radius: 1.5,
            kill_experience: 50,
            wander_interval_min: 100,
            wander_interval_max: 200,
            base_height: 1.0,
            bob_amplitude: 0.2,
            bob_rate: 0.05,
        }
    }
}

/// Collectibles, targets, fragments and moving platforms.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectTuning {
    pub max_collectibles: usize,
    pub max_platforms: usize,
    pub max_targets: usize,
    pub max_fragments: usize,
    pub fragments_per_target: usize,
    pub fragment_lifetime: i32,
    pub fragment_gravity: f32,
    pub pickup_radius: f32,
    pub target_touch_radius: f32,
    pub target_hit_radius: f32,
    pub collectible_score: u32,
    pub collectible_experience: u32,
    pub target_score: u32,
    pub target_experience: u32,
    pub arrows_per_pickup: u32,
    pub update_interval_ms: f64,
    pub cleanup_interval_ms: f64,
    pub spawn_extent: f32,
    /// Targets never spawn closer than this to the player
    pub min_target_distance: f32,
    /// How far above a platform top the player's feet may be and still land
    pub platform_tolerance: f32,
    /// Fallback ground: the player body never goes below this
    pub ground_height: f32,
    pub moving_platform_rise: f32,
    /// Steps for a moving platform to rise and return
    pub moving_platform_period: u32,
}

impl Default for ObjectTuning {
    fn default() -> Self {
        Self {
            max_collectibles: 5,
            max_platforms: 3,
            max_targets: 3,
            max_fragments: 4,
            fragments_per_target: 2,
            fragment_lifetime: 30,
            fragment_gravity: 0.01,
            pickup_radius: 1.5,
            target_touch_radius: 2.0,
            target_hit_radius: 1.5,
            collectible_score: 10,
            collectible_experience: 10,
            target_score: 20,
            target_experience: 30,
            arrows_per_pickup: 5,
            update_interval_ms: 16.0,
            cleanup_interval_ms: 3000.0,
            spawn_extent: 20.0,
            min_target_distance: 5.0,
            platform_tolerance: 0.1,
            ground_height: 0.5,
            moving_platform_rise: 2.0,
            moving_platform_period: 60,
        }
    }
}

/// Health, experience and the win condition.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProgressionTuning {
    pub max_health: f32,
    pub exp_to_next_level: u32,
    pub health_per_level: f32,
    /// Threshold multiplier applied on every level-up
    pub level_growth: f32,
    pub victory_distance: f32,
}

impl Default for ProgressionTuning {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            exp_to_next_level: 100,
            health_per_level: 20.0,
            level_growth: 1.2,
            victory_distance: 3.0,
        }
    }
}

impl Tuning {
    /// Parse tuning from RON text.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Read and parse a tuning file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DataLoadError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron(&display, &contents)
    }
}

/// Load tuning at startup, falling back to defaults.
pub fn load_tuning(mut commands: Commands) {
    let tuning = match Tuning::load(TUNING_PATH) {
        Ok(tuning) => {
            info!("Loaded tuning from {}", TUNING_PATH);
            tuning
        }
        Err(DataLoadError::FileNotFound(path)) => {
            warn!("Tuning file {} not found. Using defaults.", path);
            Tuning::default()
        }
        Err(e) => {
            error!("{}. Using default tuning.", e);
            Tuning::default()
        }
    };
    commands.insert_resource(tuning);
}
