//! Global events used for cross-system communication.
//!
//! Gameplay systems never touch player stats directly. Enemies send
//! `PlayerHitEvent`s, props and kills send `ExperienceEvent`s, and the
//! progression systems at the end of the step apply them. The HUD reads the
//! same events to show floating feedback text.

use bevy::prelude::*;

/// What granted a chunk of experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperienceSource {
    Collectible,
    Target,
    Enemy,
}

/// Sent when the player takes damage.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerHitEvent {
    /// Entity that dealt the damage
    pub source: Entity,
    /// Damage before clamping to remaining health
    pub amount: f32,
}

/// Sent when the player earns experience.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExperienceEvent {
    pub amount: u32,
    pub source: ExperienceSource,
}

/// Sent once per level gained.
#[derive(Event, Debug, Clone, Copy)]
pub struct LevelUpEvent {
    /// New level
    pub new_level: u32,
    /// Max health after the level-up
    pub max_health: f32,
}
