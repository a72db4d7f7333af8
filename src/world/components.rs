//! Terrain components.

use bevy::prelude::*;

/// Marker for all level geometry that should be cleaned up.
#[derive(Component)]
pub struct LevelGeometry;

/// The finish gate; reaching it wins the run.
#[derive(Component)]
pub struct FinishGate;

/// World-space axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn from_center(center: Vec3, extents: Vec3) -> Self {
        let half = extents * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// True when `point` lies inside the box on the x and z axes.
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.z && point.z <= self.max.z
    }
}

/// Something the player can stand on.
///
/// Platforms without extents are rendered but never support the player.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Platform {
    /// Full width, height and depth
    pub extents: Option<Vec3>,
}

impl Platform {
    pub fn new(extents: Vec3) -> Self {
        Self {
            extents: Some(extents),
        }
    }

    /// World bounds of the platform centred at `center`.
    pub fn bounds(&self, center: Vec3) -> Option<Bounds> {
        self.extents.map(|extents| Bounds::from_center(center, extents))
    }
}

/// Vertical motion of a platform, advanced once per logic step.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub enum PlatformMotion {
    /// Sinusoidal bob around `base_y`
    Bob {
        base_y: f32,
        amplitude: f32,
        /// Phase advance per step (radians)
        speed: f32,
        phase: f32,
    },
    /// Rise by `rise` and return over `period` steps
    Ramp {
        base_y: f32,
        rise: f32,
        period: u32,
        tick: u32,
    },
}

impl PlatformMotion {
    /// Advance one step and return the new height.
    pub fn advance(&mut self) -> f32 {
        match self {
            PlatformMotion::Bob {
                base_y,
                amplitude,
                speed,
                phase,
            } => {
                *phase += *speed;
                *base_y + phase.sin() * *amplitude
            }
            PlatformMotion::Ramp {
                base_y,
                rise,
                period,
                tick,
            } => {
                if *period < 2 {
                    return *base_y;
                }
                *tick = (*tick + 1) % *period;
                let half = *period as f32 / 2.0;
                let t = *tick as f32;
                let progress = if t <= half { t / half } else { (*period as f32 - t) / half };
                *base_y + *rise * progress
            }
        }
    }
}
