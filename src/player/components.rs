//! Player-related components.

use bevy::prelude::*;

use crate::combat::WeaponKind;

/// Marker component for the player entity.
#[derive(Component)]
pub struct Player;

/// Kinematic state of the player body.
///
/// Position lives in the entity's `Transform`; velocities are in world units
/// per logic step.
#[derive(Component, Debug, Clone, Default, PartialEq)]
pub struct PlayerBody {
    pub velocity: Vec3,
    /// Heading around the y axis (0 faces +z)
    pub yaw: f32,
    /// Look angle above the horizon
    pub pitch: f32,
    pub is_jumping: bool,
    pub is_on_platform: bool,
    /// Simulation time of the last jump
    pub last_jump_ms: Option<f64>,
    pub is_moving: bool,
}

impl PlayerBody {
    /// Horizontal facing direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal direction to the player's right.
    pub fn right(&self) -> Vec3 {
        Vec3::new(-self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Full look direction including pitch.
    pub fn aim(&self) -> Vec3 {
        let (sin_p, cos_p) = self.pitch.sin_cos();
        Vec3::new(self.yaw.sin() * cos_p, sin_p, self.yaw.cos() * cos_p)
    }

    /// Record whether the body is standing on something this step.
    ///
    /// Landing ends a jump and stops vertical motion.
    pub fn set_on_platform(&mut self, on_platform: bool) {
        self.is_on_platform = on_platform;
        if on_platform {
            self.is_jumping = false;
            self.velocity.y = 0.0;
        }
    }
}

/// Held movement keys, plus a latched jump request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MotionInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
    pub sprint: bool,
    pub jump: bool,
}

/// A requested weapon change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponSwitch {
    Next,
    Previous,
    Select(WeaponKind),
}

/// Input captured every rendered frame and consumed by the logic step.
///
/// One-shot actions stay latched until a logic step takes them, so a click
/// shorter than a fixed tick is never lost.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct PlayerInput {
    pub motion: MotionInput,
    pub attack_pressed: bool,
    pub attack_released: bool,
    pub weapon_switch: Option<WeaponSwitch>,
}

/// How the player camera is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraMode {
    #[default]
    FirstPerson,
    ThirdPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
        }
    }
}

/// Marker and mode for the player's camera.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerCamera {
    pub mode: CameraMode,
}
