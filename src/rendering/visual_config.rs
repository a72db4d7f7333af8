//! Visual configuration loaded from external RON file.
//!
//! Allows tweaking the sky, fog and lighting without recompilation.

use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use serde::Deserialize;
use std::fs;

/// Default location of the visual config file.
pub const VISUAL_CONFIG_PATH: &str = "assets/data/visual_config.ron";

/// Visual configuration loaded from assets/data/visual_config.ron.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    // Atmosphere
    pub fog_enabled: bool,
    pub fog_density: f32,
    pub fog_color: (f32, f32, f32),
    pub clear_color: (f32, f32, f32),
    // Lighting
    pub ambient_color: (f32, f32, f32),
    pub ambient_brightness: f32,
    pub sun_color: (f32, f32, f32),
    pub sun_illuminance: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            // Light haze over a clear sky
            fog_enabled: true,
            fog_density: 0.01,
            fog_color: (0.75, 0.85, 0.95),
            clear_color: (0.53, 0.81, 0.92),
            ambient_color: (1.0, 1.0, 1.0),
            ambient_brightness: 400.0,
            sun_color: (1.0, 0.97, 0.9),
            sun_illuminance: 8000.0,
        }
    }
}

impl VisualConfig {
    /// Load visual config from RON file.
    pub fn load() -> Self {
        let path = VISUAL_CONFIG_PATH;
        match fs::read_to_string(path) {
            Ok(contents) => match ron::from_str(&contents) {
                Ok(config) => {
                    info!("Loaded visual config from {}", path);
                    config
                }
                Err(e) => {
                    error!("Failed to parse {}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Could not read {}: {}. Using defaults.", path, e);
                Self::default()
            }
        }
    }

    pub fn clear_color(&self) -> Color {
        let (r, g, b) = self.clear_color;
        Color::srgb(r, g, b)
    }

    /// Per-camera fog for the 3D view.
    pub fn fog(&self) -> DistanceFog {
        let (r, g, b) = self.fog_color;
        let density = if self.fog_enabled { self.fog_density } else { 0.0 };
        DistanceFog {
            color: Color::srgb(r, g, b),
            falloff: FogFalloff::ExponentialSquared { density },
            ..default()
        }
    }
}

/// System to load visual config at startup.
pub fn load_visual_config(mut commands: Commands) {
    let config = VisualConfig::load();
    commands.insert_resource(ClearColor(config.clear_color()));
    commands.insert_resource(config);
}
