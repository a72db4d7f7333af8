//! Level data structures and RON loading.
//!
//! A level is a list of platforms plus the player start and the finish gate.
//! When no level file can be loaded the procedural sky path is used instead.

use bevy::prelude::*;
use serde::Deserialize;
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

use super::error::DataLoadError;

/// Default location of the level file.
pub const LEVEL_PATH: &str = "assets/data/levels/cloud_bounce.ron";

fn default_ground_size() -> f32 {
    200.0
}

/// Shape used to render a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum PlatformShape {
    /// Axis-aligned box
    #[default]
    Slab,
    /// Flattened sphere
    Cloud,
}

/// Sinusoidal vertical motion of a level platform.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BobDef {
    pub amplitude: f32,
    /// Phase advance per logic step (radians)
    pub speed: f32,
    #[serde(default)]
    pub phase: f32,
}

/// One platform of the level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlatformDef {
    pub position: (f32, f32, f32),
    /// Full width, height, depth. Platforms without a size are not walkable.
    #[serde(default)]
    pub size: Option<(f32, f32, f32)>,
    #[serde(default)]
    pub shape: PlatformShape,
    #[serde(default)]
    pub bob: Option<BobDef>,
}

/// Complete level definition loaded from RON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    #[serde(default = "default_ground_size")]
    pub ground_size: f32,
    pub player_start: (f32, f32, f32),
    pub finish_gate: (f32, f32, f32),
    #[serde(default)]
    pub platforms: Vec<PlatformDef>,
}

impl LevelDefinition {
    pub fn player_start(&self) -> Vec3 {
        Vec3::from(self.player_start)
    }

    pub fn finish_gate(&self) -> Vec3 {
        Vec3::from(self.finish_gate)
    }

    /// Reject levels that cannot be played.
    pub fn validate(&self) -> Result<(), DataLoadError> {
        let invalid = |reason: String| DataLoadError::InvalidLevel {
            name: self.name.clone(),
            reason,
        };

        if self.ground_size <= 0.0 {
            return Err(invalid(format!("ground size {} must be positive", self.ground_size)));
        }
        for (index, platform) in self.platforms.iter().enumerate() {
            if let Some((w, h, d)) = platform.size {
                if w <= 0.0 || h < 0.0 || d <= 0.0 {
                    return Err(invalid(format!(
                        "platform {} has non-positive size ({}, {}, {})",
                        index, w, h, d
                    )));
                }
            }
        }
        Ok(())
    }

    /// Parse and validate a level from RON text.
    pub fn from_ron(path: &str, contents: &str) -> Result<Self, DataLoadError> {
        let level: Self = ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })?;
        level.validate()?;
        Ok(level)
    }

    /// Read, parse and validate a level file.
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

    /// Built-in sky path: a main route of floating platforms climbing toward
    /// the finish gate, with smaller stepping stones in between.
    pub fn procedural() -> Self {
        let main_path = [
            (0.0, 3.0, 0.0, 6.0),
            (8.0, 5.0, 5.0, 5.0),
            (-5.0, 7.0, 10.0, 5.0),
            (10.0, 9.0, 15.0, 5.0),
            (-8.0, 11.0, 20.0, 5.0),
            (5.0, 13.0, 25.0, 5.0),
            (0.0, 15.0, 30.0, 7.0),
        ];
        let stepping_stones = [
            (4.0, 4.0, 2.5),
            (-7.0, 6.0, 7.5),
            (2.0, 8.0, 12.5),
            (-3.0, 10.0, 17.5),
            (2.0, 12.0, 22.5),
            (-2.0, 14.0, 27.5),
        ];

        let mut platforms = Vec::with_capacity(main_path.len() + stepping_stones.len());
        for (index, &(x, y, z, size)) in main_path.iter().enumerate() {
            platforms.push(PlatformDef {
                position: (x, y, z),
                size: Some((size, 1.0, size)),
                shape: PlatformShape::Slab,
                bob: Some(BobDef {
                    amplitude: 1.0,
                    speed: 0.001,
                    phase: index as f32 * PI / 2.0,
                }),
            });
        }
        for (index, &(x, y, z)) in stepping_stones.iter().enumerate() {
            platforms.push(PlatformDef {
                position: (x, y, z),
                size: Some((3.0, 1.0, 3.0)),
                shape: if index % 2 == 0 {
                    PlatformShape::Slab
                } else {
                    PlatformShape::Cloud
                },
                bob: Some(BobDef {
                    amplitude: 0.8,
                    speed: 0.001,
                    phase: (index + main_path.len()) as f32 * PI / 3.0,
                }),
            });
        }

        Self {
            name: "sky_path".to_string(),
            ground_size: default_ground_size(),
            player_start: (0.0, 4.0, 0.0),
            finish_gate: (0.0, 17.0, 30.0),
            platforms,
        }
    }
}

/// The level used by the current session.
#[derive(Resource, Debug, Clone)]
pub struct CurrentLevel(pub LevelDefinition);

impl Default for CurrentLevel {
    fn default() -> Self {
        Self(LevelDefinition::procedural())
    }
}

/// Load the level file at startup, falling back to the procedural layout.
pub fn load_level_definition(mut commands: Commands) {
    let level = match LevelDefinition::load(LEVEL_PATH) {
        Ok(level) => {
            info!(
                "Loaded level '{}' with {} platforms",
                level.name,
                level.platforms.len()
            );
            level
        }
        Err(e) => {
            warn!("{}. Using procedural level.", e);
            LevelDefinition::procedural()
        }
    };
    commands.insert_resource(CurrentLevel(level));
}
