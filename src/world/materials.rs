//! Terrain materials.

use bevy::prelude::*;

use super::data::PlatformShape;

/// Material handles shared by all terrain of one build.
pub struct TerrainMaterials {
    pub ground: Handle<StandardMaterial>,
    pub slab: Handle<StandardMaterial>,
    pub cloud: Handle<StandardMaterial>,
    pub gate: Handle<StandardMaterial>,
}

impl TerrainMaterials {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        // Grass green
        let ground = materials.add(StandardMaterial {
            base_color: Color::srgb(0.35, 0.6, 0.3),
            perceptual_roughness: 0.95,
            ..default()
        });

        // Sandstone
        let slab = materials.add(StandardMaterial {
            base_color: Color::srgb(0.76, 0.64, 0.48),
            perceptual_roughness: 0.8,
            ..default()
        });

        // Soft white, slightly glowing
        let cloud = materials.add(StandardMaterial {
            base_color: Color::srgb(0.95, 0.96, 1.0),
            perceptual_roughness: 1.0,
            emissive: LinearRgba::new(0.05, 0.05, 0.06, 1.0),
            ..default()
        });

        // Gold ring
        let gate = materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.84, 0.0),
            metallic: 0.8,
            perceptual_roughness: 0.3,
            emissive: LinearRgba::new(0.4, 0.3, 0.0, 1.0),
            ..default()
        });

        Self {
            ground,
            slab,
            cloud,
            gate,
        }
    }

    /// Material for a platform of the given shape.
    pub fn for_shape(&self, shape: PlatformShape) -> Handle<StandardMaterial> {
        match shape {
            PlatformShape::Slab => self.slab.clone(),
            PlatformShape::Cloud => self.cloud.clone(),
        }
    }
}
