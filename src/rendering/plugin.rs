//! Rendering plugin - sky colour, fog and lighting from `VisualConfig`.
//!
//! Meshes and materials are plain Bevy primitives; this plugin only owns the
//! atmosphere settings shared by every camera.

use bevy::prelude::*;

use super::visual_config::{load_visual_config, VisualConfig};

/// Rendering plugin - loads the visual config and applies the sky colour.
pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        let defaults = VisualConfig::default();
        app.insert_resource(ClearColor(defaults.clear_color()))
            .insert_resource(defaults)
            .add_systems(Startup, load_visual_config);
        // Fog is a per-camera component; the player camera takes it from
        // VisualConfig::fog when spawned
    }
}
