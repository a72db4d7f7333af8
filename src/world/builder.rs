//! Level construction from data definitions.

use bevy::prelude::*;

use super::components::{FinishGate, LevelGeometry, Platform, PlatformMotion};
use super::data::{LevelDefinition, PlatformDef, PlatformShape};
use super::materials::TerrainMaterials;
use crate::rendering::VisualConfig;

/// Build a level from a level definition.
///
/// Returns the player spawn position.
pub fn build_level_from_data(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    level: &LevelDefinition,
    visual_config: &VisualConfig,
) -> Vec3 {
    let palette = TerrainMaterials::new(materials);

    setup_environment(commands, visual_config);
    spawn_ground(commands, meshes, &palette, level.ground_size);

    for (index, platform) in level.platforms.iter().enumerate() {
        spawn_platform(commands, meshes, &palette, index, platform);
    }

    spawn_finish_gate(commands, meshes, &palette, level.finish_gate());

    level.player_start()
}

/// Set up global ambient light and the sun.
fn setup_environment(commands: &mut Commands, visual_config: &VisualConfig) {
    let (r, g, b) = visual_config.ambient_color;
    commands.insert_resource(AmbientLight {
        color: Color::srgb(r, g, b),
        brightness: visual_config.ambient_brightness,
    });

    let (r, g, b) = visual_config.sun_color;
    commands.spawn((
        DirectionalLight {
            color: Color::srgb(r, g, b),
            illuminance: visual_config.sun_illuminance,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::XYZ,
            -std::f32::consts::FRAC_PI_4,
            std::f32::consts::FRAC_PI_6,
            0.0,
        )),
        LevelGeometry,
    ));
}

fn spawn_ground(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &TerrainMaterials,
    size: f32,
) {
    commands.spawn((
        Name::new("Ground"),
        Mesh3d(meshes.add(Plane3d::default().mesh().size(size, size))),
        MeshMaterial3d(palette.ground.clone()),
        Transform::IDENTITY,
        Platform::new(Vec3::new(size, 0.0, size)),
        LevelGeometry,
    ));
}

fn spawn_platform(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &TerrainMaterials,
    index: usize,
    def: &PlatformDef,
) {
    let position = Vec3::from(def.position);
    let extents = def.size.map(Vec3::from);
    // Unsized platforms still get a visible body
    let visual_size = extents.unwrap_or(Vec3::new(2.0, 0.5, 2.0));

    let (mesh, scale) = match def.shape {
        PlatformShape::Slab => (
            meshes.add(Cuboid::new(visual_size.x, visual_size.y, visual_size.z)),
            Vec3::ONE,
        ),
        PlatformShape::Cloud => (meshes.add(Sphere::new(0.5).mesh().uv(24, 12)), visual_size),
    };

    let mut entity = commands.spawn((
        Name::new(format!("Platform {}", index)),
        Mesh3d(mesh),
        MeshMaterial3d(palette.for_shape(def.shape)),
        Transform::from_translation(position).with_scale(scale),
        Platform { extents },
        LevelGeometry,
    ));

    if let Some(bob) = def.bob {
        entity.insert(PlatformMotion::Bob {
            base_y: position.y,
            amplitude: bob.amplitude,
            speed: bob.speed,
            phase: bob.phase,
        });
    }
}

fn spawn_finish_gate(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    palette: &TerrainMaterials,
    position: Vec3,
) {
    // Ring standing upright, facing along z
    commands.spawn((
        Name::new("Finish Gate"),
        Mesh3d(meshes.add(Torus::new(1.5, 2.0))),
        MeshMaterial3d(palette.gate.clone()),
        Transform::from_translation(position)
            .with_rotation(Quat::from_rotation_x(std::f32::consts::FRAC_PI_2)),
        FinishGate,
        LevelGeometry,
    ));
}
