//! Player movement, input capture and camera control.

use bevy::input::mouse::MouseMotion;
use bevy::prelude::*;
use bevy::window::{CursorGrabMode, PrimaryWindow};

use super::components::*;
use crate::combat::{Loadout, WeaponKind};
use crate::core::tuning::{CameraTuning, PlayerTuning};
use crate::core::{SimClock, SmoothFollow, Tuning};
use crate::rendering::VisualConfig;

/// Advance the player body by one logic step.
///
/// Horizontal velocity is rebuilt from the held keys every step; vertical
/// velocity carries over and is only changed by jumping, gravity, landing
/// and the floor.
pub fn integrate_motion(
    body: &mut PlayerBody,
    position: &mut Vec3,
    input: &MotionInput,
    tuning: &PlayerTuning,
    now_ms: f64,
) {
    body.velocity.x = 0.0;
    body.velocity.z = 0.0;

    let mut direction = Vec3::ZERO;
    if input.forward {
        direction += body.forward();
    }
    if input.back {
        direction -= body.forward();
    }
    if input.right {
        direction += body.right();
    }
    if input.left {
        direction -= body.right();
    }

    body.is_moving = direction.length_squared() > 1e-6;
    if body.is_moving {
        let speed = if input.sprint {
            tuning.move_speed * tuning.sprint_multiplier
        } else {
            tuning.move_speed
        };
        let step = direction.normalize() * speed;
        body.velocity.x = step.x;
        body.velocity.z = step.z;
    }

    let cooled_down = body
        .last_jump_ms
        .map_or(true, |last| now_ms - last >= tuning.jump_cooldown_ms);
    if input.jump && !body.is_jumping && cooled_down {
        body.velocity.y = tuning.jump_force;
        body.is_jumping = true;
        body.is_on_platform = false;
        body.last_jump_ms = Some(now_ms);
    }

    if !body.is_on_platform {
        body.velocity.y -= tuning.gravity;
    }

    let horizontal = Vec2::new(body.velocity.x, body.velocity.z);
    if horizontal.length() > tuning.max_speed {
        let clamped = horizontal.normalize() * tuning.max_speed;
        body.velocity.x = clamped.x;
        body.velocity.z = clamped.y;
    }

    *position += body.velocity;

    if position.y < tuning.floor_height {
        position.y = tuning.floor_height;
        body.velocity.y = 0.0;
        body.is_jumping = false;
        body.is_on_platform = false;
    }
}

/// Camera position and look-at point for the given mode.
pub fn camera_pose(
    mode: CameraMode,
    player_pos: Vec3,
    body: &PlayerBody,
    player: &PlayerTuning,
    camera: &CameraTuning,
) -> (Vec3, Vec3) {
    let eye = player_pos + Vec3::Y * player.eye_height;
    match mode {
        CameraMode::FirstPerson => (eye, eye + body.aim()),
        CameraMode::ThirdPerson => {
            let distance = camera.distance + body.pitch.max(0.0) * camera.pullback;
            let position = player_pos - body.forward() * distance + Vec3::Y * camera.height;
            (position, eye + body.aim())
        }
    }
}

/// Latch keyboard and mouse state for the next logic step.
pub fn read_player_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut input: ResMut<PlayerInput>,
) {
    // Physical key positions, so AZERTY players get ZQSD
    input.motion.forward = keyboard.pressed(KeyCode::KeyW);
    input.motion.back = keyboard.pressed(KeyCode::KeyS);
    input.motion.left = keyboard.pressed(KeyCode::KeyA);
    input.motion.right = keyboard.pressed(KeyCode::KeyD);
    input.motion.sprint = keyboard.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]);
    if keyboard.pressed(KeyCode::Space) {
        input.motion.jump = true;
    }

    if mouse.just_pressed(MouseButton::Left) {
        input.attack_pressed = true;
    }
    if mouse.just_released(MouseButton::Left) {
        input.attack_released = true;
    }

    if keyboard.just_pressed(KeyCode::KeyE) {
        input.weapon_switch = Some(WeaponSwitch::Next);
    } else if keyboard.just_pressed(KeyCode::KeyQ) {
        input.weapon_switch = Some(WeaponSwitch::Previous);
    } else if keyboard.just_pressed(KeyCode::Digit1) {
        input.weapon_switch = Some(WeaponSwitch::Select(WeaponKind::Sword));
    } else if keyboard.just_pressed(KeyCode::Digit2) {
        input.weapon_switch = Some(WeaponSwitch::Select(WeaponKind::Bow));
    }
}

/// Handle mouse movement for looking around.
pub fn mouse_look(
    mut mouse_motion: EventReader<MouseMotion>,
    tuning: Res<Tuning>,
    window_query: Query<&Window, With<PrimaryWindow>>,
    mut player_query: Query<&mut PlayerBody, With<Player>>,
) {
    let mut delta = Vec2::ZERO;
    for event in mouse_motion.read() {
        delta += event.delta;
    }

    if delta == Vec2::ZERO {
        return;
    }

    // Only steer while the cursor is captured
    if let Ok(window) = window_query.get_single() {
        if window.cursor_options.grab_mode == CursorGrabMode::None {
            return;
        }
    }

    let Ok(mut body) = player_query.get_single_mut() else {
        return;
    };

    let player = &tuning.player;
    body.yaw -= delta.x * player.mouse_sensitivity;
    body.pitch = (body.pitch - delta.y * player.mouse_sensitivity)
        .clamp(-player.max_pitch, player.max_pitch);
}

/// Integrate player motion for one logic step.
pub fn player_movement(
    mut input: ResMut<PlayerInput>,
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    mut query: Query<(&mut Transform, &mut PlayerBody), With<Player>>,
) {
    let motion = input.motion;
    input.motion.jump = false;

    let Ok((mut transform, mut body)) = query.get_single_mut() else {
        return;
    };

    let mut position = transform.translation;
    integrate_motion(&mut body, &mut position, &motion, &tuning.player, clock.elapsed_ms);
    transform.translation = position;
    transform.rotation = Quat::from_rotation_y(body.yaw);
}

/// Toggle between first- and third-person view.
pub fn toggle_view(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut camera_query: Query<&mut PlayerCamera>,
) {
    if !keyboard.just_pressed(KeyCode::KeyV) {
        return;
    }
    for mut camera in camera_query.iter_mut() {
        camera.mode = camera.mode.toggled();
        debug!("Camera mode: {:?}", camera.mode);
    }
}

/// Point the camera at the player's view every rendered frame.
pub fn update_camera(
    tuning: Res<Tuning>,
    mut player_query: Query<(&Transform, &PlayerBody, &mut Visibility), With<Player>>,
    mut camera_query: Query<(&PlayerCamera, &mut SmoothFollow), Without<Player>>,
) {
    let Ok((transform, body, mut visibility)) = player_query.get_single_mut() else {
        return;
    };
    let Ok((camera, mut follow)) = camera_query.get_single_mut() else {
        return;
    };

    let (position, focus) = camera_pose(
        camera.mode,
        transform.translation,
        body,
        &tuning.player,
        &tuning.camera,
    );
    follow.target = Some(position);
    follow.focus = Some(focus);

    // First person snaps to the eye and hides the body
    match camera.mode {
        CameraMode::FirstPerson => {
            follow.rate = 0.0;
            *visibility = Visibility::Hidden;
        }
        CameraMode::ThirdPerson => {
            follow.rate = tuning.camera.smoothing;
            *visibility = Visibility::Inherited;
        }
    }
}

/// Grab and hide cursor while the run is active.
pub fn grab_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::Locked;
        window.cursor_options.visible = false;
    }
}

/// Release cursor when the run pauses or ends.
pub fn release_cursor(mut window_query: Query<&mut Window, With<PrimaryWindow>>) {
    if let Ok(mut window) = window_query.get_single_mut() {
        window.cursor_options.grab_mode = CursorGrabMode::None;
        window.cursor_options.visible = true;
    }
}

/// Spawn the player entity and its camera.
pub fn spawn_player(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    position: Vec3,
    tuning: &Tuning,
    visual_config: &VisualConfig,
) -> Entity {
    let mode = if tuning.camera.first_person {
        CameraMode::FirstPerson
    } else {
        CameraMode::ThirdPerson
    };

    let player = commands
        .spawn((
            Name::new("Player"),
            Player,
            PlayerBody::default(),
            Loadout::from_tuning(&tuning.combat),
            Mesh3d(meshes.add(Capsule3d::new(0.4, 0.2))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: Color::srgb(0.2, 0.4, 0.9),
                ..default()
            })),
            Transform::from_translation(position),
            Visibility::default(),
        ))
        .id();

    let body = PlayerBody::default();
    let (eye, focus) = camera_pose(mode, position, &body, &tuning.player, &tuning.camera);

    // The camera is not parented so third person can lag behind smoothly
    commands.spawn((
        Name::new("Player Camera"),
        Camera3d::default(),
        visual_config.fog(),
        PlayerCamera { mode },
        SmoothFollow {
            target: Some(eye),
            focus: Some(focus),
            rate: 0.0,
        },
        Transform::from_translation(eye).looking_at(focus, Vec3::Y),
    ));

    player
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(body: &mut PlayerBody, position: &mut Vec3, input: MotionInput, now_ms: f64) {
        integrate_motion(body, position, &input, &PlayerTuning::default(), now_ms);
    }

    #[test]
    fn forward_moves_along_facing() {
        let mut body = PlayerBody::default();
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        step(
            &mut body,
            &mut position,
            MotionInput {
                forward: true,
                ..default()
            },
            0.0,
        );
        assert!((position.z - 0.12).abs() < 1e-6);
        assert!(position.x.abs() < 1e-6);
        assert!(body.is_moving);
    }

    #[test]
    fn sprint_is_faster_but_capped() {
        let tuning = PlayerTuning::default();
        let mut body = PlayerBody::default();
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        step(
            &mut body,
            &mut position,
            MotionInput {
                forward: true,
                right: true,
                sprint: true,
                ..default()
            },
            0.0,
        );
        let horizontal = Vec2::new(body.velocity.x, body.velocity.z).length();
        assert!((horizontal - tuning.move_speed * tuning.sprint_multiplier).abs() < 1e-5);
        assert!(horizontal <= tuning.max_speed);
    }

    #[test]
    fn releasing_keys_stops_horizontal_motion() {
        let mut body = PlayerBody {
            velocity: Vec3::new(0.3, 0.0, 0.3),
            ..default()
        };
        let mut position = Vec3::new(0.0, 1.0, 0.0);
        step(&mut body, &mut position, MotionInput::default(), 0.0);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 0.0);
        assert!(!body.is_moving);
    }

    #[test]
    fn jump_respects_cooldown() {
        let jump = MotionInput {
            jump: true,
            ..default()
        };
        let mut body = PlayerBody::default();
        let mut position = Vec3::new(0.0, 1.0, 0.0);

        step(&mut body, &mut position, jump, 0.0);
        assert!(body.is_jumping);
        assert!(position.y > 1.0);

        // Fall back down quickly
        while body.is_jumping {
            step(&mut body, &mut position, MotionInput::default(), 100.0);
        }
        assert_eq!(position.y, 1.0);

        step(&mut body, &mut position, jump, 400.0);
        assert!(!body.is_jumping);

        step(&mut body, &mut position, jump, 500.0);
        assert!(body.is_jumping);
    }

    #[test]
    fn floor_stops_fall() {
        let mut body = PlayerBody {
            velocity: Vec3::new(0.0, -2.0, 0.0),
            is_jumping: true,
            ..default()
        };
        let mut position = Vec3::new(0.0, 1.5, 0.0);
        step(&mut body, &mut position, MotionInput::default(), 0.0);
        assert_eq!(position.y, 1.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(!body.is_jumping);
    }

    #[test]
    fn platform_support_suspends_gravity() {
        let mut body = PlayerBody::default();
        body.set_on_platform(true);
        let mut position = Vec3::new(0.0, 5.0, 0.0);
        step(&mut body, &mut position, MotionInput::default(), 0.0);
        assert_eq!(position.y, 5.0);
    }

    #[test]
    fn third_person_pulls_back_when_looking_up() {
        let player = PlayerTuning::default();
        let camera = CameraTuning::default();
        let level = PlayerBody::default();
        let up = PlayerBody {
            pitch: 0.5,
            ..default()
        };
        let (flat, _) = camera_pose(CameraMode::ThirdPerson, Vec3::ZERO, &level, &player, &camera);
        let (raised, _) = camera_pose(CameraMode::ThirdPerson, Vec3::ZERO, &up, &player, &camera);
        assert!((flat.z + camera.distance).abs() < 1e-5);
        assert!((raised.z + camera.distance + 0.5 * camera.pullback).abs() < 1e-5);
        assert_eq!(flat.y, camera.height);
    }

    #[test]
    fn first_person_sits_at_eye() {
        let player = PlayerTuning::default();
        let (position, focus) = camera_pose(
            CameraMode::FirstPerson,
            Vec3::new(1.0, 2.0, 3.0),
            &PlayerBody::default(),
            &player,
            &CameraTuning::default(),
        );
        assert_eq!(position, Vec3::new(1.0, 2.0 + player.eye_height, 3.0));
        assert_eq!(focus - position, Vec3::Z);
    }
}
