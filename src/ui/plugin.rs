//! UI plugin - menus, HUD, and interface elements.

use bevy::prelude::*;

use super::hud;
use crate::core::{GameState, PlayState};

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        // Setup HUD systems
        hud::setup_hud_systems(app);

        app
            // Main menu
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), cleanup_ui::<MainMenuUi>)

            // Pause menu
            .add_systems(OnEnter(PlayState::Paused), setup_pause_menu)
            .add_systems(OnExit(PlayState::Paused), cleanup_ui::<PauseMenuUi>)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), cleanup_ui::<GameOverUi>)

            // Victory
            .add_systems(OnEnter(GameState::Victory), setup_victory)
            .add_systems(OnExit(GameState::Victory), cleanup_ui::<VictoryUi>)

            // Buttons only exist while a menu is up
            .add_systems(Update, menu_button_input);
    }
}

/// Marker for main menu UI entities.
#[derive(Component)]
struct MainMenuUi;

/// Marker for pause menu UI entities.
#[derive(Component)]
struct PauseMenuUi;

/// Marker for game over UI entities.
#[derive(Component)]
struct GameOverUi;

/// Marker for victory UI entities.
#[derive(Component)]
struct VictoryUi;

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVERED: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// What a menu button does when pressed.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuButton {
    /// Start (or restart) a run
    Play,
    Resume,
    MainMenu,
    Quit,
}

/// Spawn a full-screen overlay with a title, optional subtitle, and buttons.
fn spawn_overlay<M: Component>(
    commands: &mut Commands,
    marker: M,
    background: Color,
    title: (&str, f32, Color),
    subtitle: Option<&str>,
    buttons: &[(&str, MenuButton)],
) {
    let (title, title_size, title_color) = title;
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(background),
            marker,
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(title),
                TextFont {
                    font_size: title_size,
                    ..default()
                },
                TextColor(title_color),
                Node {
                    margin: UiRect::bottom(Val::Px(40.0)),
                    ..default()
                },
            ));

            if let Some(subtitle) = subtitle {
                parent.spawn((
                    Text::new(subtitle),
                    TextFont {
                        font_size: 20.0,
                        ..default()
                    },
                    TextColor(Color::srgb(0.85, 0.9, 0.95)),
                    Node {
                        margin: UiRect::bottom(Val::Px(40.0)),
                        ..default()
                    },
                ));
            }

            for (label, button) in buttons {
                spawn_menu_button(parent, label, *button);
            }
        });
}

/// Set up the main menu.
fn setup_main_menu(mut commands: Commands) {
    // No game camera exists on the title screen
    commands.spawn((Camera2d, MainMenuUi));

    spawn_overlay(
        &mut commands,
        MainMenuUi,
        Color::srgb(0.45, 0.7, 0.88),
        ("CLOUD BOUNCE", 80.0, Color::WHITE),
        Some("WASD move, Space jump, mouse to aim and attack, Q/E or 1/2 switch weapon, V toggles view"),
        &[("Play", MenuButton::Play), ("Quit", MenuButton::Quit)],
    );
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        PauseMenuUi,
        Color::srgba(0.0, 0.0, 0.0, 0.6),
        ("PAUSED", 48.0, Color::srgb(0.8, 0.8, 0.85)),
        None,
        &[
            ("Resume", MenuButton::Resume),
            ("Main Menu", MenuButton::MainMenu),
        ],
    );
}

/// Set up the game over screen. The world stays visible behind it.
fn setup_game_over(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        GameOverUi,
        Color::srgba(0.1, 0.0, 0.0, 0.75),
        ("GAME OVER", 72.0, Color::srgb(0.85, 0.2, 0.2)),
        None,
        &[
            ("Restart", MenuButton::Play),
            ("Main Menu", MenuButton::MainMenu),
        ],
    );
}

/// Set up the victory screen.
fn setup_victory(mut commands: Commands) {
    spawn_overlay(
        &mut commands,
        VictoryUi,
        Color::srgba(0.0, 0.05, 0.1, 0.6),
        ("Victory!", 72.0, Color::srgb(1.0, 0.85, 0.2)),
        Some("You reached the gate."),
        &[
            ("Play Again", MenuButton::Play),
            ("Main Menu", MenuButton::MainMenu),
        ],
    );
}

/// Helper to spawn a menu button.
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, button: MenuButton) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(200.0),
                height: Val::Px(50.0),
                margin: UiRect::all(Val::Px(10.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(BUTTON_IDLE),
            button,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(text),
                TextFont {
                    font_size: 24.0,
                    ..default()
                },
                TextColor(Color::srgb(0.8, 0.8, 0.85)),
            ));
        });
}

/// Handle menu button interactions on every screen.
fn menu_button_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_game_state: ResMut<NextState<GameState>>,
    mut next_play_state: ResMut<NextState<PlayState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::Play => next_game_state.set(GameState::InGame),
                    MenuButton::Resume => next_play_state.set(PlayState::Running),
                    MenuButton::MainMenu => next_game_state.set(GameState::MainMenu),
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVERED.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Clean up every entity of one screen.
fn cleanup_ui<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    fn menu_world() -> World {
        let mut world = World::new();
        world.init_resource::<NextState<GameState>>();
        world.init_resource::<NextState<PlayState>>();
        world.init_resource::<Events<AppExit>>();
        world
    }

    #[test]
    fn pressing_play_starts_a_run() {
        let mut world = menu_world();
        world.spawn((
            Button,
            Interaction::Pressed,
            MenuButton::Play,
            BackgroundColor(BUTTON_IDLE),
        ));
        world.run_system_once(menu_button_input).unwrap();

        assert!(matches!(
            world.resource::<NextState<GameState>>(),
            NextState::Pending(GameState::InGame)
        ));
        assert!(matches!(
            world.resource::<NextState<PlayState>>(),
            NextState::Unchanged
        ));
    }

    #[test]
    fn pressing_resume_unpauses() {
        let mut world = menu_world();
        world.spawn((
            Button,
            Interaction::Pressed,
            MenuButton::Resume,
            BackgroundColor(BUTTON_IDLE),
        ));
        world.run_system_once(menu_button_input).unwrap();

        assert!(matches!(
            world.resource::<NextState<PlayState>>(),
            NextState::Pending(PlayState::Running)
        ));
    }

    #[test]
    fn hovering_highlights_without_transition() {
        let mut world = menu_world();
        let button = world
            .spawn((
                Button,
                Interaction::Hovered,
                MenuButton::MainMenu,
                BackgroundColor(BUTTON_IDLE),
            ))
            .id();
        world.run_system_once(menu_button_input).unwrap();

        assert_eq!(world.get::<BackgroundColor>(button).unwrap().0, BUTTON_HOVERED);
        assert!(matches!(
            world.resource::<NextState<GameState>>(),
            NextState::Unchanged
        ));
    }

    #[test]
    fn main_menu_spawns_camera_and_buttons() {
        let mut world = World::new();
        world.run_system_once(setup_main_menu).unwrap();

        let buttons = world.query::<&MenuButton>().iter(&world).count();
        assert_eq!(buttons, 2);
        let cameras = world
            .query_filtered::<Entity, (With<Camera2d>, With<MainMenuUi>)>()
            .iter(&world)
            .count();
        assert_eq!(cameras, 1);
    }
}
