//! In-game HUD - health, experience, score, weapon and feedback text.

use bevy::prelude::*;
use std::collections::HashSet;

use crate::combat::{Health, Loadout, WeaponKind};
use crate::combat::weapons::charge_ratio;
use crate::core::{
    ExperienceEvent, GameState, LevelUpEvent, PlayerHitEvent, PlayerStats, SimClock, Tuning,
};
use crate::enemies::Enemy;
use crate::objects::ScoreBoard;
use crate::player::{Player, PlayerCamera};

/// Seconds a feedback text stays on screen.
const FLOATING_TEXT_SECS: f32 = 1.2;

/// How far feedback text rises over its life (percent of screen height).
const FLOATING_TEXT_RISE: f32 = 8.0;

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for health bar fill.
#[derive(Component)]
pub struct HealthBar;

/// Marker for experience bar fill.
#[derive(Component)]
pub struct ExperienceBar;

/// Which stat a HUD text line shows.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudText {
    Health,
    Experience,
    Level,
    Score,
    Weapon,
    Arrows,
}

/// Container of the bow charge meter.
#[derive(Component)]
pub struct ChargeMeter;

/// Fill of the bow charge meter.
#[derive(Component)]
pub struct ChargeFill;

/// Screen-space health bar that tracks an enemy.
#[derive(Component)]
pub struct EnemyHealthBar {
    pub enemy: Entity,
}

/// Fill of an enemy health bar.
#[derive(Component)]
pub struct EnemyHealthFill;

/// Text that rises, fades and disappears.
#[derive(Component)]
pub struct FloatingText {
    pub timer: Timer,
    /// Starting height in percent of the screen
    pub top: f32,
    pub color: Color,
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_hud)
        .add_systems(OnExit(GameState::InGame), cleanup_hud)
        .add_systems(
            Update,
            (
                update_stat_bars,
                update_hud_text,
                update_charge_meter,
                spawn_enemy_health_bars,
                update_enemy_health_bars,
                spawn_feedback_text,
                animate_floating_text,
            )
                .run_if(in_state(GameState::InGame)),
        );
}

/// Spawn the HUD UI.
fn spawn_hud(mut commands: Commands) {
    // Stats column (top-left corner)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                left: Val::Px(20.0),
                top: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Start,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            spawn_bar(parent, "HP", Color::srgb(0.85, 0.2, 0.2), HealthBar, HudText::Health);
            spawn_bar(
                parent,
                "EXP",
                Color::srgb(0.3, 0.6, 1.0),
                ExperienceBar,
                HudText::Experience,
            );
            spawn_text(parent, HudText::Level, 18.0);
            spawn_text(parent, HudText::Score, 18.0);
        });

    // Weapon panel (bottom-right corner)
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(20.0),
                bottom: Val::Px(20.0),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::End,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            // Charge meter, only shown while drawing the bow
            parent
                .spawn((
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(8.0),
                        margin: UiRect::bottom(Val::Px(6.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
                    Visibility::Hidden,
                    ChargeMeter,
                ))
                .with_children(|meter| {
                    meter.spawn((
                        Node {
                            width: Val::Percent(0.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(Color::srgb(1.0, 0.85, 0.2)),
                        ChargeFill,
                    ));
                });
            spawn_text(parent, HudText::Weapon, 20.0);
            spawn_text(parent, HudText::Arrows, 18.0);
        });

    // Crosshair (center of screen)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                position_type: PositionType::Absolute,
                ..default()
            },
            HudRoot,
        ))
        .with_children(|parent| {
            parent.spawn((
                Node {
                    width: Val::Px(4.0),
                    height: Val::Px(4.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(1.0, 1.0, 1.0, 0.7)),
            ));
        });
}

/// Helper to spawn a status bar with a value label.
fn spawn_bar<M: Component>(
    parent: &mut ChildBuilder,
    label: &str,
    color: Color,
    bar_marker: M,
    text: HudText,
) {
    parent
        .spawn(Node {
            flex_direction: FlexDirection::Row,
            align_items: AlignItems::Center,
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        })
        .with_children(|bar_parent| {
            // Label
            bar_parent.spawn((
                Text::new(label),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::srgb(0.95, 0.95, 0.95)),
                Node {
                    width: Val::Px(40.0),
                    ..default()
                },
            ));

            // Bar background
            bar_parent
                .spawn((
                    Node {
                        width: Val::Px(180.0),
                        height: Val::Px(12.0),
                        margin: UiRect::right(Val::Px(8.0)),
                        ..default()
                    },
                    BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.5)),
                ))
                .with_children(|bg| {
                    bg.spawn((
                        Node {
                            width: Val::Percent(100.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(color),
                        bar_marker,
                    ));
                });

            bar_parent.spawn((
                Text::new(""),
                TextFont {
                    font_size: 14.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                text,
            ));
        });
}

fn spawn_text(parent: &mut ChildBuilder, kind: HudText, size: f32) {
    parent.spawn((
        Text::new(""),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(Color::WHITE),
        kind,
    ));
}

/// Text for one HUD line.
pub fn hud_line(kind: HudText, stats: &PlayerStats, score: u32, loadout: Option<&Loadout>) -> String {
    match kind {
        HudText::Health => format!(
            "HP: {}/{}",
            stats.health.max(0.0).round(),
            stats.max_health.round()
        ),
        HudText::Experience => format!("EXP: {}/{}", stats.exp, stats.exp_to_next_level),
        HudText::Level => format!("Level {}", stats.level),
        HudText::Score => format!("Score: {}", score),
        HudText::Weapon => {
            let weapon = loadout.map_or(WeaponKind::default(), |l| l.equipped);
            format!("Weapon: {}", weapon.label())
        }
        HudText::Arrows => match loadout {
            Some(l) => format!("Arrows: {}/{}", l.arrows, l.max_arrows),
            None => String::new(),
        },
    }
}

/// Resize health and experience bars.
fn update_stat_bars(
    stats: Res<PlayerStats>,
    mut health_query: Query<&mut Node, (With<HealthBar>, Without<ExperienceBar>)>,
    mut exp_query: Query<&mut Node, (With<ExperienceBar>, Without<HealthBar>)>,
) {
    if !stats.is_changed() {
        return;
    }
    if let Ok(mut bar) = health_query.get_single_mut() {
        bar.width = Val::Percent(stats.health_fraction() * 100.0);
    }
    if let Ok(mut bar) = exp_query.get_single_mut() {
        bar.width = Val::Percent(stats.exp_fraction() * 100.0);
    }
}

/// Refresh HUD text lines.
fn update_hud_text(
    stats: Res<PlayerStats>,
    score: Res<ScoreBoard>,
    player_query: Query<&Loadout, With<Player>>,
    mut text_query: Query<(&mut Text, &HudText)>,
) {
    let loadout = player_query.get_single().ok();
    for (mut text, kind) in text_query.iter_mut() {
        let line = hud_line(*kind, &stats, score.score, loadout);
        if text.0 != line {
            text.0 = line;
        }
    }
}

/// Show the bow charge while the button is held.
fn update_charge_meter(
    clock: Res<SimClock>,
    tuning: Res<Tuning>,
    player_query: Query<&Loadout, With<Player>>,
    mut meter_query: Query<&mut Visibility, With<ChargeMeter>>,
    mut fill_query: Query<&mut Node, With<ChargeFill>>,
) {
    let charge = player_query
        .get_single()
        .ok()
        .and_then(|loadout| loadout.charge_started_ms)
        .map(|started| charge_ratio(clock.since(started), tuning.combat.max_charge_ms));

    if let Ok(mut visibility) = meter_query.get_single_mut() {
        *visibility = if charge.is_some() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
    }
    if let (Some(ratio), Ok(mut fill)) = (charge, fill_query.get_single_mut()) {
        fill.width = Val::Percent(ratio * 100.0);
    }
}

/// Give each enemy a floating health bar.
fn spawn_enemy_health_bars(
    mut commands: Commands,
    enemy_query: Query<Entity, With<Enemy>>,
    bar_query: Query<&EnemyHealthBar>,
) {
    let tracked: HashSet<Entity> = bar_query.iter().map(|bar| bar.enemy).collect();
    for enemy in enemy_query.iter() {
        if tracked.contains(&enemy) {
            continue;
        }
        commands
            .spawn((
                Node {
                    position_type: PositionType::Absolute,
                    width: Val::Px(50.0),
                    height: Val::Px(6.0),
                    ..default()
                },
                BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
                Visibility::Hidden,
                EnemyHealthBar { enemy },
                HudRoot,
            ))
            .with_children(|bar| {
                bar.spawn((
                    Node {
                        width: Val::Percent(100.0),
                        height: Val::Percent(100.0),
                        ..default()
                    },
                    BackgroundColor(Color::srgb(0.9, 0.1, 0.1)),
                    EnemyHealthFill,
                ));
            });
    }
}

/// Place enemy health bars above their enemies on screen.
fn update_enemy_health_bars(
    mut commands: Commands,
    camera_query: Query<(&Camera, &GlobalTransform), With<PlayerCamera>>,
    enemy_query: Query<(&GlobalTransform, &Health), With<Enemy>>,
    mut bar_query: Query<(Entity, &EnemyHealthBar, &mut Node, &mut Visibility, &Children)>,
    mut fill_query: Query<&mut Node, (With<EnemyHealthFill>, Without<EnemyHealthBar>)>,
) {
    let camera = camera_query.get_single().ok();

    for (bar_entity, bar, mut node, mut visibility, children) in bar_query.iter_mut() {
        let Ok((enemy_transform, health)) = enemy_query.get(bar.enemy) else {
            commands.entity(bar_entity).despawn_recursive();
            continue;
        };

        let anchor = enemy_transform.translation() + Vec3::Y * 0.9;
        let screen = camera.and_then(|(camera, camera_transform)| {
            camera.world_to_viewport(camera_transform, anchor).ok()
        });

        match screen {
            Some(position) => {
                node.left = Val::Px(position.x - 25.0);
                node.top = Val::Px(position.y - 3.0);
                *visibility = Visibility::Inherited;
            }
            None => *visibility = Visibility::Hidden,
        }

        for &child in children.iter() {
            if let Ok(mut fill) = fill_query.get_mut(child) {
                fill.width = Val::Percent(health.percentage() * 100.0);
            }
        }
    }
}

fn spawn_floating_text(commands: &mut Commands, text: String, top: f32, color: Color) {
    commands.spawn((
        Text::new(text),
        TextFont {
            font_size: 26.0,
            ..default()
        },
        TextColor(color),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Percent(46.0),
            top: Val::Percent(top),
            ..default()
        },
        FloatingText {
            timer: Timer::from_seconds(FLOATING_TEXT_SECS, TimerMode::Once),
            top,
            color,
        },
        HudRoot,
    ));
}

/// Turn damage, experience and level-up events into floating text.
fn spawn_feedback_text(
    mut commands: Commands,
    mut hits: EventReader<PlayerHitEvent>,
    mut experience: EventReader<ExperienceEvent>,
    mut level_ups: EventReader<LevelUpEvent>,
) {
    for hit in hits.read() {
        spawn_floating_text(
            &mut commands,
            format!("-{}", hit.amount.round()),
            55.0,
            Color::srgb(1.0, 0.25, 0.25),
        );
    }
    for event in experience.read() {
        spawn_floating_text(
            &mut commands,
            format!("+{} EXP", event.amount),
            40.0,
            Color::srgb(0.5, 0.8, 1.0),
        );
    }
    for _ in level_ups.read() {
        spawn_floating_text(
            &mut commands,
            "LEVEL UP!".to_string(),
            30.0,
            Color::srgb(1.0, 0.85, 0.2),
        );
    }
}

/// Rise and alpha of feedback text `progress` (0..1) through its life.
pub fn floating_text_pose(progress: f32) -> (f32, f32) {
    let progress = progress.clamp(0.0, 1.0);
    (progress * FLOATING_TEXT_RISE, 1.0 - progress)
}

/// Move feedback text up, fade it, and remove it once done.
fn animate_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FloatingText, &mut Node, &mut TextColor)>,
) {
    for (entity, mut floating, mut node, mut color) in query.iter_mut() {
        floating.timer.tick(time.delta());
        if floating.timer.finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        let (rise, alpha) = floating_text_pose(floating.timer.fraction());
        node.top = Val::Percent(floating.top - rise);
        color.0 = floating.color.with_alpha(alpha);
    }
}

/// Clean up HUD entities.
fn cleanup_hud(mut commands: Commands, query: Query<Entity, With<HudRoot>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
