//! UI plugin - menus, HUD, health bars and the results screen.

use bevy::prelude::*;

use super::{health_bars, hud};
use crate::core::{GameOutcome, GameState, LevelSession, LevelSet, LevelStart};
use crate::scoreboard::HighScores;

/// UI plugin - handles all user interface.
pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        hud::setup_hud_systems(app);
        health_bars::setup_health_bar_systems(app);

        app
            // Level decorations
            .add_systems(LevelStart, hud::spawn_hud.in_set(LevelSet::Spawn))
            .add_systems(
                LevelStart,
                health_bars::attach_health_bars.in_set(LevelSet::Decorate),
            )

            // Menu buttons behave the same on every screen
            .add_systems(
                Update,
                menu_button_input.run_if(
                    in_state(GameState::MainMenu)
                        .or(in_state(GameState::Paused))
                        .or(in_state(GameState::GameOver)),
                ),
            )

            // Main menu
            .add_systems(OnEnter(GameState::MainMenu), setup_main_menu)
            .add_systems(OnExit(GameState::MainMenu), despawn_all::<MainMenuUi>)

            // Pause menu
            .add_systems(OnEnter(GameState::Paused), setup_pause_menu)
            .add_systems(OnExit(GameState::Paused), despawn_all::<PauseMenuUi>)

            // Game over
            .add_systems(OnEnter(GameState::GameOver), setup_game_over)
            .add_systems(OnExit(GameState::GameOver), despawn_all::<GameOverUi>);
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

/// Marker for menu buttons.
#[derive(Component, Clone, Copy)]
enum MenuButton {
    NewGame,
    Quit,
    Resume,
    MainMenu,
    Retry,
}

const BUTTON_IDLE: Color = Color::srgb(0.15, 0.15, 0.2);
const BUTTON_HOVER: Color = Color::srgb(0.25, 0.25, 0.3);
const BUTTON_PRESSED: Color = Color::srgb(0.3, 0.3, 0.35);

/// Full-screen column that centres its children.
fn overlay(background: Color) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(background),
    )
}

fn spawn_label(parent: &mut ChildBuilder, text: impl Into<String>, size: f32, color: Color, gap: f32) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(gap)),
            ..default()
        },
    ));
}

/// Set up the main menu.
fn setup_main_menu(mut commands: Commands) {
    commands
        .spawn((overlay(Color::srgb(0.05, 0.05, 0.08)), MainMenuUi))
        .with_children(|parent| {
            spawn_label(parent, "REBEL ASSAULT", 80.0, Color::srgb(0.8, 0.7, 0.6), 20.0);
            spawn_label(
                parent,
                "Arrows move, Shift runs, Space jumps, Down crouches, Z shoots",
                20.0,
                Color::srgb(0.5, 0.5, 0.55),
                50.0,
            );

            spawn_menu_button(parent, "New Game", MenuButton::NewGame);
            spawn_menu_button(parent, "Quit", MenuButton::Quit);
        });
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

/// Handle menu button interactions.
fn menu_button_input(
    mut interaction_query: Query<
        (&Interaction, &MenuButton, &mut BackgroundColor),
        (Changed<Interaction>, With<Button>),
    >,
    mut next_state: ResMut<NextState<GameState>>,
    mut exit: EventWriter<AppExit>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match interaction {
            Interaction::Pressed => {
                *bg_color = BUTTON_PRESSED.into();
                match button {
                    MenuButton::NewGame | MenuButton::Retry | MenuButton::Resume => {
                        next_state.set(GameState::InGame);
                    }
                    MenuButton::MainMenu => {
                        next_state.set(GameState::MainMenu);
                    }
                    MenuButton::Quit => {
                        exit.send(AppExit::Success);
                    }
                }
            }
            Interaction::Hovered => {
                *bg_color = BUTTON_HOVER.into();
            }
            Interaction::None => {
                *bg_color = BUTTON_IDLE.into();
            }
        }
    }
}

/// Set up the pause menu.
fn setup_pause_menu(mut commands: Commands) {
    commands
        .spawn((overlay(Color::srgba(0.0, 0.0, 0.0, 0.7)), PauseMenuUi))
        .with_children(|parent| {
            spawn_label(parent, "PAUSED", 48.0, Color::srgb(0.8, 0.8, 0.85), 40.0);

            spawn_menu_button(parent, "Resume", MenuButton::Resume);
            spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
        });
}

/// Headline and colour for the results screen.
fn outcome_banner(outcome: Option<GameOutcome>) -> (&'static str, Color) {
    match outcome {
        Some(GameOutcome::LevelComplete) => ("LEVEL COMPLETE", Color::srgb(0.3, 0.8, 0.4)),
        Some(GameOutcome::PlayerDied) | None => ("YOU DIED", Color::srgb(0.8, 0.2, 0.2)),
    }
}

/// Set up the game over screen with the final score and the high-score table.
fn setup_game_over(
    mut commands: Commands,
    session: Res<LevelSession>,
    high_scores: Res<HighScores>,
) {
    let (headline, color) = outcome_banner(session.outcome());
    let final_score = session.final_score().unwrap_or(session.score);

    commands
        .spawn((overlay(Color::srgba(0.05, 0.0, 0.0, 0.9)), GameOverUi))
        .with_children(|parent| {
            spawn_label(parent, headline, 72.0, color, 20.0);
            spawn_label(
                parent,
                format!("Final score: {}", final_score),
                32.0,
                Color::srgb(0.9, 0.9, 0.9),
                30.0,
            );

            if !high_scores.entries.is_empty() {
                spawn_label(parent, "High Scores", 24.0, Color::srgb(0.8, 0.7, 0.6), 8.0);
                for (rank, entry) in high_scores.entries.iter().enumerate() {
                    spawn_label(
                        parent,
                        format!("{:>2}. {:<16} {:>7}", rank + 1, entry.name, entry.score),
                        18.0,
                        Color::srgb(0.7, 0.7, 0.75),
                        2.0,
                    );
                }
            }

            spawn_menu_button(parent, "Retry", MenuButton::Retry);
            spawn_menu_button(parent, "Main Menu", MenuButton::MainMenu);
        });
}

/// Remove every entity carrying marker `M`.
fn despawn_all<M: Component>(mut commands: Commands, query: Query<Entity, With<M>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}
