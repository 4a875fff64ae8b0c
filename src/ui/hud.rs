//! In-game HUD - score and level clock.

use bevy::prelude::*;

use crate::core::{format_clock, LevelEntity, LevelSession, LogicSet, LogicTick};

/// Marker for HUD root entity.
#[derive(Component)]
pub struct HudRoot;

/// Marker for the score readout.
#[derive(Component)]
pub struct ScoreText;

/// Marker for the level clock readout.
#[derive(Component)]
pub struct TimerText;

pub fn score_label(score: u32) -> String {
    format!("Score: {}", score)
}

/// Setup HUD systems.
pub fn setup_hud_systems(app: &mut App) {
    app.add_systems(LogicTick, update_hud_text.in_set(LogicSet::Present));
}

/// Spawn the HUD UI.
pub fn spawn_hud(mut commands: Commands) {
    // HUD root container (top-left corner)
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Start,
                align_items: AlignItems::Start,
                padding: UiRect::all(Val::Px(20.0)),
                ..default()
            },
            HudRoot,
            LevelEntity,
        ))
        .with_children(|parent| {
            spawn_readout(parent, score_label(0), ScoreText);
            spawn_readout(parent, format_clock(0), TimerText);
        });
}

fn spawn_readout<M: Component>(parent: &mut ChildBuilder, text: String, marker: M) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgb(0.9, 0.9, 0.9)),
        Node {
            margin: UiRect::bottom(Val::Px(5.0)),
            ..default()
        },
        marker,
    ));
}

/// Refresh score and clock text from the session.
fn update_hud_text(
    session: Res<LevelSession>,
    mut score_query: Query<&mut Text, (With<ScoreText>, Without<TimerText>)>,
    mut timer_query: Query<&mut Text, (With<TimerText>, Without<ScoreText>)>,
) {
    if let Ok(mut text) = score_query.get_single_mut() {
        text.0 = score_label(session.score);
    }
    if let Ok(mut text) = timer_query.get_single_mut() {
        text.0 = format_clock(session.elapsed_secs());
    }
}
