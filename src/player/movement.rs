//! Player movement, map-scroll coupling and level completion.

use bevy::prelude::*;

use super::components::*;
use crate::camera::MapScroll;
use crate::combat::Dead;
use crate::core::{
    Character, EntityState, GameConfig, GameEndedEvent, GameOutcome, LevelEntity, LevelSession,
    LogicSet, LogicTick, MapConfig, SimulationClock,
};
use crate::rendering::{screen_to_translation, SpriteLayer};

/// Set up player movement systems.
pub fn setup_movement_systems(app: &mut App) {
    app.add_systems(LogicTick, couple_scroll_to_player.in_set(LogicSet::Movement))
        .add_systems(LogicTick, check_level_complete.in_set(LogicSet::Progress))
        .add_systems(LogicTick, tick_player.in_set(LogicSet::Player));
}

/// Pixels the map (or the player, before the scroll zone) moves this tick.
pub fn scroll_amount(speed: i32, step_secs: f32, map: &MapConfig) -> i32 {
    (speed as f32 * step_secs * map.scroll_factor) as i32
}

/// Spawn the player at the start of a level.
pub fn spawn_player(mut commands: Commands, config: Res<GameConfig>) {
    let tuning = &config.player;
    let position = IVec2::new(tuning.spawn.0, tuning.spawn.1);
    let size = IVec2::new(tuning.size.0, tuning.size.1);

    commands.spawn((
        player_bundle(tuning),
        LevelEntity,
        Sprite::from_color(Color::srgb(0.3, 0.55, 0.9), size.as_vec2()),
        Transform::from_translation(screen_to_translation(
            position,
            size,
            &config.viewport,
            SpriteLayer::Player.z(),
        )),
    ));
    info!("Player spawned at ({}, {})", position.x, position.y);
}

/// Move the player or scroll the map, depending on where the player stands.
///
/// Heading right, the player walks until it reaches the scroll zone and from
/// then on the map scrolls under it. Heading left, the map scrolls back while
/// the player is inside the zone on screen and there is map left to reveal.
fn couple_scroll_to_player(
    config: Res<GameConfig>,
    clock: Res<SimulationClock>,
    mut scroll: ResMut<MapScroll>,
    mut player_query: Query<(&mut PlayerController, &mut EntityState, &Character), With<Player>>,
) {
    let Ok((mut controller, mut body, character)) = player_query.get_single_mut() else {
        return;
    };
    if !body.active || !controller.is_moving() {
        return;
    }

    let speed = controller.current_speed(character.speed);
    let amount = scroll_amount(speed, clock.logic_step_secs(), &config.map);
    let zone = config.map.scroll_zone;

    if controller.moving_right {
        if body.position.x >= zone {
            scroll.scroll(amount);
        } else {
            controller.move_right(&mut body, amount);
        }
    } else if controller.moving_left {
        let visual_x = scroll.screen_x(body.position.x);
        if visual_x <= zone && scroll.offset() > 0 {
            scroll.scroll(-amount);
        } else if body.position.x > 0 {
            controller.move_left(&mut body, amount);
        }
    }
}

/// End the level once the player is close enough to the end of the map.
fn check_level_complete(
    config: Res<GameConfig>,
    mut session: ResMut<LevelSession>,
    player_query: Query<&EntityState, With<Player>>,
    mut ended_events: EventWriter<GameEndedEvent>,
) {
    let Ok(body) = player_query.get_single() else {
        return;
    };

    if body.position.x < config.map.width - config.map.level_end_margin {
        return;
    }

    if let Some(final_score) = session.finish(GameOutcome::LevelComplete, &config.level) {
        ended_events.send(GameEndedEvent {
            outcome: GameOutcome::LevelComplete,
            final_score,
        });
    }
}

/// Advance the player's kinematics and animation.
fn tick_player(
    mut player_query: Query<(&mut PlayerController, &mut EntityState, &Character), (With<Player>, Without<Dead>)>,
) {
    for (mut controller, mut body, character) in player_query.iter_mut() {
        if !body.active {
            continue;
        }
        controller.tick(&mut body, character);
    }
}
