//! Enemy AI behavior systems.
//!
//! Run once per logic tick, in order: cooldowns, decisions and movement,
//! bullet flight, then animation (which is where attacks fire).

use bevy::prelude::*;

use super::components::{Enemy, EnemyBrain, EnemyGun, EnemyStats};
use crate::combat::Dead;
use crate::core::{
    AudioCue, AudioCueEvent, Character, DamageEvent, EntityState, GameConfig,
};
use crate::player::Player;

/// The player's body, if it can still be targeted.
fn live_target<'a>(
    player_query: &'a Query<(Entity, &EntityState), (With<Player>, Without<Enemy>, Without<Dead>)>,
) -> Option<(Entity, &'a EntityState)> {
    player_query
        .get_single()
        .ok()
        .filter(|(_, body)| body.active)
}

/// Count down attack cooldowns.
pub fn cool_down_attacks(
    mut enemy_query: Query<(&EntityState, &mut Character, &mut EnemyBrain), (With<Enemy>, Without<Dead>)>,
) {
    for (body, mut character, mut brain) in enemy_query.iter_mut() {
        if !body.active {
            continue;
        }
        brain.tick_timers(&mut character);
    }
}

/// Patrol, chase or start an attack depending on where the player is.
pub fn think(
    player_query: Query<(Entity, &EntityState), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<
        (Entity, &mut EntityState, &mut Character, &EnemyStats, &mut EnemyBrain),
        (With<Enemy>, Without<Player>, Without<Dead>),
    >,
) {
    let target_x = live_target(&player_query).map(|(_, body)| body.position.x);

    for (entity, mut body, mut character, stats, mut brain) in enemy_query.iter_mut() {
        if !body.active {
            continue;
        }

        let previous = brain.state;
        brain.think(&mut body, &mut character, stats, target_x);

        if brain.state != previous {
            debug!("Enemy {:?}: {:?} -> {:?}", entity, previous, brain.state);
        }
    }
}

/// Move enemy bullets and report hits on the player.
pub fn fly_bullets(
    config: Res<GameConfig>,
    player_query: Query<(Entity, &EntityState), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<(Entity, &mut EnemyGun), (With<Enemy>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let target = live_target(&player_query);

    for (entity, mut gun) in enemy_query.iter_mut() {
        if gun.update(config.map.width, target.map(|(_, body)| body)) {
            if let Some((player, _)) = target {
                damage_events.send(DamageEvent {
                    target: player,
                    source: entity,
                    amount: gun.slot.damage,
                });
            }
        }
    }
}

/// Advance enemy animations and fire on the attack midpoint.
pub fn animate_enemies(
    player_query: Query<(Entity, &EntityState), (With<Player>, Without<Enemy>, Without<Dead>)>,
    mut enemy_query: Query<
        (&EntityState, &mut Character, &EnemyStats, &mut EnemyBrain, &mut EnemyGun),
        (With<Enemy>, Without<Player>, Without<Dead>),
    >,
    mut cues: EventWriter<AudioCueEvent>,
) {
    let target_x = live_target(&player_query).map(|(_, body)| body.position.x);

    for (body, mut character, stats, mut brain, mut gun) in enemy_query.iter_mut() {
        if !body.active {
            continue;
        }

        if !brain.animate(&mut character, stats) {
            continue;
        }

        // A shot with nobody to aim at goes the way the enemy faces
        let aim_x = target_x.unwrap_or(if brain.moving_right {
            body.position.x + 1
        } else {
            body.position.x - 1
        });
        gun.fire(body, aim_x, stats);
        cues.send(AudioCueEvent(AudioCue::EnemyFired));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityTag, LogicSet, LogicTick};
    use crate::enemies::{enemy_bundle, AiState, EnemyDefinition};
    use crate::player::player_bundle;

    fn ai_app() -> App {
        let mut app = App::new();
        app.init_resource::<GameConfig>()
            .add_event::<DamageEvent>()
            .add_event::<AudioCueEvent>()
            .init_schedule(LogicTick)
            .add_systems(
                LogicTick,
                (cool_down_attacks, think, fly_bullets, animate_enemies)
                    .chain()
                    .in_set(LogicSet::Enemies),
            );
        app
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(LogicTick);
    }

    fn spawn_enemy(app: &mut App, x: i32) -> Entity {
        app.world_mut()
            .spawn(enemy_bundle("enemy_pro", &EnemyDefinition::default(), x, 445))
            .id()
    }

    fn spawn_player(app: &mut App, x: i32) -> Entity {
        let config = GameConfig::default();
        let player = app.world_mut().spawn(player_bundle(&config.player)).id();
        app.world_mut().get_mut::<EntityState>(player).unwrap().position.x = x;
        player
    }

    #[test]
    fn enemies_patrol_without_a_player() {
        let mut app = ai_app();
        let enemy = spawn_enemy(&mut app, 1000);

        for _ in 0..40 {
            tick(&mut app);
        }

        let brain = app.world().get::<EnemyBrain>(enemy).unwrap();
        assert_eq!(brain.state, AiState::Waiting);
        assert_eq!(app.world().get::<EntityState>(enemy).unwrap().position.x, 1200);
    }

    #[test]
    fn enemy_in_range_shoots_the_player() {
        let mut app = ai_app();
        let enemy = spawn_enemy(&mut app, 1000);
        let player = spawn_player(&mut app, 1300);
        let mut cursor = app.world().resource::<Events<DamageEvent>>().get_cursor();
        let mut cues = app.world().resource::<Events<AudioCueEvent>>().get_cursor();

        // Attack starts, then the shot fires on the fifth animation frame
        for _ in 0..5 {
            tick(&mut app);
        }
        let gun = app.world().get::<EnemyGun>(enemy).unwrap();
        assert!(gun.in_flight());
        assert!(gun.slot.moving_right);
        let fired = cues.read(app.world().resource::<Events<AudioCueEvent>>()).count();
        assert_eq!(fired, 1);

        // 1040 -> 1090 -> ... -> 1290 overlaps the player at 1300
        for _ in 0..5 {
            tick(&mut app);
        }
        let events = app.world().resource::<Events<DamageEvent>>();
        let hits: Vec<_> = cursor.read(events).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].target, player);
        assert_eq!(hits[0].source, enemy);
        assert_eq!(hits[0].amount, 17);
        assert!(!app.world().get::<EnemyGun>(enemy).unwrap().in_flight());
    }

    #[test]
    fn inactive_enemies_are_skipped() {
        let mut app = ai_app();
        let enemy = spawn_enemy(&mut app, 1000);
        app.world_mut().get_mut::<EntityState>(enemy).unwrap().active = false;

        tick(&mut app);

        let body = app.world().get::<EntityState>(enemy).unwrap();
        assert_eq!(body.position.x, 1000);
        assert_eq!(body.tag, EntityTag::Enemy);
    }

    #[test]
    fn dead_player_is_not_targeted() {
        let mut app = ai_app();
        let enemy = spawn_enemy(&mut app, 1000);
        let player = spawn_player(&mut app, 1100);
        app.world_mut().get_mut::<EntityState>(player).unwrap().active = false;

        tick(&mut app);

        let brain = app.world().get::<EnemyBrain>(enemy).unwrap();
        assert_eq!(brain.state, AiState::PatrollingRight);
    }
}
