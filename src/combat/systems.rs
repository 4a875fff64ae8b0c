//! Combat systems - damage resolution and deaths.

use std::collections::HashSet;

use bevy::prelude::*;

use super::components::*;
use super::projectiles::{spawn_player_projectiles, update_player_projectiles};
use crate::core::{
    Character, Damageable, EntityState, EntityTag, GameConfig, GameEndedEvent, GameOutcome,
    LevelSession, LogicSet, LogicTick, ProjectileSet, ProjectileTick,
};

/// Configure combat systems.
///
/// Damage is resolved in both ticks: enemy bullets hit during the logic tick,
/// player projectiles during the projectile tick.
pub fn setup_combat_systems(app: &mut App) {
    app
        // Projectile registry
        .add_systems(
            ProjectileTick,
            spawn_player_projectiles.in_set(ProjectileSet::Spawn),
        )
        .add_systems(
            ProjectileTick,
            update_player_projectiles.in_set(ProjectileSet::Flight),
        )

        // Damage systems
        .add_systems(
            ProjectileTick,
            (apply_damage, handle_deaths)
                .chain()
                .in_set(ProjectileSet::Damage),
        )
        .add_systems(
            LogicTick,
            (apply_damage, handle_deaths).chain().in_set(LogicSet::Damage),
        );
}

/// Health below which a character of this kind counts as defeated.
fn survival_threshold(tag: EntityTag, config: &GameConfig) -> i32 {
    match tag {
        EntityTag::Enemy => config.combat.death_threshold,
        _ => 0,
    }
}

/// Apply queued damage to characters.
///
/// Events are drained rather than read because this system runs in two
/// schedules that share the same event queue.
pub fn apply_damage(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut damage_events: ResMut<Events<DamageEvent>>,
    mut health_query: Query<(&EntityState, &mut Character, Has<Dead>)>,
    mut death_events: EventWriter<DeathEvent>,
) {
    // Track entities that died this tick to avoid duplicate death events
    let mut died_this_tick = HashSet::new();

    for event in damage_events.drain() {
        if died_this_tick.contains(&event.target) {
            continue;
        }

        let Ok((body, mut character, dead)) = health_query.get_mut(event.target) else {
            continue;
        };
        if dead || !body.active {
            continue;
        }

        let dealt = character.take_hit(event.amount);
        debug!(
            "{:?} took {} damage ({} left)",
            event.target,
            dealt,
            character.health().current
        );

        if character.is_down(survival_threshold(body.tag, &config)) {
            died_this_tick.insert(event.target);
            commands.entity(event.target).insert(Dead);
            death_events.send(DeathEvent {
                entity: event.target,
                killed_by: Some(event.source),
            });
        }
    }
}

/// Remove defeated enemies and end the level when the player dies.
pub fn handle_deaths(
    mut commands: Commands,
    config: Res<GameConfig>,
    mut session: ResMut<LevelSession>,
    mut death_events: ResMut<Events<DeathEvent>>,
    mut bodies: Query<(&mut EntityState, Option<&mut Visibility>)>,
    mut ended_events: EventWriter<GameEndedEvent>,
) {
    for event in death_events.drain() {
        let Ok((mut body, visibility)) = bodies.get_mut(event.entity) else {
            continue;
        };
        body.active = false;

        match body.tag {
            EntityTag::Player => {
                if let Some(mut visibility) = visibility {
                    *visibility = Visibility::Hidden;
                }
                if let Some(final_score) = session.finish(GameOutcome::PlayerDied, &config.level) {
                    ended_events.send(GameEndedEvent {
                        outcome: GameOutcome::PlayerDied,
                        final_score,
                    });
                }
            }
            EntityTag::Enemy => {
                info!("Enemy {:?} defeated", event.entity);
                // Health bar and bullet sprite are children and go with it
                commands.entity(event.entity).despawn_recursive();
            }
            EntityTag::PlayerShot | EntityTag::EnemyShot => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerTuning;
    use crate::player::player_bundle;

    fn damage_app() -> App {
        let mut app = App::new();
        app.init_resource::<GameConfig>()
            .init_resource::<LevelSession>()
            .add_event::<DamageEvent>()
            .add_event::<DeathEvent>()
            .add_event::<GameEndedEvent>()
            .add_systems(Update, (apply_damage, handle_deaths).chain());
        app
    }

    fn spawn_enemy(app: &mut App, health: i32) -> Entity {
        let mut character = Character::new(100, 5, 445);
        character.health.current = health;
        app.world_mut()
            .spawn((
                EntityState::new(EntityTag::Enemy, IVec2::new(900, 445), IVec2::new(80, 103)),
                character,
            ))
            .id()
    }

    fn hit(app: &mut App, target: Entity, amount: i32) {
        app.world_mut().send_event(DamageEvent {
            target,
            source: Entity::PLACEHOLDER,
            amount,
        });
    }

    #[test]
    fn surviving_enemy_keeps_reduced_health() {
        let mut app = damage_app();
        let enemy = spawn_enemy(&mut app, 100);

        hit(&mut app, enemy, 19);
        app.update();

        let character = app.world().get::<Character>(enemy).unwrap();
        assert_eq!(character.health.current, 81);
        assert!(app.world().get::<Dead>(enemy).is_none());
    }

    #[test]
    fn enemy_at_threshold_is_removed() {
        let mut app = damage_app();
        let enemy = spawn_enemy(&mut app, 29);

        hit(&mut app, enemy, 19);
        app.update();

        assert!(!app.world().entities().contains(enemy));
    }

    #[test]
    fn multiple_lethal_hits_remove_the_enemy_once() {
        let mut app = damage_app();
        let enemy = spawn_enemy(&mut app, 20);

        hit(&mut app, enemy, 19);
        hit(&mut app, enemy, 19);
        hit(&mut app, enemy, 19);
        app.update();

        assert!(!app.world().entities().contains(enemy));
        assert!(app.world().resource::<Events<DeathEvent>>().is_empty());
    }

    #[test]
    fn player_death_ends_the_level_once() {
        let mut app = damage_app();
        let player = app.world_mut().spawn(player_bundle(&PlayerTuning::default())).id();
        app.world_mut().resource_mut::<LevelSession>().score = 400;
        let mut ended = app.world().resource::<Events<GameEndedEvent>>().get_cursor();

        for _ in 0..6 {
            hit(&mut app, player, 17);
        }
        app.update();
        hit(&mut app, player, 17);
        app.update();

        let events = app.world().resource::<Events<GameEndedEvent>>();
        let sent: Vec<_> = ended.read(events).copied().collect();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].outcome, GameOutcome::PlayerDied);
        assert_eq!(sent[0].final_score, 400);

        let body = app.world().get::<EntityState>(player).unwrap();
        assert!(!body.active);
        assert_eq!(app.world().get::<Character>(player).unwrap().health.current, 0);
    }

    #[test]
    fn damage_to_missing_entities_is_ignored() {
        let mut app = damage_app();
        let enemy = spawn_enemy(&mut app, 100);
        app.world_mut().despawn(enemy);

        hit(&mut app, enemy, 50);
        app.update();

        assert!(!app.world().resource::<LevelSession>().is_finished());
    }
}
