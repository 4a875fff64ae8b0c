//! Player projectile registry: spawning, flight, hits and retirement.

use bevy::prelude::*;

use super::components::*;
use crate::camera::MapScroll;
use crate::core::{
    AudioCue, AudioCueEvent, Character, CombatTuning, Damageable, EntityState, EntityTag,
    GameConfig, LevelEntity, LevelSession, Positioned,
};
use crate::enemies::Enemy;
use crate::player::{Player, PlayerController};
use crate::rendering::{screen_to_translation, SpriteLayer};

/// Build a player projectile leaving the muzzle in the facing direction.
pub fn player_shot(tuning: &CombatTuning, shooter: &EntityState, facing_right: bool) -> Projectile {
    let (offset_x, offset_y) = tuning.muzzle_offset;
    let x = if facing_right {
        shooter.position.x + offset_x
    } else {
        shooter.position.x - offset_x
    };
    let origin = Vec2::new(x as f32, (shooter.position.y + offset_y) as f32);

    Projectile::new(
        EntityTag::PlayerShot,
        origin,
        IVec2::new(tuning.bullet_size.0, tuning.bullet_size.1),
        facing_right,
        tuning.bullet_speed,
        tuning.bullet_damage,
    )
}

/// First live target the projectile overlaps, in iteration order.
///
/// Targets that are inactive or already at or below `threshold` are skipped.
pub fn first_hit<'a, I>(projectile: &Projectile, targets: I, threshold: i32) -> Option<Entity>
where
    I: IntoIterator<Item = (Entity, &'a EntityState, &'a Character)>,
{
    targets
        .into_iter()
        .filter(|(_, body, character)| body.active && !character.is_down(threshold))
        .find(|(_, body, _)| projectile.overlaps(*body))
        .map(|(entity, _, _)| entity)
}

/// Whether a screen X lies outside the viewport plus the cull margin.
pub fn is_off_screen(screen_x: i32, viewport_width: i32, margin: i32) -> bool {
    screen_x < -margin || screen_x > viewport_width + margin
}

/// Turn the player's queued shots into projectiles.
pub fn spawn_player_projectiles(
    mut commands: Commands,
    config: Res<GameConfig>,
    scroll: Res<MapScroll>,
    mut player_query: Query<(&EntityState, &mut PlayerController, Has<Dead>), With<Player>>,
    mut cues: EventWriter<AudioCueEvent>,
) {
    let Ok((body, mut controller, dead)) = player_query.get_single_mut() else {
        return;
    };
    let shots = controller.take_shots();
    if dead || !body.active {
        return;
    }

    for _ in 0..shots {
        let projectile = player_shot(&config.combat, body, controller.facing_right);
        let translation = screen_to_translation(
            scroll.screen_position(projectile.position()),
            projectile.size(),
            &config.viewport,
            SpriteLayer::Projectile.z(),
        );
        let size = projectile.size().as_vec2();

        commands.spawn((
            projectile,
            LevelEntity,
            Name::new("Player Shot"),
            Sprite::from_color(Color::srgb(1.0, 0.85, 0.2), size),
            Transform::from_translation(translation),
        ));
        cues.send(AudioCueEvent(AudioCue::PlayerFired));
    }
}

/// Move every player projectile, resolve the first enemy it hits and retire
/// it on a hit or once it leaves the screen.
pub fn update_player_projectiles(
    mut commands: Commands,
    config: Res<GameConfig>,
    scroll: Res<MapScroll>,
    mut session: ResMut<LevelSession>,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    enemies: Query<(Entity, &EntityState, &Character), (With<Enemy>, Without<Dead>)>,
    mut damage_events: EventWriter<DamageEvent>,
) {
    let tuning = &config.combat;

    for (entity, mut projectile) in projectiles.iter_mut() {
        if !projectile.body.active {
            continue;
        }
        projectile.advance();

        if let Some(target) = first_hit(&projectile, enemies.iter(), tuning.death_threshold) {
            damage_events.send(DamageEvent {
                target,
                source: entity,
                amount: projectile.damage,
            });
            session.score += tuning.hit_score;
            projectile.retire();
            commands.entity(entity).despawn_recursive();
            debug!("Projectile {:?} hit enemy {:?}", entity, target);
            continue;
        }

        let screen_x = scroll.screen_x(projectile.position().x);
        if is_off_screen(screen_x, config.viewport.width, tuning.cull_margin) {
            projectile.retire();
            commands.entity(entity).despawn_recursive();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PlayerTuning, ProjectileSet, ProjectileTick};
    use crate::player::player_bundle;

    fn shooter() -> EntityState {
        EntityState::new(EntityTag::Player, IVec2::new(150, 400), IVec2::new(70, 120))
    }

    fn enemy_at(x: i32) -> (EntityState, Character) {
        (
            EntityState::new(EntityTag::Enemy, IVec2::new(x, 445), IVec2::new(80, 103)),
            Character::new(100, 5, 445),
        )
    }

    #[test]
    fn shots_leave_the_muzzle_in_facing_direction() {
        let tuning = CombatTuning::default();

        let right = player_shot(&tuning, &shooter(), true);
        assert_eq!(right.position(), IVec2::new(200, 450));
        assert!(right.moving_right);
        assert_eq!(right.damage, 19);

        let left = player_shot(&tuning, &shooter(), false);
        assert_eq!(left.position(), IVec2::new(100, 450));
        assert!(!left.moving_right);
    }

    #[test]
    fn first_enemy_in_order_wins() {
        let tuning = CombatTuning::default();
        let mut projectile = player_shot(&tuning, &shooter(), true);
        projectile.advance();

        let (a_body, a_char) = enemy_at(200);
        let (b_body, b_char) = enemy_at(210);
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);

        let hit = first_hit(&projectile, [(a, &a_body, &a_char), (b, &b_body, &b_char)], 10);
        assert_eq!(hit, Some(a));

        let hit = first_hit(&projectile, [(b, &b_body, &b_char), (a, &a_body, &a_char)], 10);
        assert_eq!(hit, Some(b));
    }

    #[test]
    fn defeated_and_inactive_enemies_are_skipped() {
        let tuning = CombatTuning::default();
        let projectile = player_shot(&tuning, &shooter(), true);

        let (a_body, mut a_char) = enemy_at(195);
        a_char.health.current = 10;
        let (mut b_body, b_char) = enemy_at(195);
        b_body.active = false;
        let (c_body, c_char) = enemy_at(195);

        let targets = [
            (Entity::from_raw(1), &a_body, &a_char),
            (Entity::from_raw(2), &b_body, &b_char),
            (Entity::from_raw(3), &c_body, &c_char),
        ];
        assert_eq!(first_hit(&projectile, targets, 10), Some(Entity::from_raw(3)));
    }

    #[test]
    fn miss_returns_none() {
        let projectile = player_shot(&CombatTuning::default(), &shooter(), true);
        let (body, character) = enemy_at(2000);

        assert_eq!(first_hit(&projectile, [(Entity::from_raw(1), &body, &character)], 10), None);
    }

    #[test]
    fn cull_window_extends_past_the_viewport() {
        assert!(!is_off_screen(-50, 1500, 50));
        assert!(is_off_screen(-51, 1500, 50));
        assert!(!is_off_screen(1550, 1500, 50));
        assert!(is_off_screen(1551, 1500, 50));
    }

    #[test]
    fn spawn_point_ignores_player_tuning_changes() {
        let mut tuning = PlayerTuning::default();
        tuning.spawn = (10, 20);
        let body = EntityState::new(EntityTag::Player, IVec2::new(10, 20), IVec2::ONE);

        let shot = player_shot(&CombatTuning::default(), &body, true);
        assert_eq!(shot.position(), IVec2::new(60, 70));
    }

    fn projectile_app() -> App {
        let mut app = App::new();
        app.init_resource::<GameConfig>()
            .init_resource::<MapScroll>()
            .init_resource::<LevelSession>()
            .add_event::<DamageEvent>()
            .add_event::<AudioCueEvent>()
            .init_schedule(ProjectileTick)
            .configure_sets(ProjectileTick, (ProjectileSet::Spawn, ProjectileSet::Flight).chain())
            .add_systems(ProjectileTick, spawn_player_projectiles.in_set(ProjectileSet::Spawn))
            .add_systems(ProjectileTick, update_player_projectiles.in_set(ProjectileSet::Flight));
        app
    }

    fn tick(app: &mut App) {
        app.world_mut().run_schedule(ProjectileTick);
    }

    fn spawn_enemy(app: &mut App, x: i32) -> Entity {
        let (body, character) = enemy_at(x);
        app.world_mut().spawn((Enemy, body, character)).id()
    }

    fn spawn_shot(app: &mut App, shot: Projectile) -> Entity {
        app.world_mut().spawn(shot).id()
    }

    fn shots(app: &mut App) -> usize {
        let mut query = app.world_mut().query::<&Projectile>();
        query.iter(app.world()).count()
    }

    #[test]
    fn queued_shots_survive_until_the_projectile_tick() {
        let mut app = projectile_app();
        let player = app
            .world_mut()
            .spawn(player_bundle(&PlayerTuning::default()))
            .id();
        {
            let mut controller = app.world_mut().get_mut::<PlayerController>(player).unwrap();
            controller.request_shot();
            controller.request_shot();
        }

        // Frames without a projectile tick must not lose the shots
        app.update();
        app.update();
        assert_eq!(shots(&mut app), 0);

        tick(&mut app);
        assert_eq!(shots(&mut app), 2);
        assert_eq!(app.world().resource::<Events<AudioCueEvent>>().len(), 2);

        tick(&mut app);
        assert_eq!(shots(&mut app), 2);
    }

    #[test]
    fn hit_scores_once_and_removes_the_projectile() {
        let mut app = projectile_app();
        let first = spawn_enemy(&mut app, 200);
        let second = spawn_enemy(&mut app, 210);
        let shot = spawn_shot(&mut app, player_shot(&CombatTuning::default(), &shooter(), true));
        let mut cursor = app.world().resource::<Events<DamageEvent>>().get_cursor();

        tick(&mut app);

        let events = app.world().resource::<Events<DamageEvent>>();
        let hits: Vec<_> = cursor.read(events).collect();
        assert_eq!(hits.len(), 1);
        assert!(hits[0].target == first || hits[0].target == second);
        assert_eq!(hits[0].source, shot);
        assert_eq!(hits[0].amount, 19);
        assert_eq!(app.world().resource::<LevelSession>().score, 100);
        assert!(!app.world().entities().contains(shot));
    }

    #[test]
    fn projectiles_leaving_the_screen_are_removed() {
        let mut app = projectile_app();
        let body = EntityState::new(EntityTag::Player, IVec2::new(1490, 400), IVec2::new(70, 120));
        let leaving = spawn_shot(&mut app, player_shot(&CombatTuning::default(), &body, true));
        let staying = spawn_shot(&mut app, player_shot(&CombatTuning::default(), &shooter(), true));

        tick(&mut app);

        assert!(!app.world().entities().contains(leaving));
        assert!(app.world().entities().contains(staying));
        assert_eq!(app.world().resource::<LevelSession>().score, 0);
    }
}
