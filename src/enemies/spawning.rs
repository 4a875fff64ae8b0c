//! Enemy spawning at level start.

use bevy::prelude::*;

use super::components::{Enemy, EnemyBrain, EnemyGun, EnemyType};
use super::data::{EnemyDefinition, EnemyRegistry};
use crate::core::{
    Character, DataLoadError, EntityState, EntityTag, GameConfig, GameState, LevelEntity,
    LevelLayout,
};
use crate::rendering::{screen_to_translation, EnemyBulletSprite, SpriteLayer};

/// Every component an enemy needs to take part in the simulation.
pub fn enemy_bundle(
    enemy_type: &str,
    definition: &EnemyDefinition,
    spawn_x: i32,
    ground_y: i32,
) -> impl Bundle {
    let stats = definition.to_stats();
    let brain = EnemyBrain::new(spawn_x, &stats);
    let gun = EnemyGun::new(&stats);

    (
        Enemy,
        EnemyType(enemy_type.to_string()),
        Name::new(definition.name.clone()),
        EntityState::new(
            EntityTag::Enemy,
            IVec2::new(spawn_x, ground_y),
            definition.body_size(),
        ),
        Character::new(definition.max_health, definition.speed, ground_y),
        stats,
        brain,
        gun,
    )
}

/// Resolve the level's enemy roster: one definition and every spawn X.
///
/// Fails when the level names an enemy type that was never loaded.
pub fn plan_roster<'a>(
    layout: &LevelLayout,
    registry: &'a EnemyRegistry,
) -> Result<(&'a EnemyDefinition, Vec<i32>), DataLoadError> {
    let definition = registry.get(&layout.enemy_type)?;
    Ok((definition, layout.spawn_points().collect()))
}

/// Spawn the level's enemies along the map.
///
/// A roster that cannot be built aborts the level back to the main menu.
pub fn spawn_enemies(
    mut commands: Commands,
    config: Res<GameConfig>,
    registry: Res<EnemyRegistry>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    let layout = &config.level;
    let (definition, spawn_points) = match plan_roster(layout, &registry) {
        Ok(roster) => roster,
        Err(e) => {
            error!("Level build failed: {}", e);
            next_state.set(GameState::MainMenu);
            return;
        }
    };

    let size = definition.body_size();
    let bullet_size = definition.to_stats().bullet_size;

    for &spawn_x in &spawn_points {
        let position = IVec2::new(spawn_x, layout.enemy_ground);
        commands
            .spawn((
                enemy_bundle(&layout.enemy_type, definition, spawn_x, layout.enemy_ground),
                LevelEntity,
                Sprite::from_color(Color::srgb(0.8, 0.25, 0.25), size.as_vec2()),
                Transform::from_translation(screen_to_translation(
                    position,
                    size,
                    &config.viewport,
                    SpriteLayer::Enemy.z(),
                )),
            ))
            .with_children(|parent| {
                parent.spawn((
                    EnemyBulletSprite,
                    Name::new("Enemy Bullet"),
                    Sprite::from_color(Color::srgb(1.0, 0.5, 0.1), bullet_size.as_vec2()),
                    Transform::default(),
                    Visibility::Hidden,
                ));
            });
    }

    info!(
        "Spawned {} {} enemies between x={} and x={}",
        spawn_points.len(),
        layout.enemy_type,
        layout.first_spawn_x,
        layout.last_spawn_x
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::{AiState, EnemyStats};

    fn registry() -> EnemyRegistry {
        let mut registry = EnemyRegistry::default();
        registry.insert("enemy_pro", EnemyDefinition::default());
        registry
    }

    #[test]
    fn roster_covers_the_map() {
        let registry = registry();
        let (definition, points) = plan_roster(&LevelLayout::default(), &registry).unwrap();

        assert_eq!(definition.max_health, 100);
        assert_eq!(points.len(), 16);
        assert_eq!(points.first(), Some(&900));
        assert_eq!(points.last(), Some(&9900));
    }

    #[test]
    fn unknown_enemy_type_fails_the_build() {
        let layout = LevelLayout {
            enemy_type: "ghost".to_string(),
            ..default()
        };

        assert!(matches!(
            plan_roster(&layout, &registry()),
            Err(DataLoadError::UnknownEnemyType(_))
        ));
    }

    #[test]
    fn spawn_system_builds_the_level() {
        let mut app = App::new();
        app.init_resource::<GameConfig>()
            .init_resource::<NextState<GameState>>()
            .insert_resource(registry())
            .add_systems(Update, spawn_enemies);

        app.update();

        let mut query = app
            .world_mut()
            .query_filtered::<(&EntityState, &Character, &EnemyBrain, &EnemyStats, &Children), With<Enemy>>();
        let enemies: Vec<_> = query.iter(app.world()).collect();
        assert_eq!(enemies.len(), 16);

        let (body, character, brain, stats, children) = enemies
            .iter()
            .find(|(body, ..)| body.position.x == 900)
            .copied()
            .unwrap();
        assert_eq!(body.position.y, 445);
        assert_eq!(body.size, IVec2::new(80, 103));
        assert_eq!(character.health.current, 100);
        assert_eq!(brain.state, AiState::PatrollingRight);
        assert_eq!((brain.left_limit, brain.right_limit), (800, 1100));
        assert_eq!(stats.damage, 17);
        assert_eq!(children.len(), 1);
    }

    #[test]
    fn unknown_type_aborts_to_the_main_menu() {
        let mut app = App::new();
        app.init_resource::<GameConfig>()
            .init_resource::<NextState<GameState>>()
            .init_resource::<EnemyRegistry>()
            .add_systems(Update, spawn_enemies);

        app.update();

        let mut query = app.world_mut().query_filtered::<Entity, With<Enemy>>();
        assert_eq!(query.iter(app.world()).count(), 0);
        assert!(matches!(
            app.world().resource::<NextState<GameState>>(),
            NextState::Pending(GameState::MainMenu)
        ));
    }
}
