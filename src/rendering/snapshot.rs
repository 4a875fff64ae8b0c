//! Read-only picture of the simulation handed to the renderer after each tick.
//!
//! The renderer never touches simulation components directly. It pulls the
//! [`RenderFrame`] resource, which holds screen positions and animation frames
//! for everything visible plus the camera offset for the backdrop.

use bevy::prelude::*;

use crate::camera::MapScroll;
use crate::combat::Projectile;
use crate::core::{Animatable, AnimationFrame, EntityState, EntityTag, Positioned};
use crate::enemies::{Enemy, EnemyBrain, EnemyGun};
use crate::player::{Player, PlayerController};

/// One drawable thing in screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSnapshot {
    /// Entity that owns the sprite. Enemy bullets report their enemy.
    pub entity: Entity,
    pub tag: EntityTag,
    pub screen_position: IVec2,
    pub size: IVec2,
    pub frame: Option<AnimationFrame>,
}

/// Everything the renderer needs for the current tick.
#[derive(Resource, Debug, Default)]
pub struct RenderFrame {
    pub camera_offset: i32,
    pub player: Option<SpriteSnapshot>,
    pub enemies: Vec<SpriteSnapshot>,
    pub projectiles: Vec<SpriteSnapshot>,
    /// Set after each tick, cleared once the renderer has consumed the frame
    pub needs_redraw: bool,
}

impl RenderFrame {
    /// Find the snapshot for `entity` among the characters.
    pub fn character(&self, entity: Entity) -> Option<&SpriteSnapshot> {
        self.player
            .iter()
            .chain(self.enemies.iter())
            .find(|snapshot| snapshot.entity == entity)
    }
}

fn snapshot<P: Positioned>(
    entity: Entity,
    tag: EntityTag,
    body: &P,
    scroll: &MapScroll,
    frame: Option<AnimationFrame>,
) -> SpriteSnapshot {
    SpriteSnapshot {
        entity,
        tag,
        screen_position: scroll.screen_position(body.position()),
        size: body.size(),
        frame,
    }
}

/// Rebuild the render frame from committed simulation state.
pub fn build_render_frame(
    mut frame: ResMut<RenderFrame>,
    scroll: Res<MapScroll>,
    player_query: Query<(Entity, &EntityState, &PlayerController), With<Player>>,
    enemy_query: Query<(Entity, &EntityState, &EnemyBrain, &EnemyGun), With<Enemy>>,
    projectile_query: Query<(Entity, &Projectile)>,
) {
    frame.camera_offset = scroll.offset();

    frame.player = player_query
        .get_single()
        .ok()
        .filter(|(_, body, _)| body.active)
        .map(|(entity, body, controller)| {
            snapshot(entity, body.tag, body, &scroll, Some(controller.animation()))
        });

    frame.enemies.clear();
    frame.projectiles.clear();

    for (entity, body, brain, gun) in enemy_query.iter() {
        if !body.active {
            continue;
        }
        frame
            .enemies
            .push(snapshot(entity, body.tag, body, &scroll, Some(brain.animation())));

        if gun.slot.body.active {
            let bullet = &gun.slot;
            frame
                .projectiles
                .push(snapshot(entity, bullet.body.tag, bullet, &scroll, None));
        }
    }

    for (entity, projectile) in projectile_query.iter() {
        if projectile.body.active {
            frame
                .projectiles
                .push(snapshot(entity, projectile.body.tag, projectile, &scroll, None));
        }
    }

    frame.needs_redraw = true;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::enemies::{enemy_bundle, EnemyDefinition};
    use crate::player::player_bundle;

    #[test]
    fn frame_is_in_screen_space_and_skips_inactive_entities() {
        let mut app = App::new();
        let mut scroll = MapScroll::new(10000, 1500);
        scroll.scroll(400);
        app.insert_resource(scroll)
            .init_resource::<RenderFrame>()
            .add_systems(Update, build_render_frame);

        let definition = EnemyDefinition::default();
        let player = app
            .world_mut()
            .spawn(player_bundle(&GameConfig::default().player))
            .id();
        let enemy = app
            .world_mut()
            .spawn(enemy_bundle("enemy_pro", &definition, 900, 445))
            .id();
        let hidden = app
            .world_mut()
            .spawn(enemy_bundle("enemy_pro", &definition, 1500, 445))
            .id();
        app.world_mut().get_mut::<EntityState>(hidden).unwrap().active = false;

        app.update();

        let frame = app.world().resource::<RenderFrame>();
        assert!(frame.needs_redraw);
        assert_eq!(frame.camera_offset, 400);
        assert_eq!(frame.character(player).unwrap().screen_position, IVec2::new(-250, 400));
        assert_eq!(frame.character(enemy).unwrap().screen_position, IVec2::new(500, 445));
        assert!(frame.character(hidden).is_none());
        assert!(frame.projectiles.is_empty());
    }
}
