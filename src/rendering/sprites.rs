//! Placeholder sprite renderer driven by the render frame.

use std::collections::HashMap;

use bevy::prelude::*;

use super::snapshot::{RenderFrame, SpriteSnapshot};
use crate::core::{EntityTag, GameConfig, ViewportConfig};

/// Draw order of sprite kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteLayer {
    Backdrop,
    Enemy,
    Player,
    Projectile,
}

impl SpriteLayer {
    pub fn z(self) -> f32 {
        match self {
            SpriteLayer::Backdrop => 0.0,
            SpriteLayer::Enemy => 1.0,
            SpriteLayer::Player => 2.0,
            SpriteLayer::Projectile => 3.0,
        }
    }

    fn for_tag(tag: EntityTag) -> Self {
        match tag {
            EntityTag::Player => SpriteLayer::Player,
            EntityTag::Enemy => SpriteLayer::Enemy,
            EntityTag::PlayerShot | EntityTag::EnemyShot => SpriteLayer::Projectile,
        }
    }
}

/// Marker for the sprite that shows an enemy's bullet slot.
#[derive(Component)]
pub struct EnemyBulletSprite;

/// Convert a top-left screen rectangle (Y down) into the centre translation
/// of a Bevy sprite (origin at window centre, Y up).
pub fn screen_to_translation(screen: IVec2, size: IVec2, viewport: &ViewportConfig, z: f32) -> Vec3 {
    let half_size = size.as_vec2() / 2.0;
    Vec3::new(
        screen.x as f32 + half_size.x - viewport.width as f32 / 2.0,
        viewport.height as f32 / 2.0 - (screen.y as f32 + half_size.y),
        z,
    )
}

fn translation_of(snapshot: &SpriteSnapshot, viewport: &ViewportConfig) -> Vec3 {
    screen_to_translation(
        snapshot.screen_position,
        snapshot.size,
        viewport,
        SpriteLayer::for_tag(snapshot.tag).z(),
    )
}

/// Move sprites to where the last tick left their entities.
pub fn apply_render_frame(
    mut frame: ResMut<RenderFrame>,
    config: Res<GameConfig>,
    mut sprites: Query<(&mut Transform, &mut Sprite), Without<EnemyBulletSprite>>,
    mut bullets: Query<(&Parent, &mut Transform, &mut Visibility), With<EnemyBulletSprite>>,
) {
    if !frame.needs_redraw {
        return;
    }
    let viewport = &config.viewport;

    for snapshot in frame.player.iter().chain(frame.enemies.iter()) {
        let Ok((mut transform, mut sprite)) = sprites.get_mut(snapshot.entity) else {
            continue;
        };
        transform.translation = translation_of(snapshot, viewport);
        if let Some(animation) = snapshot.frame {
            sprite.flip_x = !animation.facing_right;
        }
    }

    let mut enemy_shots = HashMap::new();
    for snapshot in frame.projectiles.iter() {
        match snapshot.tag {
            EntityTag::EnemyShot => {
                enemy_shots.insert(snapshot.entity, translation_of(snapshot, viewport));
            }
            _ => {
                if let Ok((mut transform, _)) = sprites.get_mut(snapshot.entity) {
                    transform.translation = translation_of(snapshot, viewport);
                }
            }
        }
    }

    // Bullet sprites are children of their enemy, so they take a local offset.
    for (parent, mut transform, mut visibility) in bullets.iter_mut() {
        let owner = frame.character(parent.get());
        match (owner, enemy_shots.get(&parent.get())) {
            (Some(owner), Some(bullet)) => {
                let origin = translation_of(owner, viewport);
                transform.translation = (*bullet - origin).truncate().extend(1.0);
                *visibility = Visibility::Inherited;
            }
            _ => *visibility = Visibility::Hidden,
        }
    }

    frame.needs_redraw = false;
}
