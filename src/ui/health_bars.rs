//! Health bars drawn above characters.
//!
//! Each character owns its bar as a child sprite, so the bar follows the
//! character and is released together with it.

use bevy::prelude::*;
use bevy::sprite::Anchor;

use crate::core::{Character, EntityState, EntityTag, Health, LogicSet, LogicTick};

/// Bar height in pixels.
pub const BAR_HEIGHT: f32 = 10.0;
/// Border around the fill, counted over both sides.
pub const BAR_BORDER: f32 = 4.0;
/// Gap between the top of the bar and the top of the sprite.
pub const BAR_OFFSET: f32 = 20.0;

/// Bar width for a kind of character.
pub fn bar_width(tag: EntityTag) -> Option<f32> {
    match tag {
        EntityTag::Player => Some(100.0),
        EntityTag::Enemy => Some(80.0),
        EntityTag::PlayerShot | EntityTag::EnemyShot => None,
    }
}

/// Colour band of a health bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarTier {
    Healthy,
    Wounded,
    Critical,
}

impl BarTier {
    pub fn for_health(health: &Health) -> Self {
        let fraction = health.fraction();
        if fraction > 0.6 {
            BarTier::Healthy
        } else if fraction > 0.3 {
            BarTier::Wounded
        } else {
            BarTier::Critical
        }
    }

    pub fn color(self) -> Color {
        match self {
            BarTier::Healthy => Color::srgb(0.2, 0.8, 0.3),
            BarTier::Wounded => Color::srgb(0.9, 0.8, 0.2),
            BarTier::Critical => Color::srgb(0.85, 0.2, 0.2),
        }
    }
}

/// Width of the coloured fill inside a bar of `bar_width`.
pub fn fill_width(health: &Health, bar_width: f32) -> f32 {
    (health.fraction() * (bar_width - BAR_BORDER)).max(0.0)
}

/// Marker for characters that already carry a bar.
#[derive(Component)]
pub struct HasHealthBar;

/// The coloured part of a bar.
#[derive(Component, Debug)]
pub struct HealthBarFill {
    pub owner: Entity,
    pub width: f32,
}

pub fn setup_health_bar_systems(app: &mut App) {
    app.add_systems(LogicTick, update_health_bars.in_set(LogicSet::Present));
}

/// Give every character spawned for the level a bar.
pub fn attach_health_bars(
    mut commands: Commands,
    query: Query<(Entity, &EntityState, &Character), Without<HasHealthBar>>,
) {
    for (entity, body, character) in query.iter() {
        let Some(width) = bar_width(body.tag) else {
            continue;
        };
        let size = body.size.as_vec2();
        // Sprite origin is its centre; the bar starts at the sprite's left edge
        let bar_origin = Vec3::new(
            -size.x / 2.0 + width / 2.0,
            size.y / 2.0 + BAR_OFFSET - BAR_HEIGHT / 2.0,
            1.0,
        );
        let health = &character.health;

        commands
            .entity(entity)
            .insert(HasHealthBar)
            .with_children(|parent| {
                parent
                    .spawn((
                        Name::new("Health Bar"),
                        Sprite::from_color(Color::srgb(0.1, 0.1, 0.1), Vec2::new(width, BAR_HEIGHT)),
                        Transform::from_translation(bar_origin),
                    ))
                    .with_children(|bar| {
                        bar.spawn((
                            HealthBarFill { owner: entity, width },
                            Sprite {
                                color: BarTier::for_health(health).color(),
                                custom_size: Some(Vec2::new(
                                    fill_width(health, width),
                                    BAR_HEIGHT - BAR_BORDER,
                                )),
                                anchor: Anchor::CenterLeft,
                                ..default()
                            },
                            Transform::from_xyz(-width / 2.0 + BAR_BORDER / 2.0, 0.0, 0.1),
                        ));
                    });
            });
    }
}

/// Resize and recolour bars from their owner's health.
pub fn update_health_bars(
    characters: Query<&Character>,
    mut fills: Query<(&HealthBarFill, &mut Sprite)>,
) {
    for (fill, mut sprite) in fills.iter_mut() {
        let Ok(character) = characters.get(fill.owner) else {
            continue;
        };
        let health = &character.health;
        sprite.color = BarTier::for_health(health).color();
        sprite.custom_size = Some(Vec2::new(
            fill_width(health, fill.width),
            BAR_HEIGHT - BAR_BORDER,
        ));
    }
}
