//! Camera plugin - 2D camera, map scroll state and the scrolling backdrop.

use bevy::prelude::*;

use super::scroll::MapScroll;
use crate::core::{GameConfig, LevelEntity, LevelSet, LevelStart, LogicSet, LogicTick};
use crate::rendering::screen_to_translation;

/// Marker for the map backdrop sprite.
#[derive(Component)]
pub struct MapBackdrop;

/// Camera plugin - owns the camera offset into the map.
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MapScroll>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                LevelStart,
                (reset_map_scroll, spawn_backdrop).in_set(LevelSet::Spawn),
            )
            .add_systems(LogicTick, follow_backdrop.in_set(LogicSet::Present));
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Camera2d, Name::new("Camera")));
}

/// Start the new level at the left edge of the map.
fn reset_map_scroll(mut commands: Commands, config: Res<GameConfig>) {
    commands.insert_resource(MapScroll::from_config(&config));
}

/// Spawn a strip the width of the map so scrolling is visible.
fn spawn_backdrop(mut commands: Commands, config: Res<GameConfig>) {
    let size = IVec2::new(config.map.width, config.viewport.height);
    commands.spawn((
        MapBackdrop,
        LevelEntity,
        Name::new("Map"),
        Sprite::from_color(Color::srgb(0.18, 0.2, 0.26), size.as_vec2()),
        Transform::from_translation(screen_to_translation(
            IVec2::ZERO,
            size,
            &config.viewport,
            0.0,
        )),
    ));
}

/// Keep the backdrop aligned with the camera offset.
fn follow_backdrop(
    scroll: Res<MapScroll>,
    config: Res<GameConfig>,
    mut query: Query<(&mut Transform, &Sprite), With<MapBackdrop>>,
) {
    for (mut transform, sprite) in query.iter_mut() {
        let size = sprite.custom_size.unwrap_or(Vec2::ZERO).as_ivec2();
        transform.translation = screen_to_translation(
            IVec2::new(-scroll.offset(), 0),
            size,
            &config.viewport,
            0.0,
        );
    }
}
