//! Horizontal map scrolling and world-to-screen mapping.

use bevy::prelude::*;

use crate::core::GameConfig;

/// Camera offset into a map wider than the viewport.
///
/// The offset is always within `[0, map_width - viewport_width]`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct MapScroll {
    offset: i32,
    map_width: i32,
    viewport_width: i32,
}

impl Default for MapScroll {
    fn default() -> Self {
        let config = GameConfig::default();
        Self::from_config(&config)
    }
}

impl MapScroll {
    pub fn new(map_width: i32, viewport_width: i32) -> Self {
        Self {
            offset: 0,
            map_width,
            viewport_width,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.map.width, config.viewport.width)
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Largest valid offset. Zero when the map fits in the viewport.
    pub fn max_offset(&self) -> i32 {
        (self.map_width - self.viewport_width).max(0)
    }

    /// Move the camera by `delta` pixels and return the clamped offset.
    pub fn scroll(&mut self, delta: i32) -> i32 {
        self.offset = self.offset.saturating_add(delta).clamp(0, self.max_offset());
        self.offset
    }

    pub fn screen_x(&self, world_x: i32) -> i32 {
        world_x - self.offset
    }

    pub fn screen_position(&self, world: IVec2) -> IVec2 {
        IVec2::new(self.screen_x(world.x), world.y)
    }
}
