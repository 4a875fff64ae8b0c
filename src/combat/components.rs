//! Combat-related components.

use bevy::prelude::*;

// Re-export from core to avoid duplication
pub use crate::core::{DamageEvent, DeathEvent};
use crate::core::{EntityState, EntityTag, Positioned};

/// A bullet in flight.
///
/// The exact position is kept in floating point so slow or fractional speeds
/// don't drift. `body.position` is the truncated pixel position used for
/// collisions and drawing.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub body: EntityState,
    pub exact: Vec2,
    pub moving_right: bool,
    /// Pixels per tick
    pub speed: f32,
    pub damage: i32,
}

impl Projectile {
    /// A live projectile with its top-left corner at `origin`.
    pub fn new(tag: EntityTag, origin: Vec2, size: IVec2, moving_right: bool, speed: f32, damage: i32) -> Self {
        Self {
            body: EntityState::new(tag, origin.as_ivec2(), size),
            exact: origin,
            moving_right,
            speed,
            damage,
        }
    }

    /// An inactive slot, ready to be fired later.
    pub fn idle(tag: EntityTag, size: IVec2) -> Self {
        let mut projectile = Self::new(tag, Vec2::ZERO, size, true, 0.0, 0);
        projectile.body.active = false;
        projectile
    }

    /// Move one tick along the direction of travel.
    pub fn advance(&mut self) {
        let step = if self.moving_right { self.speed } else { -self.speed };
        self.exact.x += step;
        self.body.position = self.exact.as_ivec2();
    }

    pub fn retire(&mut self) {
        self.body.active = false;
    }
}

impl Positioned for Projectile {
    fn position(&self) -> IVec2 {
        self.body.position
    }

    fn size(&self) -> IVec2 {
        self.body.size
    }
}

/// Marker for characters that have crossed their survival threshold
/// (prevents multiple death events).
#[derive(Component)]
pub struct Dead;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_in_direction_of_travel() {
        let mut right = Projectile::new(EntityTag::PlayerShot, Vec2::new(100.0, 50.0), IVec2::new(10, 5), true, 30.0, 19);
        let mut left = Projectile::new(EntityTag::PlayerShot, Vec2::new(100.0, 50.0), IVec2::new(10, 5), false, 30.0, 19);

        right.advance();
        left.advance();

        assert_eq!(right.position(), IVec2::new(130, 50));
        assert_eq!(left.position(), IVec2::new(70, 50));
    }

    #[test]
    fn fractional_speed_accumulates_without_drift() {
        let mut projectile = Projectile::new(EntityTag::EnemyShot, Vec2::ZERO, IVec2::ONE, true, 0.5, 1);

        for _ in 0..10 {
            projectile.advance();
        }

        assert_eq!(projectile.position().x, 5);
    }

    #[test]
    fn idle_slot_is_inactive() {
        let slot = Projectile::idle(EntityTag::EnemyShot, IVec2::new(23, 11));
        assert!(!slot.body.active);
        assert_eq!(slot.body.tag, EntityTag::EnemyShot);
    }
}
