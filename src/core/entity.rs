//! Shared simulation state for everything that lives on the map.
//!
//! Instead of a class hierarchy, an entity is an [`EntityState`] plus whatever
//! extra components it needs. Characters (the player and enemies) add a
//! [`Character`]. Behaviour shared across kinds is expressed with the
//! [`Positioned`], [`Damageable`] and [`Animatable`] capability traits.

use bevy::math::IRect;
use bevy::prelude::*;

/// What kind of thing an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityTag {
    Player,
    Enemy,
    PlayerShot,
    EnemyShot,
}

/// World position, size and activity of a simulated entity.
///
/// Positions are integer pixels with the origin at the top-left of the map
/// and Y growing downwards.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct EntityState {
    pub position: IVec2,
    pub size: IVec2,
    pub active: bool,
    pub tag: EntityTag,
}

impl EntityState {
    pub fn new(tag: EntityTag, position: IVec2, size: IVec2) -> Self {
        Self {
            position,
            size,
            active: true,
            tag,
        }
    }
}

/// Anything with an axis-aligned bounding box in world space.
pub trait Positioned {
    fn position(&self) -> IVec2;

    fn size(&self) -> IVec2;

    fn bounds(&self) -> IRect {
        let min = self.position();
        IRect::from_corners(min, min + self.size())
    }

    /// Strict overlap test. Boxes that only share an edge do not overlap.
    fn overlaps<P: Positioned>(&self, other: &P) -> bool {
        !self.bounds().intersect(other.bounds()).is_empty()
    }
}

impl Positioned for EntityState {
    fn position(&self) -> IVec2 {
        self.position
    }

    fn size(&self) -> IVec2 {
        self.size
    }
}

/// Hit points, clamped to `[0, maximum]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Health {
    pub current: i32,
    pub maximum: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            maximum: max,
        }
    }

    /// Remove up to `amount` health and return how much was actually lost.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.clamp(0, self.current);
        self.current -= actual;
        actual
    }

    /// Remaining health as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.maximum <= 0 {
            return 0.0;
        }
        self.current as f32 / self.maximum as f32
    }
}

/// State shared by the player and enemies.
#[derive(Component, Debug, Clone)]
pub struct Character {
    pub health: Health,
    /// Base horizontal speed in pixels per tick
    pub speed: i32,
    /// Y coordinate of the floor under this character
    pub ground_level: i32,
    pub attacking: bool,
}

impl Character {
    pub fn new(max_health: i32, speed: i32, ground_level: i32) -> Self {
        Self {
            health: Health::new(max_health),
            speed,
            ground_level,
            attacking: false,
        }
    }
}

/// Something that can lose health.
pub trait Damageable {
    fn health(&self) -> &Health;

    fn health_mut(&mut self) -> &mut Health;

    /// Apply a hit and return the health actually removed.
    fn take_hit(&mut self, amount: i32) -> i32 {
        self.health_mut().take_damage(amount)
    }

    /// Whether health has fallen to or below `threshold`.
    fn is_down(&self, threshold: i32) -> bool {
        self.health().current <= threshold
    }
}

impl Damageable for Character {
    fn health(&self) -> &Health {
        &self.health
    }

    fn health_mut(&mut self) -> &mut Health {
        &mut self.health
    }
}

/// Named animation strips. Each has a fixed number of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationKind {
    Still,
    Walk,
    Run,
    Jump,
    Crouch,
    Patrol,
    Attack,
}

impl AnimationKind {
    pub const fn frame_count(self) -> u32 {
        match self {
            AnimationKind::Still => 30,
            AnimationKind::Walk => 12,
            AnimationKind::Run => 13,
            AnimationKind::Jump => 18,
            AnimationKind::Crouch => 4,
            AnimationKind::Patrol => 8,
            AnimationKind::Attack => 10,
        }
    }
}

/// The sprite frame a renderer should draw for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnimationFrame {
    pub kind: AnimationKind,
    pub facing_right: bool,
    pub index: u32,
}

/// Something that exposes its current animation frame.
pub trait Animatable {
    fn animation(&self) -> AnimationFrame;
}
