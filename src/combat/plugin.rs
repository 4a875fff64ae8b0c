//! Combat plugin - projectiles, damage and deaths.

use bevy::prelude::*;

use super::systems;

/// Combat plugin - handles the projectile registry and damage resolution.
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        systems::setup_combat_systems(app);
    }
}
