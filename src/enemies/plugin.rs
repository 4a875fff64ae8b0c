//! Enemy plugin - registers all enemy systems.

use bevy::prelude::*;

use super::ai;
use super::data::{load_enemy_definitions, EnemyRegistry};
use super::spawning::spawn_enemies;
use crate::core::{GameState, LevelSet, LevelStart, LogicSet, LogicTick};

/// Enemy plugin - handles enemy definitions, spawning, AI and bullets.
pub struct EnemyPlugin;

impl Plugin for EnemyPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<EnemyRegistry>()
            // Definitions are read once, before the menu shows
            .add_systems(OnEnter(GameState::Loading), load_enemy_definitions)
            .add_systems(LevelStart, spawn_enemies.in_set(LevelSet::Spawn))
            // AI runs inside the logic tick
            .add_systems(
                LogicTick,
                (
                    ai::cool_down_attacks,
                    ai::think,
                    ai::fly_bullets,
                    ai::animate_enemies,
                )
                    .chain()
                    .in_set(LogicSet::Enemies),
            );
    }
}
