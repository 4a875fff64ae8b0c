//! Rebel Assault - a 2D side-scrolling shooter in Bevy.
//!
//! The player runs right across a long map, shooting patrolling enemies that
//! shoot back. Reaching the end of the map completes the level with a time
//! bonus; losing all health ends it with the plain score.
//!
//! # Architecture
//!
//! The game is organized into plugins, each handling a specific aspect:
//!
//! - **Core**: Game states, global events, config, the 20 Hz logic and 60 Hz projectile ticks
//! - **Player**: Keyboard intents, movement, jumping and map-scroll coupling
//! - **Enemies**: Enemy definitions, patrol/chase/attack AI and enemy bullets
//! - **Combat**: Player projectiles, hit resolution, damage and deaths
//! - **Camera**: Map scroll offset and the scrolling backdrop
//! - **Rendering**: Render snapshot after each tick and sprite placement
//! - **Audio**: Shot sounds and background music
//! - **UI**: Menus, HUD, health bars
//! - **Scoreboard**: High-score file

pub mod audio;
pub mod camera;
pub mod combat;
pub mod core;
pub mod enemies;
pub mod player;
pub mod rendering;
pub mod scoreboard;
pub mod ui;

use bevy::prelude::*;

/// Main game plugin that adds all sub-plugins.
pub struct RebelAssaultPlugin;

impl Plugin for RebelAssaultPlugin {
    fn build(&self, app: &mut App) {
        app
            // Core systems (must be first)
            .add_plugins(core::CorePlugin)

            // Camera and map scroll
            .add_plugins(camera::CameraPlugin)

            // Player systems
            .add_plugins(player::PlayerPlugin)

            // Enemy systems
            .add_plugins(enemies::EnemyPlugin)

            // Combat systems
            .add_plugins(combat::CombatPlugin)

            // Rendering systems
            .add_plugins(rendering::RenderingPlugin)

            // Audio
            .add_plugins(audio::SoundPlugin)

            // High scores
            .add_plugins(scoreboard::ScoreboardPlugin)

            // UI systems
            .add_plugins(ui::UiPlugin);
    }
}
