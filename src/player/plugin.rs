//! Player plugin - input, movement and player spawning.

use bevy::prelude::*;

use super::input::{handle_keyboard, sync_held_keys, KeyBindings};
use super::movement;
use crate::core::{drive_simulation, GameState, LevelSet, LevelStart};

/// Player plugin - handles player spawning, keyboard intents and movement.
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        // Set up movement systems
        movement::setup_movement_systems(app);

        app.init_resource::<KeyBindings>()
            .add_systems(LevelStart, movement::spawn_player.in_set(LevelSet::Spawn))
            .add_systems(
                Update,
                handle_keyboard
                    .before(drive_simulation)
                    .run_if(in_state(GameState::InGame)),
            )
            .add_systems(OnExit(GameState::Paused), sync_held_keys);
    }
}
