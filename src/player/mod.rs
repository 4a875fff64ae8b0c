//! Player module - player controller, keyboard input and movement.

mod components;
mod input;
mod movement;
mod plugin;

pub use components::*;
pub use input::{held_intent, InputAction, KeyBindings};
pub use movement::{scroll_amount, spawn_player};
pub use plugin::PlayerPlugin;
