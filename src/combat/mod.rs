//! Combat module - player projectiles, hit resolution and deaths.

mod components;
mod plugin;
mod projectiles;
mod systems;

pub use components::*;
pub use plugin::CombatPlugin;
pub use projectiles::{first_hit, is_off_screen, player_shot};
pub use systems::{apply_damage, handle_deaths};
