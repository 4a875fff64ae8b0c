//! UI module - menus, HUD text and health bars.

mod health_bars;
mod hud;
mod plugin;

pub use health_bars::{bar_width, fill_width, BarTier, HasHealthBar, HealthBarFill};
pub use hud::{HudRoot, ScoreText, TimerText};
pub use plugin::UiPlugin;
