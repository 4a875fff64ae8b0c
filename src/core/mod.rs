//! Core game module - states, events, configuration and the simulation clock.
//!
//! This module provides the foundation that all other game systems build upon.

mod config;
mod entity;
mod error;
mod events;
mod plugin;
mod schedule;
mod session;
mod states;

pub use config::*;
pub use entity::*;
pub use error::DataLoadError;
pub use events::*;
pub use plugin::{start_level, CorePlugin, LevelEntity, LevelSet, LevelStart};
pub use schedule::*;
pub use session::*;
pub use states::*;
