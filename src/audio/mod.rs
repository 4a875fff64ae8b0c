//! Audio module - sound effects for simulation cues and background music.

mod plugin;

pub use plugin::{sound_path, MusicChannel, SoundLibrary, SoundPlugin};
