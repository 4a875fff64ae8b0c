//! Game state definitions that control the overall flow of the game.
//!
//! States determine which systems run at any given time. The simulation
//! clocks only advance in `InGame`; the level is torn down when leaving
//! `GameOver` or when returning to the main menu.

use bevy::prelude::*;

/// Main game states - controls overall game flow.
///
/// - Start in `Loading` to read data files
/// - Move to `MainMenu` when loading completes
/// - Enter `InGame` when the player starts a run
/// - `Paused` freezes the simulation but keeps the level alive
/// - `GameOver` once the level is completed or the player dies
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum GameState {
    /// Initial state - loading config and enemy data
    #[default]
    Loading,
    /// Title screen
    MainMenu,
    /// Active gameplay
    InGame,
    /// Gameplay frozen under an overlay
    Paused,
    /// Level finished, final score on screen
    GameOver,
}

/// How a level ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOutcome {
    /// Player reached the end of the map
    LevelComplete,
    /// Player health reached zero
    PlayerDied,
}
