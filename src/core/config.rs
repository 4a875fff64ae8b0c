//! Gameplay tuning loaded from an external RON file.
//!
//! Every constant the simulation depends on lives here so a level can be
//! rebalanced without recompiling.

use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::Deserialize;

use super::error::DataLoadError;

/// Default location of the gameplay config.
pub const GAME_CONFIG_PATH: &str = "assets/data/game_config.ron";

/// Gameplay configuration loaded from assets/data/game_config.ron.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: ViewportConfig,
    pub map: MapConfig,
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub timing: LoopTiming,
    pub level: LevelLayout,
    pub scores: ScoreSettings,
}

/// Visible window area in pixels.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: i32,
    pub height: i32,
}

/// Scrolling map dimensions and the zones that drive the camera.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    /// Player world X (or screen X when moving left) at which the map scrolls instead of the sprite
    pub scroll_zone: i32,
    /// Distance from the map end that completes the level
    pub level_end_margin: i32,
    /// Multiplier from player speed and tick seconds to scroll pixels
    pub scroll_factor: f32,
}

/// Player movement constants.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub spawn: (i32, i32),
    pub size: (i32, i32),
    pub max_health: i32,
    pub speed: i32,
    pub running_speed: i32,
    pub jump_velocity: i32,
    pub gravity: i32,
    pub ground_level: i32,
}

/// Player projectile and damage rules.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Pixels per projectile tick
    pub bullet_speed: f32,
    pub bullet_damage: i32,
    pub bullet_size: (i32, i32),
    /// Spawn offset from the player's top-left corner (mirrored on X when facing left)
    pub muzzle_offset: (i32, i32),
    /// Projectiles beyond this many pixels outside the viewport are retired
    pub cull_margin: i32,
    pub hit_score: u32,
    /// Enemies at or below this health are removed
    pub death_threshold: i32,
}

/// Tick rates of the two simulation clocks.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LoopTiming {
    pub logic_hz: f64,
    pub projectile_hz: f64,
    /// Longest frame the driver will catch up on, in seconds
    pub max_frame_time: f64,
}

/// Enemy roster and scoring rules for the level.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub enemy_type: String,
    pub first_spawn_x: i32,
    pub last_spawn_x: i32,
    pub spawn_spacing: i32,
    pub enemy_ground: i32,
    /// Seconds under which the player still earns a time bonus
    pub par_time: u32,
    pub bonus_per_second: u32,
}

/// High-score table settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScoreSettings {
    pub path: String,
    pub player_name: String,
    pub max_entries: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            map: MapConfig::default(),
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            timing: LoopTiming::default(),
            level: LevelLayout::default(),
            scores: ScoreSettings::default(),
        }
    }
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 600,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 10000,
            scroll_zone: 500,
            level_end_margin: 110,
            scroll_factor: 16.0,
        }
    }
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            spawn: (150, 400),
            size: (70, 120),
            max_health: 100,
            speed: 11,
            running_speed: 30,
            jump_velocity: 20,
            gravity: 3,
            ground_level: 400,
        }
    }
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            bullet_speed: 30.0,
            bullet_damage: 19,
            bullet_size: (10, 5),
            muzzle_offset: (50, 50),
            cull_margin: 50,
            hit_score: 100,
            death_threshold: 10,
        }
    }
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self {
            logic_hz: 20.0,
            projectile_hz: 60.0,
            max_frame_time: 0.25,
        }
    }
}

impl Default for LevelLayout {
    fn default() -> Self {
        Self {
            enemy_type: "enemy_pro".to_string(),
            first_spawn_x: 900,
            last_spawn_x: 10000,
            spawn_spacing: 600,
            enemy_ground: 445,
            par_time: 300,
            bonus_per_second: 10,
        }
    }
}

impl Default for ScoreSettings {
    fn default() -> Self {
        Self {
            path: "highscores.txt".to_string(),
            player_name: "Anonymous".to_string(),
            max_entries: 10,
        }
    }
}

impl LevelLayout {
    /// X coordinates of every enemy spawn point, left to right.
    pub fn spawn_points(&self) -> impl Iterator<Item = i32> {
        let step = self.spawn_spacing.max(1) as usize;
        (self.first_spawn_x..=self.last_spawn_x).step_by(step)
    }
}

impl GameConfig {
    /// Parse a config from RON text. `path` is only used for error reporting.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }

    /// Read and parse a config file.
    pub fn load_from(path: &Path) -> Result<Self, DataLoadError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(DataLoadError::FileNotFound(display));
        }
        let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
            path: display.clone(),
            details: e.to_string(),
        })?;
        Self::from_ron(&contents, &display)
    }

    /// Load the config from its default location, falling back to defaults.
    pub fn load() -> Self {
        match Self::load_from(Path::new(GAME_CONFIG_PATH)) {
            Ok(config) => {
                info!("Loaded game config from {}", GAME_CONFIG_PATH);
                config
            }
            Err(e @ DataLoadError::FileNotFound(_)) => {
                warn!("{}. Using defaults.", e);
                Self::default()
            }
            Err(e) => {
                error!("{}. Using defaults.", e);
                Self::default()
            }
        }
    }
}
