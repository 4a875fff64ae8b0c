//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::components::EnemyStats;
use crate::core::DataLoadError;

/// Directory holding one RON file per enemy type.
pub const ENEMY_DATA_DIR: &str = "assets/data/enemies";

/// Enemy definition loaded from RON file.
///
/// Sizes are in source-art pixels and get multiplied by `scale`. Durations are
/// in logic ticks.
#[derive(Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EnemyDefinition {
    pub name: String,
    pub max_health: i32,
    pub speed: i32,
    pub sprite_size: (i32, i32),
    pub scale: f32,
    pub attack_range: i32,
    pub wait_ticks: u32,
    pub cooldown_ticks: u32,
    pub chase_bonus: i32,
    pub patrol_back: i32,
    pub patrol_ahead: i32,
    pub walk_frames: u32,
    pub walk_loop_start: u32,
    pub attack_frames: u32,
    pub damage: i32,
    pub bullet_speed: f32,
    pub bullet_size: (i32, i32),
    pub muzzle_x: i32,
    pub muzzle_gap: i32,
}

impl Default for EnemyDefinition {
    fn default() -> Self {
        let stats = EnemyStats::default();
        Self {
            name: "Enemy Pro".to_string(),
            max_health: 100,
            speed: 5,
            sprite_size: (35, 45),
            scale: 2.3,
            attack_range: stats.attack_range,
            wait_ticks: stats.wait_ticks,
            cooldown_ticks: stats.cooldown_ticks,
            chase_bonus: stats.chase_bonus,
            patrol_back: stats.patrol_back,
            patrol_ahead: stats.patrol_ahead,
            walk_frames: stats.walk_frames,
            walk_loop_start: stats.walk_loop_start,
            attack_frames: stats.attack_frames,
            damage: stats.damage,
            bullet_speed: stats.bullet_speed,
            bullet_size: (10, 5),
            muzzle_x: stats.muzzle_x,
            muzzle_gap: stats.muzzle_gap,
        }
    }
}

impl EnemyDefinition {
    /// Scale and truncate to whole pixels. The nudge keeps `10 * 2.3` from
    /// truncating to 22.
    fn scaled(&self, (w, h): (i32, i32)) -> IVec2 {
        (Vec2::new(w as f32, h as f32) * self.scale + Vec2::splat(1e-3)).as_ivec2()
    }

    /// On-screen sprite size.
    pub fn body_size(&self) -> IVec2 {
        self.scaled(self.sprite_size)
    }

    /// Convert to EnemyStats component.
    pub fn to_stats(&self) -> EnemyStats {
        EnemyStats {
            attack_range: self.attack_range,
            wait_ticks: self.wait_ticks,
            cooldown_ticks: self.cooldown_ticks,
            chase_bonus: self.chase_bonus,
            patrol_back: self.patrol_back,
            patrol_ahead: self.patrol_ahead,
            walk_frames: self.walk_frames.max(1),
            walk_loop_start: self.walk_loop_start.min(self.walk_frames.saturating_sub(1)),
            attack_frames: self.attack_frames.max(1),
            damage: self.damage,
            bullet_speed: self.bullet_speed,
            bullet_size: self.scaled(self.bullet_size),
            muzzle_x: self.muzzle_x,
            muzzle_gap: self.muzzle_gap,
        }
    }

    /// Parse a definition from RON text. `path` is only used for error reporting.
    pub fn from_ron(contents: &str, path: &str) -> Result<Self, DataLoadError> {
        ron::from_str(contents).map_err(|e| DataLoadError::ParseError {
            path: path.to_string(),
            details: e.to_string(),
        })
    }
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Result<&EnemyDefinition, DataLoadError> {
        self.definitions
            .get(enemy_type)
            .ok_or_else(|| DataLoadError::UnknownEnemyType(enemy_type.to_string()))
    }

    pub fn insert(&mut self, enemy_type: impl Into<String>, definition: EnemyDefinition) {
        self.definitions.insert(enemy_type.into(), definition);
    }
}

fn read_definition(path: &Path) -> Result<EnemyDefinition, DataLoadError> {
    let display = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|e| DataLoadError::ReadError {
        path: display.clone(),
        details: e.to_string(),
    })?;
    EnemyDefinition::from_ron(&contents, &display)
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let enemies_dir = Path::new(ENEMY_DATA_DIR);

    if !enemies_dir.exists() {
        warn!("Enemy definitions directory not found: {:?}", enemies_dir);
        return;
    }

    let Ok(entries) = fs::read_dir(enemies_dir) else {
        warn!("Failed to read enemy definitions directory");
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "ron") {
            let Some(enemy_type) = path.file_stem().and_then(|s| s.to_str()).map(String::from) else {
                continue;
            };

            match read_definition(&path) {
                Ok(definition) => {
                    info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                    registry.insert(enemy_type, definition);
                }
                Err(e) => error!("{}", e),
            }
        }
    }

    info!(
        "Loaded {} enemy definitions",
        registry.definitions.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_definition_matches_default_stats() {
        let definition = EnemyDefinition::default();

        assert_eq!(definition.to_stats(), EnemyStats::default());
        assert_eq!(definition.body_size(), IVec2::new(80, 103));
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let definition = EnemyDefinition::from_ron(
            "(name: \"Grunt\", speed: 7, attack_range: 300)",
            "grunt.ron",
        )
        .unwrap();

        assert_eq!(definition.name, "Grunt");
        assert_eq!(definition.speed, 7);
        assert_eq!(definition.to_stats().attack_range, 300);
        assert_eq!(definition.max_health, 100);
    }

    #[test]
    fn malformed_ron_reports_the_path() {
        let err = EnemyDefinition::from_ron("(speed: \"fast\")", "bad.ron").unwrap_err();

        assert!(matches!(err, DataLoadError::ParseError { ref path, .. } if path == "bad.ron"));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let mut registry = EnemyRegistry::default();
        registry.insert("enemy_pro", EnemyDefinition::default());

        assert!(registry.get("enemy_pro").is_ok());
        assert!(matches!(
            registry.get("dragon"),
            Err(DataLoadError::UnknownEnemyType(name)) if name == "dragon"
        ));
    }

    #[test]
    fn bundled_definition_parses() {
        let path = Path::new(ENEMY_DATA_DIR).join("enemy_pro.ron");
        let definition = read_definition(&path).unwrap();

        assert_eq!(definition.to_stats(), EnemyStats::default());
    }
}
