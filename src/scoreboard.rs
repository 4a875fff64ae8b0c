//! High-score persistence.
//!
//! Scores live in a plain text file, one `name,score` pair per line, sorted
//! best first and capped at a fixed number of entries. Loading is best-effort:
//! a missing file is an empty table and malformed lines are skipped.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use thiserror::Error;

use crate::core::{drive_simulation, GameConfig, GameEndedEvent, GameState, ScoreSettings};

/// Errors raised while writing the score file.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error("Failed to write scores to '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// One row of the high-score table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    fn parse(line: &str) -> Option<Self> {
        let (name, score) = line.rsplit_once(',')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let score = score.trim().parse().ok()?;
        Some(Self {
            name: name.to_string(),
            score,
        })
    }

    fn to_line(&self) -> String {
        format!("{},{}", self.name, self.score)
    }
}

/// A score file and its size limit.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    path: PathBuf,
    max_entries: usize,
}

impl ScoreBoard {
    pub fn new(path: impl Into<PathBuf>, max_entries: usize) -> Self {
        Self {
            path: path.into(),
            max_entries,
        }
    }

    pub fn from_settings(settings: &ScoreSettings) -> Self {
        Self::new(&settings.path, settings.max_entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the table, best first.
    pub fn load(&self) -> Vec<ScoreEntry> {
        let Ok(contents) = fs::read_to_string(&self.path) else {
            return Vec::new();
        };
        let mut entries: Vec<ScoreEntry> = contents
            .lines()
            .filter_map(|line| {
                let entry = ScoreEntry::parse(line);
                if entry.is_none() && !line.trim().is_empty() {
                    debug!("Skipping malformed score line: {:?}", line);
                }
                entry
            })
            .collect();
        rank(&mut entries, self.max_entries);
        entries
    }

    /// Add a score and write the table back. Returns the new table.
    pub fn save(&self, name: &str, score: u32) -> Result<Vec<ScoreEntry>, ScoreError> {
        let mut entries = self.load();
        entries.push(ScoreEntry {
            name: sanitize_name(name),
            score,
        });
        rank(&mut entries, self.max_entries);

        let mut contents: String = entries
            .iter()
            .map(ScoreEntry::to_line)
            .collect::<Vec<_>>()
            .join("\n");
        contents.push('\n');

        fs::write(&self.path, contents).map_err(|source| ScoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        Ok(entries)
    }
}

/// Sort best first and keep the top `max_entries`. Ties keep file order.
fn rank(entries: &mut Vec<ScoreEntry>, max_entries: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(max_entries);
}

/// Names are stored unquoted, so separators and line breaks are replaced.
/// A blank name becomes "Anonymous".
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| if c == ',' || c.is_control() { ' ' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        "Anonymous".to_string()
    } else {
        cleaned.trim().to_string()
    }
}

/// The high-score table as last read or written.
#[derive(Resource, Debug, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreEntry>,
}

/// Scoreboard plugin - loads the table at startup and records final scores.
pub struct ScoreboardPlugin;

impl Plugin for ScoreboardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<HighScores>()
            .add_systems(OnEnter(GameState::MainMenu), load_high_scores)
            .add_systems(
                Update,
                record_final_score
                    .after(drive_simulation)
                    .run_if(in_state(GameState::InGame)),
            );
    }
}

fn load_high_scores(config: Res<GameConfig>, mut high_scores: ResMut<HighScores>) {
    high_scores.entries = ScoreBoard::from_settings(&config.scores).load();
}

/// Save the final score of a finished level.
fn record_final_score(
    config: Res<GameConfig>,
    mut ended_events: EventReader<GameEndedEvent>,
    mut high_scores: ResMut<HighScores>,
) {
    for event in ended_events.read() {
        let board = ScoreBoard::from_settings(&config.scores);
        match board.save(&config.scores.player_name, event.final_score) {
            Ok(entries) => {
                info!("Score {} saved to {}", event.final_score, board.path().display());
                for (rank, entry) in entries.iter().enumerate() {
                    info!("{:>2}. {} {}", rank + 1, entry.name, entry.score);
                }
                high_scores.entries = entries;
            }
            Err(e) => error!("{}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_board(test: &str) -> ScoreBoard {
        let path = std::env::temp_dir().join(format!(
            "rebel_assault_{}_{}.txt",
            test,
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        ScoreBoard::new(path, 10)
    }

    #[test]
    fn missing_file_is_an_empty_table() {
        let board = temp_board("missing");
        assert!(board.load().is_empty());
    }

    #[test]
    fn saves_are_sorted_best_first() {
        let board = temp_board("sorted");

        board.save("Ana", 300).unwrap();
        board.save("Ben", 900).unwrap();
        let entries = board.save("Cy", 500).unwrap();

        let scores: Vec<u32> = entries.iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![900, 500, 300]);
        assert_eq!(board.load(), entries);
        let _ = fs::remove_file(board.path());
    }

    #[test]
    fn table_keeps_the_top_ten() {
        let board = temp_board("top_ten");

        for score in 0..12 {
            board.save("Player", score * 100).unwrap();
        }

        let entries = board.load();
        assert_eq!(entries.len(), 10);
        assert_eq!(entries[0].score, 1100);
        assert_eq!(entries[9].score, 200);
        let _ = fs::remove_file(board.path());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let board = temp_board("malformed");
        fs::write(board.path(), "Ana,300\ngarbage\nBen,abc\n,50\nCy,-4\n\nDee, 700\n").unwrap();

        let entries = board.load();

        assert_eq!(
            entries,
            vec![
                ScoreEntry { name: "Dee".to_string(), score: 700 },
                ScoreEntry { name: "Ana".to_string(), score: 300 },
            ]
        );
        let _ = fs::remove_file(board.path());
    }

    #[test]
    fn names_are_cleaned_before_saving() {
        assert_eq!(sanitize_name("  "), "Anonymous");
        assert_eq!(sanitize_name("Han,Solo"), "Han Solo");
        assert_eq!(sanitize_name("Leia\n"), "Leia");

        let board = temp_board("names");
        let entries = board.save("a,b", 10).unwrap();
        assert_eq!(entries[0].name, "a b");
        assert_eq!(board.load()[0].name, "a b");
        let _ = fs::remove_file(board.path());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let board = ScoreBoard::new(std::env::temp_dir().join("no_such_dir_rebel").join("x.txt"), 10);
        assert!(matches!(board.save("Ana", 1), Err(ScoreError::Io { .. })));
    }
}
