//! Per-level bookkeeping: score, level clock and the end-of-level latch.

use bevy::prelude::*;

use super::config::LevelLayout;
use super::states::GameOutcome;

/// Score and clock for the level in progress.
#[derive(Resource, Debug, Default)]
pub struct LevelSession {
    pub score: u32,
    /// Simulated seconds since the level started
    pub elapsed: f32,
    outcome: Option<(GameOutcome, u32)>,
}

impl LevelSession {
    /// Whole seconds shown on the level clock.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed.max(0.0) as u32
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome.map(|(outcome, _)| outcome)
    }

    pub fn final_score(&self) -> Option<u32> {
        self.outcome.map(|(_, score)| score)
    }

    /// Latch the end of the level.
    ///
    /// Returns the final score the first time it is called and `None` on
    /// every later call, whatever the outcome.
    pub fn finish(&mut self, outcome: GameOutcome, layout: &LevelLayout) -> Option<u32> {
        if self.is_finished() {
            return None;
        }
        let final_score = final_score(outcome, self.score, self.elapsed_secs(), layout);
        self.outcome = Some((outcome, final_score));
        Some(final_score)
    }
}

/// Score at the end of a level. Completing the level adds a bonus for every
/// second left under par; dying keeps the plain score.
pub fn final_score(outcome: GameOutcome, score: u32, elapsed_secs: u32, layout: &LevelLayout) -> u32 {
    match outcome {
        GameOutcome::LevelComplete => {
            let remaining = layout.par_time.saturating_sub(elapsed_secs);
            score + remaining * layout.bonus_per_second
        }
        GameOutcome::PlayerDied => score,
    }
}

/// Format seconds as `Time: MM:SS`.
pub fn format_clock(elapsed_secs: u32) -> String {
    format!("Time: {:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}
