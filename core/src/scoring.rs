//! Completion scoring and level progression
//!
//! `score = (time_bonus + move_bonus + item_bonus) * multiplier` with
//! - `time_bonus = max(0, reference_time_ms - elapsed_ms) / 100`
//! - `move_bonus = max(0, reference_moves - moves) * 2`
//! - `item_bonus = items * item_bonus`

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::error::{MazeError, Result};
use crate::player::RunSummary;

/// Wins needed per level tier
pub const COMPLETIONS_PER_LEVEL: u32 = 5;

/// Largest accepted par time (24 hours)
pub const MAX_REFERENCE_TIME_MS: u64 = 86_400_000;

/// Largest accepted per-item bonus
pub const MAX_ITEM_BONUS: u64 = 1_000_000;

/// Par time and move count for one difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub time_ms: u64,
    pub moves: u32,
}

/// Tunable scoring constants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub easy: Reference,
    pub medium: Reference,
    pub hard: Reference,
    pub expert: Reference,
    /// Points per collected item in the final score
    pub item_bonus: u64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            easy: Reference {
                time_ms: 60_000,
                moves: 100,
            },
            medium: Reference {
                time_ms: 120_000,
                moves: 200,
            },
            hard: Reference {
                time_ms: 180_000,
                moves: 350,
            },
            expert: Reference {
                time_ms: 300_000,
                moves: 600,
            },
            item_bonus: 50,
        }
    }
}

impl ScoringConfig {
    pub fn reference(&self, difficulty: Difficulty) -> Reference {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
            Difficulty::Expert => self.expert,
        }
    }

    /// Reject par times and bonuses outside the accepted range
    pub fn validate(&self) -> Result<()> {
        for difficulty in Difficulty::ALL {
            let reference = self.reference(difficulty);
            if reference.time_ms > MAX_REFERENCE_TIME_MS {
                return Err(MazeError::InvalidScoring(format!(
                    "{} time_ms {} exceeds {}",
                    difficulty, reference.time_ms, MAX_REFERENCE_TIME_MS
                )));
            }
        }
        if self.item_bonus > MAX_ITEM_BONUS {
            return Err(MazeError::InvalidScoring(format!(
                "item_bonus {} exceeds {}",
                self.item_bonus, MAX_ITEM_BONUS
            )));
        }
        Ok(())
    }

    /// Final score for a finished run
    ///
    /// Saturates at `u64::MAX` rather than overflowing.
    pub fn score(&self, run: &RunSummary, difficulty: Difficulty) -> u64 {
        let reference = self.reference(difficulty);
        let time_bonus = reference.time_ms.saturating_sub(run.elapsed_ms) / 100;
        let move_bonus = u64::from(reference.moves.saturating_sub(run.moves)) * 2;
        let item_bonus = u64::from(run.items_collected).saturating_mul(self.item_bonus);
        time_bonus
            .saturating_add(move_bonus)
            .saturating_add(item_bonus)
            .saturating_mul(difficulty.multiplier())
    }
}

/// Aggregate progress across levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub total_completed: u32,
    pub level: u32,
    pub best_time_ms: Option<u64>,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            total_completed: 0,
            level: 1,
            best_time_ms: None,
        }
    }
}

impl Progression {
    /// Record a win; returns true when the level tier went up
    pub fn record_win(&mut self, elapsed_ms: u64) -> bool {
        self.total_completed += 1;
        self.best_time_ms = Some(match self.best_time_ms {
            Some(best) => best.min(elapsed_ms),
            None => elapsed_ms,
        });

        if self.total_completed % COMPLETIONS_PER_LEVEL == 0 {
            self.level += 1;
            true
        } else {
            false
        }
    }
}
