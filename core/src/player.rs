//! Player run state and move validation
//!
//! ```text
//!   Idle --first accepted move--> Active --reach exit--> Won
//!                                  |  ^
//!                           pause  v  | resume
//!                                 Paused
//! ```
//!
//! Every `try_move` is all-or-nothing: a rejected request leaves the state
//! exactly as it was. Time comes from the caller as milliseconds on any
//! monotonic clock.

use serde::{Deserialize, Serialize};

use crate::grid::{Direction, Maze, Position};

/// Running score bonus for each coin picked up
pub const ITEM_REWARD: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunPhase {
    Idle,
    Active,
    Paused,
    Won,
}

/// Outcome of a single move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    /// Out of bounds, into a wall, paused or already won; nothing changed
    Rejected,
    Moved { collected: bool },
    ReachedExit { collected: bool },
}

impl MoveResult {
    pub fn accepted(self) -> bool {
        !matches!(self, MoveResult::Rejected)
    }
}

/// Telemetry of a run, the input to scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub elapsed_ms: u64,
    pub moves: u32,
    pub items_collected: u32,
    pub running_score: u64,
    pub phase: RunPhase,
}

/// Mutable per-attempt state over one maze
#[derive(Debug, Clone)]
pub struct RunState {
    position: Position,
    exit: Position,
    moves: u32,
    items_collected: u32,
    running_score: u64,
    phase: RunPhase,
    started_at: Option<u64>,
    paused_at: Option<u64>,
    paused_total: u64,
    finished_elapsed: Option<u64>,
    collected: Vec<bool>,
}

impl RunState {
    pub fn new(maze: &Maze) -> Self {
        Self {
            position: maze.entrance(),
            exit: maze.exit(),
            moves: 0,
            items_collected: 0,
            running_score: 0,
            phase: RunPhase::Idle,
            started_at: None,
            paused_at: None,
            paused_total: 0,
            finished_elapsed: None,
            collected: vec![false; maze.width() * maze.height()],
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn items_collected(&self) -> u32 {
        self.items_collected
    }

    pub fn running_score(&self) -> u64 {
        self.running_score
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn is_won(&self) -> bool {
        self.phase == RunPhase::Won
    }

    /// Per-cell flags for coins already picked up, row-major
    pub fn collected_mask(&self) -> &[bool] {
        &self.collected
    }

    /// Whether a coin is still lying at `pos`
    pub fn item_available(&self, maze: &Maze, pos: Position) -> bool {
        maze.cell(pos).is_some_and(|cell| cell.item.is_some()) && !self.collected[maze.index(pos)]
    }

    /// Attempt one step in `dir`
    pub fn try_move(&mut self, maze: &Maze, dir: Direction, now_ms: u64) -> MoveResult {
        if !matches!(self.phase, RunPhase::Idle | RunPhase::Active) {
            return MoveResult::Rejected;
        }

        let Some(target) = self.position.step(dir) else {
            return MoveResult::Rejected;
        };
        if !maze.in_bounds(target) || maze.wall_between(self.position, target) {
            return MoveResult::Rejected;
        }

        if self.phase == RunPhase::Idle {
            self.phase = RunPhase::Active;
            self.started_at = Some(now_ms);
        }

        self.position = target;
        self.moves += 1;

        let collected = self.item_available(maze, target);
        if collected {
            let idx = maze.index(target);
            self.collected[idx] = true;
            self.items_collected += 1;
            self.running_score += ITEM_REWARD;
        }

        if target == self.exit {
            self.finished_elapsed = Some(self.elapsed_ms(now_ms));
            self.phase = RunPhase::Won;
            return MoveResult::ReachedExit { collected };
        }

        MoveResult::Moved { collected }
    }

    /// Suspend the clock; only an active run can pause
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.phase != RunPhase::Active {
            return false;
        }
        self.phase = RunPhase::Paused;
        self.paused_at = Some(now_ms);
        true
    }

    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.phase != RunPhase::Paused {
            return false;
        }
        if let Some(at) = self.paused_at.take() {
            self.paused_total += now_ms.saturating_sub(at);
        }
        self.phase = RunPhase::Active;
        true
    }

    /// Time spent actively playing
    ///
    /// Zero before the first move, frozen once won and not advancing while
    /// paused.
    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if let Some(done) = self.finished_elapsed {
            return done;
        }
        let Some(start) = self.started_at else {
            return 0;
        };
        let end = self.paused_at.unwrap_or(now_ms);
        end.saturating_sub(start).saturating_sub(self.paused_total)
    }

    pub fn summary(&self, now_ms: u64) -> RunSummary {
        RunSummary {
            elapsed_ms: self.elapsed_ms(now_ms),
            moves: self.moves,
            items_collected: self.items_collected,
            running_score: self.running_score,
            phase: self.phase,
        }
    }
}
