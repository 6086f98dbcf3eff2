//! Maze engine for the maze mini-game
//!
//! This crate generates perfect mazes, solves them, scatters coins off the
//! solution path, validates player moves and scores completed runs. It draws
//! nothing and reads no input; a host drives it through `GameSession` and
//! reads back `Snapshot`s.
//!
//! Everything is single-threaded and synchronous. Randomness is always
//! injected, so a seeded RNG reproduces a level exactly.

pub mod difficulty;
pub mod error;
pub mod grid;
pub mod items;
pub mod maze_gen;
pub mod player;
pub mod scoring;
pub mod session;
pub mod solver;

// Re-export commonly used types for convenience
pub use difficulty::Difficulty;
pub use error::{MazeError, Result};
pub use grid::{Cell, Direction, Item, Maze, Position};
pub use maze_gen::{generate, MazeBuilder};
pub use player::{MoveResult, RunPhase, RunState, RunSummary, ITEM_REWARD};
pub use scoring::{Progression, ScoringConfig};
pub use session::{GameSession, Level, Snapshot, StatsSink, WinReport};
pub use solver::{directions_along, solve, solve_from};

/// Largest accepted side length, in cells
pub const MAX_DIMENSION: usize = 101;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(MAX_DIMENSION % 2, 1);
        let (w, h) = Difficulty::Expert.dimensions();
        assert!(w <= MAX_DIMENSION && h <= MAX_DIMENSION);
    }
}
