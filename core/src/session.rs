//! Game session: level lifecycle around the engine
//!
//! A level start runs generator, solver and coin placement to completion and
//! only then hands the frozen `Level` to a fresh `RunState`. Regenerating
//! replaces level and run state together.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;
use crate::error::{MazeError, Result};
use crate::grid::{Direction, Maze, Position};
use crate::items::place_items;
use crate::maze_gen::generate;
use crate::player::{MoveResult, RunState, RunSummary};
use crate::scoring::{Progression, ScoringConfig};
use crate::solver::{solve, solve_from};

/// Generated maze plus its solution, immutable once built
#[derive(Debug, Clone, Serialize)]
pub struct Level {
    pub difficulty: Difficulty,
    maze: Maze,
    solution: Vec<Position>,
    item_count: usize,
}

impl Level {
    /// Generate, solve and furnish a level
    ///
    /// # Errors
    /// * `MazeError::Unsolvable` if the generator produced a disconnected maze
    pub fn generate<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Result<Self> {
        let (width, height) = difficulty.dimensions();
        let maze = generate(width, height, rng)?;
        Self::from_maze(difficulty, maze, rng)
    }

    /// Solve and furnish an already carved maze
    pub(crate) fn from_maze<R: Rng + ?Sized>(
        difficulty: Difficulty,
        maze: Maze,
        rng: &mut R,
    ) -> Result<Self> {
        let solution = solve(&maze);
        if solution.is_empty() {
            return Err(MazeError::Unsolvable {
                width: maze.width(),
                height: maze.height(),
            });
        }

        let (maze, item_count) = place_items(maze, &solution, rng);

        tracing::info!(
            "Level ready: {} {}x{}, solution {} steps, {} coins",
            difficulty,
            maze.width(),
            maze.height(),
            solution.len() - 1,
            item_count
        );

        Ok(Self {
            difficulty,
            maze,
            solution,
            item_count,
        })
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn solution(&self) -> &[Position] {
        &self.solution
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }
}

/// Payload delivered to the stats sink on every win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinReport {
    pub score: u64,
    pub total_completed: u32,
    pub best_time_ms: u64,
    pub level: u32,
}

/// Receiver for completed-level statistics
pub trait StatsSink {
    fn on_win(&mut self, report: &WinReport);
}

impl<F: FnMut(&WinReport)> StatsSink for F {
    fn on_win(&mut self, report: &WinReport) {
        self(report)
    }
}

/// Read-only view handed to a renderer each frame
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub difficulty: Difficulty,
    pub maze: &'a Maze,
    pub player: Position,
    pub exit: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<&'a [Position]>,
    pub collected: &'a [bool],
    pub run: RunSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u64>,
}

/// One player's sequence of levels
pub struct GameSession<R: Rng = StdRng> {
    rng: R,
    scoring: ScoringConfig,
    progression: Progression,
    level: Level,
    run: RunState,
    show_solution: bool,
    final_score: Option<u64>,
    sink: Option<Box<dyn StatsSink>>,
}

impl GameSession<StdRng> {
    /// Session whose levels are reproducible from `seed`
    pub fn seeded(difficulty: Difficulty, seed: u64, scoring: ScoringConfig) -> Result<Self> {
        Self::new(difficulty, StdRng::seed_from_u64(seed), scoring)
    }
}

impl<R: Rng> GameSession<R> {
    /// # Errors
    /// * `MazeError::InvalidScoring` if `scoring` is out of range
    pub fn new(difficulty: Difficulty, mut rng: R, scoring: ScoringConfig) -> Result<Self> {
        scoring.validate()?;
        let level = Level::generate(difficulty, &mut rng)?;
        let run = RunState::new(level.maze());
        Ok(Self {
            rng,
            scoring,
            progression: Progression::default(),
            level,
            run,
            show_solution: false,
            final_score: None,
            sink: None,
        })
    }

    pub fn with_stats_sink(mut self, sink: impl StatsSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn run(&self) -> &RunState {
        &self.run
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn difficulty(&self) -> Difficulty {
        self.level.difficulty
    }

    /// Score of the current level, once won
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn solution_visible(&self) -> bool {
        self.show_solution
    }

    /// Replace the level and run state with a fresh maze
    ///
    /// On error the current level stays in place.
    pub fn new_level(&mut self, difficulty: Difficulty) -> Result<()> {
        let level = Level::generate(difficulty, &mut self.rng)?;
        self.run = RunState::new(level.maze());
        self.level = level;
        self.final_score = None;
        self.show_solution = false;
        Ok(())
    }

    /// New maze at the current difficulty
    pub fn regenerate(&mut self) -> Result<()> {
        self.new_level(self.level.difficulty)
    }

    pub fn toggle_solution(&mut self) -> bool {
        self.show_solution = !self.show_solution;
        self.show_solution
    }

    pub fn pause(&mut self, now_ms: u64) -> bool {
        self.run.pause(now_ms)
    }

    pub fn resume(&mut self, now_ms: u64) -> bool {
        self.run.resume(now_ms)
    }

    /// Whether a coin still lies at `pos`
    pub fn item_at(&self, pos: Position) -> bool {
        self.run.item_available(self.level.maze(), pos)
    }

    /// Apply one move; scores and reports the level when it is won
    pub fn try_move(&mut self, dir: Direction, now_ms: u64) -> MoveResult {
        let result = self.run.try_move(self.level.maze(), dir, now_ms);

        if let MoveResult::ReachedExit { .. } = result {
            self.finish_level(now_ms);
        }

        result
    }

    fn finish_level(&mut self, now_ms: u64) {
        let summary = self.run.summary(now_ms);
        let score = self.scoring.score(&summary, self.level.difficulty);
        let leveled_up = self.progression.record_win(summary.elapsed_ms);
        self.final_score = Some(score);

        let report = WinReport {
            score,
            total_completed: self.progression.total_completed,
            best_time_ms: self.progression.best_time_ms.unwrap_or(summary.elapsed_ms),
            level: self.progression.level,
        };

        tracing::info!(
            "Level won: score {} in {} moves, {} ms, {} coins{}",
            score,
            summary.moves,
            summary.elapsed_ms,
            summary.items_collected,
            if leveled_up { " (level up)" } else { "" }
        );

        if let Some(sink) = self.sink.as_mut() {
            sink.on_win(&report);
        }
    }

    /// Next direction along the shortest route from the player to the exit
    pub fn hint(&self) -> Option<Direction> {
        if self.run.is_won() {
            return None;
        }
        let maze = self.level.maze();
        let path = solve_from(maze, self.run.position(), maze.exit());
        match path.as_slice() {
            [from, to, ..] => from.direction_to(*to),
            _ => None,
        }
    }

    pub fn snapshot(&self, now_ms: u64) -> Snapshot<'_> {
        let maze = self.level.maze();
        Snapshot {
            difficulty: self.level.difficulty,
            maze,
            player: self.run.position(),
            exit: maze.exit(),
            solution: self.show_solution.then(|| self.level.solution()),
            collected: self.run.collected_mask(),
            run: self.run.summary(now_ms),
            final_score: self.final_score,
        }
    }
}
