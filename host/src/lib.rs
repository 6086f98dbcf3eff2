use maze_core::{
    directions_along, Difficulty, Direction, GameSession, MoveResult, Position, ScoringConfig,
    WinReport,
};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::path::Path;
use std::rc::Rc;

/// Environment variable consulted for a seed when none is configured
pub const SEED_ENV_VAR: &str = "MAZE_SEED";

/// Simulated time between replayed moves
pub const DEFAULT_MOVE_INTERVAL_MS: u64 = 250;

/// Longest simulated gap between replayed moves (1 hour)
pub const MAX_MOVE_INTERVAL_MS: u64 = 3_600_000;

/// Largest moves file accepted (10MB)
const MAX_MOVES_FILE_BYTES: usize = 10_000_000;

/// Largest moves list accepted
pub const MAX_MOVES: usize = 10_000;

/// Host settings, loadable from a JSON file
///
/// Every field is optional in the file; missing ones take defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub difficulty: Difficulty,
    /// Seed for reproducible levels; random when absent
    pub seed: Option<u64>,
    pub move_interval_ms: Option<u64>,
    pub scoring: ScoringConfig,
}

impl HostConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let json = fs::read_to_string(path)?;
        let config: HostConfig = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject move intervals and scoring values outside the accepted range
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        if self.move_interval_ms() > MAX_MOVE_INTERVAL_MS {
            return Err(format!(
                "move_interval_ms {} exceeds {}",
                self.move_interval_ms(),
                MAX_MOVE_INTERVAL_MS
            )
            .into());
        }
        self.scoring.validate()?;
        Ok(())
    }

    /// The configured seed, else `MAZE_SEED`, else a fresh random one
    pub fn resolve_seed(&self) -> Result<u64, Box<dyn std::error::Error>> {
        if let Some(seed) = self.seed {
            return Ok(seed);
        }
        match std::env::var(SEED_ENV_VAR) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(seed) => Ok(seed),
                Err(_) => Err(format!(
                    "Invalid {}: '{}'. Must be a positive integer.",
                    SEED_ENV_VAR, value
                )
                .into()),
            },
            Err(_) => Ok(rand::random()),
        }
    }

    pub fn move_interval_ms(&self) -> u64 {
        self.move_interval_ms.unwrap_or(DEFAULT_MOVE_INTERVAL_MS)
    }
}

/// Exported description of a generated level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedMaze {
    pub difficulty: Difficulty,
    pub seed: u64,
    pub width: usize,
    pub height: usize,

    /// Doubled-resolution grid (0=wall, 1=path)
    pub grid: Vec<Vec<u8>>,

    pub solution: Vec<Position>,

    /// The solution as direction codes (0=up, 1=right, 2=down, 3=left)
    pub solution_moves: Vec<u8>,

    pub coins: Vec<Position>,

    /// Text rendering, `#` walls, `$` coins
    pub ascii: String,
}

/// Result of replaying a moves list against a seeded level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub seed: u64,
    pub difficulty: Difficulty,
    pub reached_exit: bool,
    pub moves_accepted: u32,
    pub moves_rejected: u32,
    pub items_collected: u32,
    pub elapsed_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub win: Option<WinReport>,
}

/// Generate the level a seed and difficulty describe
///
/// # Example
/// ```no_run
/// use host::{generate_level, HostConfig};
///
/// let config = HostConfig { seed: Some(2024), ..HostConfig::default() };
/// let level = generate_level(&config).unwrap();
/// println!("{}", level.ascii);
/// ```
pub fn generate_level(config: &HostConfig) -> Result<GeneratedMaze, Box<dyn std::error::Error>> {
    let seed = config.resolve_seed()?;
    tracing::info!("Generating {} maze for seed {}", config.difficulty, seed);

    let session = GameSession::seeded(config.difficulty, seed, config.scoring.clone())?;
    let level = session.level();
    let maze = level.maze();

    let coins = maze
        .positions()
        .filter(|&pos| session.item_at(pos))
        .collect();

    Ok(GeneratedMaze {
        difficulty: config.difficulty,
        seed,
        width: maze.width(),
        height: maze.height(),
        grid: maze.to_binary_grid(),
        solution: level.solution().to_vec(),
        solution_moves: directions_along(level.solution())
            .into_iter()
            .map(Direction::code)
            .collect(),
        coins,
        ascii: maze.to_string(),
    })
}

/// Replay direction codes against the level for `config`
///
/// Unknown codes count as rejected moves, same as walking into a wall.
/// Moves are spaced `move_interval_ms` apart on a simulated clock.
pub fn replay_moves(
    config: &HostConfig,
    moves: &[u8],
) -> Result<ReplayReport, Box<dyn std::error::Error>> {
    config.validate()?;
    let seed = config.resolve_seed()?;
    let interval = config.move_interval_ms();

    tracing::info!("Replaying {} moves on {} maze seed {}", moves.len(), config.difficulty, seed);

    let win: Rc<RefCell<Option<WinReport>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&win);
    let mut session = GameSession::seeded(config.difficulty, seed, config.scoring.clone())?
        .with_stats_sink(move |report: &WinReport| *sink.borrow_mut() = Some(*report));

    let mut rejected = 0u32;
    let mut now_ms = 0u64;
    for (i, &code) in moves.iter().enumerate() {
        now_ms = (i as u64 + 1)
            .checked_mul(interval)
            .ok_or("Simulated replay clock overflowed")?;
        let result = match Direction::from_code(code) {
            Some(dir) => session.try_move(dir, now_ms),
            None => {
                tracing::warn!("Move {} has invalid direction code {}", i, code);
                MoveResult::Rejected
            }
        };
        if !result.accepted() {
            rejected += 1;
        }
    }

    let run = session.run().summary(now_ms);
    let win = *win.borrow();

    tracing::info!(
        "Replay finished: exit {}, {} accepted, {} rejected",
        if session.run().is_won() { "reached" } else { "not reached" },
        run.moves,
        rejected
    );

    Ok(ReplayReport {
        seed,
        difficulty: config.difficulty,
        reached_exit: session.run().is_won(),
        moves_accepted: run.moves,
        moves_rejected: rejected,
        items_collected: run.items_collected,
        elapsed_ms: run.elapsed_ms,
        score: session.final_score(),
        win,
    })
}

pub fn save_json<T: Serialize>(value: &T, path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load a JSON array of direction codes
pub fn load_moves(path: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let json = fs::read_to_string(path)?;

    // Validate file size (prevent loading gigabytes into memory)
    if json.len() > MAX_MOVES_FILE_BYTES {
        return Err("Moves file is too large (max 10MB)".into());
    }

    let moves: Vec<u8> = serde_json::from_str(&json)?;

    if moves.is_empty() {
        return Err("Moves array is empty".into());
    }

    if moves.len() > MAX_MOVES {
        return Err(format!("Too many moves: {} (max {})", moves.len(), MAX_MOVES).into());
    }

    Ok(moves)
}
