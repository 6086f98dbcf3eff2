use thiserror::Error;

/// Failures surfaced when building a level.
///
/// Rejected moves are not errors; they show up as `MoveResult::Rejected`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    #[error("Invalid maze dimensions {width}x{height}: each side must be between 1 and {max}")]
    InvalidDimensions {
        width: usize,
        height: usize,
        max: usize,
    },

    #[error("Generated {width}x{height} maze has no path from entrance to exit")]
    Unsolvable { width: usize, height: usize },

    #[error("Invalid scoring config: {0}")]
    InvalidScoring(String),

    #[error("Unknown difficulty '{0}'. Must be 'easy', 'medium', 'hard', or 'expert'")]
    UnknownDifficulty(String),
}

pub type Result<T> = std::result::Result<T, MazeError>;
