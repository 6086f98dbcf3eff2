use serde::{Deserialize, Serialize};

use crate::error::MazeError;

/// Size preset for a level
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// 11x11
    Easy,
    /// 17x17
    Medium,
    /// 23x23
    Hard,
    /// 31x31
    Expert,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::Expert,
    ];

    /// `(width, height)` in cells
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            Difficulty::Easy => (11, 11),
            Difficulty::Medium => (17, 17),
            Difficulty::Hard => (23, 23),
            Difficulty::Expert => (31, 31),
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
            Difficulty::Expert => 4,
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "expert" => Ok(Difficulty::Expert),
            _ => Err(MazeError::UnknownDifficulty(s.to_string())),
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
            Difficulty::Expert => write!(f, "expert"),
        }
    }
}
