use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: usize,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: usize) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(width: Coord, height: Coord, mines: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let mines = mines.min(width * height);
        Self::new_unchecked(width, height, mines)
    }

    pub const fn total_cells(&self) -> usize {
        self.width * self.height
    }

    /// Board dimensions as `(rows, cols)`.
    pub const fn dim(&self) -> Coord2 {
        (self.height, self.width)
    }
}

/// Named presets, the only sizes the protocol can ask for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];

    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked(9, 9, 10),
            Self::Intermediate => GameConfig::new_unchecked(16, 16, 40),
            Self::Expert => GameConfig::new_unchecked(30, 16, 99),
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Expert => "expert",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.name() == s)
            .ok_or_else(|| GameError::UnknownDifficulty(s.to_owned()))
    }
}
