use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    pub is_mine: bool,
    pub is_revealed: bool,
    pub is_flagged: bool,
    /// Mines among the 8 neighbors, only meaningful for safe cells.
    pub neighbor_mines: u8,
}

impl Cell {
    /// Neither revealed nor flagged.
    pub const fn is_hidden(self) -> bool {
        !self.is_revealed && !self.is_flagged
    }
}
