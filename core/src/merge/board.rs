use core::fmt;
use core::str::FromStr;

use ndarray::{Array2, Axis};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

/// Tile value, `0` marks an empty cell.
pub type Tile = u32;

/// Side length of the square board.
pub const BOARD_SIZE: usize = 4;

/// First tile value that counts as a win.
pub const WINNING_TILE: Tile = 2048;

/// A direction to slide and merge tiles.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    /// Axis the lanes run along: rows for horizontal moves, columns for vertical ones.
    const fn lane_axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis(1),
            Self::Up | Self::Down => Axis(0),
        }
    }

    /// Whether tiles travel towards the high end of each lane.
    const fn towards_end(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(GameError::UnknownDirection(other.to_owned())),
        }
    }
}

/// What a single slide did to the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Shift {
    pub moved: bool,
    /// Sum of the values created by merges.
    pub points: u64,
    /// A merge produced [`WINNING_TILE`].
    pub reached_goal: bool,
}

/// Slides the non-empty tiles of `line` towards index 0, merging equal
/// neighbors from the leading edge outward. A merged tile is not merged again
/// in the same pass.
pub fn slide_line(line: &mut [Tile]) -> Shift {
    let mut tiles: Vec<Tile> = line.iter().copied().filter(|&tile| tile != 0).collect();
    let mut shift = Shift::default();

    for i in 1..tiles.len() {
        if tiles[i - 1] != 0 && tiles[i - 1] == tiles[i] {
            tiles[i - 1] *= 2;
            tiles[i] = 0;
            shift.points += u64::from(tiles[i - 1]);
            shift.reached_goal |= tiles[i - 1] == WINNING_TILE;
        }
    }

    tiles.retain(|&tile| tile != 0);
    tiles.resize(line.len(), 0);

    shift.moved = tiles.as_slice() != &*line;
    line.copy_from_slice(&tiles);
    shift
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeBoard {
    tiles: Array2<Tile>,
}

impl MergeBoard {
    pub fn empty() -> Self {
        Self {
            tiles: Array2::zeros((BOARD_SIZE, BOARD_SIZE)),
        }
    }

    /// Builds a board from rows; every value must be `0` or a power of two ≥ 2.
    pub fn from_rows(rows: [[Tile; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self> {
        let mut board = Self::empty();
        for (coords, &tile) in rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, tile)| ((row, col), tile))
        }) {
            if tile == 1 || (tile != 0 && !tile.is_power_of_two()) {
                return Err(GameError::InvalidPayload {
                    action: "board".to_owned(),
                    reason: format!("{tile} at {coords:?} is not a tile value"),
                });
            }
            board.tiles[coords.to_nd_index()] = tile;
        }
        Ok(board)
    }

    pub fn tile_at(&self, coords: Coord2) -> Tile {
        self.tiles[coords.to_nd_index()]
    }

    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.tiles.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn empty_cells(&self) -> Vec<Coord2> {
        self.tiles
            .indexed_iter()
            .filter(|&(_, &tile)| tile == 0)
            .map(|(coords, _)| coords)
            .collect()
    }

    pub fn count_tiles(&self) -> usize {
        self.tiles.iter().filter(|&&tile| tile != 0).count()
    }

    pub fn is_full(&self) -> bool {
        self.tiles.iter().all(|&tile| tile != 0)
    }

    /// Whether any move could still change the board.
    pub fn has_moves(&self) -> bool {
        if !self.is_full() {
            return true;
        }
        let horizontal = self
            .tiles
            .rows()
            .into_iter()
            .any(|row| row.windows(2).into_iter().any(|pair| pair[0] == pair[1]));
        let vertical = self
            .tiles
            .columns()
            .into_iter()
            .any(|col| col.windows(2).into_iter().any(|pair| pair[0] == pair[1]));
        horizontal || vertical
    }

    /// Slides every lane in `direction`. No random tile is added.
    pub fn shift(&mut self, direction: Direction) -> Shift {
        let mut total = Shift::default();

        for mut lane in self.tiles.lanes_mut(direction.lane_axis()) {
            if direction.towards_end() {
                lane.invert_axis(Axis(0));
            }

            let mut line = lane.to_vec();
            let shift = slide_line(&mut line);
            if shift.moved {
                for (dst, src) in lane.iter_mut().zip(line) {
                    *dst = src;
                }
            }

            total.moved |= shift.moved;
            total.points += shift.points;
            total.reached_goal |= shift.reached_goal;
        }

        total
    }

    /// Puts a 2 (90%) or a 4 (10%) on a uniformly chosen empty cell.
    pub fn spawn_random_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Coord2> {
        let empty = self.empty_cells();
        let &coords = empty.choose(rng)?;
        self.tiles[coords.to_nd_index()] = if rng.random_bool(0.9) { 2 } else { 4 };
        Some(coords)
    }
}

impl Default for MergeBoard {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for MergeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MergeBoard").field(&self.rows()).finish()
    }
}

impl fmt::Display for MergeBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.tiles.rows() {
            let cells: Vec<String> = row.iter().map(|tile| format!("{tile:>5}")).collect();
            writeln!(f, "{}", cells.join("|"))?;
        }
        Ok(())
    }
}
