use core::ops::Index;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cell grid of a mine game plus the counters derived from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MineBoard {
    cells: Array2<Cell>,
    mine_count: usize,
    revealed_count: usize,
    flagged_count: usize,
}

impl MineBoard {
    /// A board with no mines laid yet. `mine_count` is the planned count.
    pub fn empty(config: GameConfig) -> Self {
        Self {
            cells: Array2::default(config.dim()),
            mine_count: config.mines,
            revealed_count: 0,
            flagged_count: 0,
        }
    }

    /// A board of `dim` `(rows, cols)` with mines at exactly `mine_coords`.
    pub fn from_mine_coords(dim: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mask: Array2<bool> = Array2::default(dim);
        for &coords in mine_coords {
            if coords.0 >= dim.0 || coords.1 >= dim.1 {
                return Err(GameError::InvalidCoords);
            }
            mask[coords.to_nd_index()] = true;
        }

        let mut board = Self::empty(GameConfig::new(dim.1, dim.0, 0));
        board.lay_mines(&mask);
        Ok(board)
    }

    /// Copies `mask` into the cells and computes every neighbor count.
    pub fn lay_mines(&mut self, mask: &Array2<bool>) {
        for (cell, &is_mine) in self.cells.iter_mut().zip(mask.iter()) {
            cell.is_mine = is_mine;
        }
        self.mine_count = mask.iter().filter(|&&is_mine| is_mine).count();

        for (row, col) in self.coords() {
            let neighbor_mines = if self.cells[[row, col]].is_mine {
                0
            } else {
                self.adjacent_mine_count((row, col))
            };
            self.cells[[row, col]].neighbor_mines = neighbor_mines;
        }
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.dim();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// `(rows, cols)`
    pub fn dim(&self) -> Coord2 {
        self.cells.dim()
    }

    pub fn width(&self) -> Coord {
        self.dim().1
    }

    pub fn height(&self) -> Coord {
        self.dim().0
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> usize {
        self.total_cells() - self.mine_count
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn flagged_count(&self) -> usize {
        self.flagged_count
    }

    pub fn all_safe_revealed(&self) -> bool {
        self.revealed_count == self.safe_cell_count()
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.cells[coords.to_nd_index()]
    }

    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        let count = self
            .cells
            .iter_neighbors(coords)
            .filter(|&pos| self[pos].is_mine)
            .count();
        // at most 8 neighbors
        count as u8
    }

    /// Reveals `start` and, from every zero cell reached, its hidden
    /// neighbors. Each cell is revealed at most once; flagged cells and
    /// board edges stop the fill.
    pub fn reveal_from(&mut self, start: Coord2) -> RevealOutcome {
        if !self[start].is_hidden() {
            return RevealOutcome::NoChange;
        }

        if self[start].is_mine {
            self.cells[start.to_nd_index()].is_revealed = true;
            self.revealed_count += 1;
            return RevealOutcome::HitMine;
        }

        let mut to_visit = vec![start];
        while let Some(coords) = to_visit.pop() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if !cell.is_hidden() {
                continue;
            }
            cell.is_revealed = true;
            self.revealed_count += 1;

            if cell.neighbor_mines == 0 {
                to_visit.extend(
                    self.cells
                        .iter_neighbors(coords)
                        .filter(|&pos| self.cells[pos.to_nd_index()].is_hidden()),
                );
            }
        }

        RevealOutcome::Revealed
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> MarkOutcome {
        let cell = &mut self.cells[coords.to_nd_index()];
        if cell.is_revealed {
            return MarkOutcome::NoChange;
        }

        cell.is_flagged = !cell.is_flagged;
        if cell.is_flagged {
            self.flagged_count += 1;
        } else {
            self.flagged_count -= 1;
        }
        MarkOutcome::Changed
    }

    /// Shows every mine that is not flagged.
    pub fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_mine && !cell.is_flagged {
                cell.is_revealed = true;
            }
        }
    }

    pub fn flag_all_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_mine && !cell.is_flagged {
                cell.is_flagged = true;
                self.flagged_count += 1;
            }
        }
    }

    fn coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (rows, cols) = self.dim();
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

impl Index<Coord2> for MineBoard {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(dim: Coord2, mines: &[Coord2]) -> MineBoard {
        MineBoard::from_mine_coords(dim, mines).unwrap()
    }

    #[test]
    fn neighbor_counts_cover_all_eight_directions() {
        let b = board((3, 3), &[(0, 0), (0, 2), (2, 1)]);
        assert_eq!(b[(1, 1)].neighbor_mines, 3);
        assert_eq!(b[(0, 1)].neighbor_mines, 2);
        assert_eq!(b[(2, 2)].neighbor_mines, 1);
        assert_eq!(b.mine_count(), 3);
    }

    #[test]
    fn flood_fill_stops_at_numbered_border() {
        // mine column on the right edge of a 4x5 board
        let b = &mut board((4, 5), &[(0, 4), (1, 4), (2, 4), (3, 4)]);

        assert_eq!(b.reveal_from((0, 0)), RevealOutcome::Revealed);

        for row in 0..4 {
            for col in 0..4 {
                assert!(b[(row, col)].is_revealed, "({row}, {col}) hidden");
            }
            assert!(!b[(row, 4)].is_revealed);
        }
        assert_eq!(b.revealed_count(), 16);
        assert!(b.all_safe_revealed());
    }

    #[test]
    fn flood_fill_does_not_cross_flags() {
        let mut b = board((1, 5), &[(0, 4)]);
        b.toggle_flag((0, 2));

        b.reveal_from((0, 0));

        assert!(b[(0, 0)].is_revealed && b[(0, 1)].is_revealed);
        assert!(b[(0, 2)].is_flagged && !b[(0, 2)].is_revealed);
        assert!(!b[(0, 3)].is_revealed);
        assert_eq!(b.revealed_count(), 2);
    }

    #[test]
    fn numbered_cell_reveals_alone() {
        let mut b = board((3, 3), &[(0, 0)]);
        assert_eq!(b.reveal_from((1, 1)), RevealOutcome::Revealed);
        assert_eq!(b.revealed_count(), 1);
        assert_eq!(b.reveal_from((1, 1)), RevealOutcome::NoChange);
    }

    #[test]
    fn mine_reveal_counts_the_mine() {
        let mut b = board((2, 2), &[(0, 0)]);
        assert_eq!(b.reveal_from((0, 0)), RevealOutcome::HitMine);
        assert_eq!(b.revealed_count(), 1);
    }

    #[test]
    fn flags_toggle_and_never_cover_revealed_cells() {
        let mut b = board((2, 2), &[(0, 0)]);
        assert_eq!(b.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert_eq!(b.flagged_count(), 1);
        assert_eq!(b.toggle_flag((0, 0)), MarkOutcome::Changed);
        assert_eq!(b.flagged_count(), 0);

        b.reveal_from((1, 1));
        assert_eq!(b.toggle_flag((1, 1)), MarkOutcome::NoChange);
        assert!(!b[(1, 1)].is_flagged);
    }

    #[test]
    fn reveal_all_mines_leaves_flags_alone() {
        let mut b = board((2, 2), &[(0, 0), (1, 1)]);
        b.toggle_flag((1, 1));
        b.reveal_all_mines();

        assert!(b[(0, 0)].is_revealed);
        assert!(b[(1, 1)].is_flagged && !b[(1, 1)].is_revealed);
    }

    #[test]
    fn rejects_out_of_bounds_mines() {
        assert_eq!(
            MineBoard::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords)
        );
    }
}
