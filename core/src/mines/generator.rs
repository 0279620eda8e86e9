use core::iter;

use ndarray::Array2;
use rand::prelude::*;

use crate::*;

pub trait MinefieldGenerator {
    /// Returns a `(rows, cols)` mask with `true` on every mine.
    fn generate<R: Rng + ?Sized>(self, config: GameConfig, rng: &mut R) -> Array2<bool>;
}

/// Places mines uniformly at random, keeping the start cell and its 8
/// neighbors free so the first reveal always opens a zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SafeZoneGenerator {
    start: Coord2,
}

impl SafeZoneGenerator {
    pub fn new(start: Coord2) -> Self {
        Self { start }
    }
}

impl MinefieldGenerator for SafeZoneGenerator {
    fn generate<R: Rng + ?Sized>(self, config: GameConfig, rng: &mut R) -> Array2<bool> {
        let mut mines: Array2<bool> = Array2::default(config.dim());

        let safe_zone: Vec<Coord2> = iter::once(self.start)
            .chain(mines.iter_neighbors(self.start))
            .collect();

        // block the safe zone so the placement loop skips it
        for &coords in &safe_zone {
            mines[coords.to_nd_index()] = true;
        }
        let mut free_cells = config.total_cells() - safe_zone.len();

        if config.mines > free_cells {
            log::warn!(
                "Not enough room outside the safe zone, requested {} mines but only {} fit",
                config.mines,
                free_cells
            );
        }

        let mut mines_placed = 0;
        while mines_placed < config.mines && free_cells > 0 {
            let mut place = rng.random_range(0..free_cells);
            for cell in mines.iter_mut().filter(|cell| !**cell) {
                if place == 0 {
                    *cell = true;
                    mines_placed += 1;
                    free_cells -= 1;
                    break;
                }
                place -= 1;
            }
        }

        // undo to make the safe zone empty again
        for &coords in &safe_zone {
            mines[coords.to_nd_index()] = false;
        }

        log::debug!(
            "Placed {mines_placed} mines on a {}x{} board around {:?}",
            config.width,
            config.height,
            self.start
        );
        mines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;

    #[test]
    fn places_exact_count_outside_safe_zone() {
        let config = Difficulty::Beginner.config();
        for seed in 0..50 {
            let mut rng = SmallRng::seed_from_u64(seed);
            let mask = SafeZoneGenerator::new((4, 4)).generate(config, &mut rng);

            assert_eq!(mask.iter().filter(|&&mine| mine).count(), 10);
            for ((row, col), &mine) in mask.indexed_iter() {
                if mine {
                    assert!(chebyshev((row, col), (4, 4)) > 1);
                }
            }
        }
    }

    #[test]
    fn corner_start_only_protects_in_bounds_neighbors() {
        // 3x3 board with the start in a corner leaves 5 free cells
        let config = GameConfig::new(3, 3, 5);
        let mut rng = SmallRng::seed_from_u64(9);
        let mask = SafeZoneGenerator::new((0, 0)).generate(config, &mut rng);

        assert_eq!(mask.iter().filter(|&&mine| mine).count(), 5);
        assert!(!mask[[0, 0]] && !mask[[0, 1]] && !mask[[1, 0]] && !mask[[1, 1]]);
    }

    #[test]
    fn overfull_request_places_what_fits() {
        let config = GameConfig::new(3, 3, 8);
        let mut rng = SmallRng::seed_from_u64(1);
        let mask = SafeZoneGenerator::new((1, 1)).generate(config, &mut rng);

        assert!(mask.iter().all(|&mine| !mine));
    }
}
