use rand::Rng;

use super::grid::{Grid, Tile};

pub const SPAWN_TWO_PROBABILITY: f64 = 0.9;

/// Places one new tile in a uniformly chosen empty cell: a 2 nine times out of
/// ten, otherwise a 4. Returns `None` when the grid is already full.
pub fn spawn<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) -> Option<Tile> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }

    let cell = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_bool(SPAWN_TWO_PROBABILITY) {
        2
    } else {
        4
    };
    Some(grid.place(cell, value))
}
