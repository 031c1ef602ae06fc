use super::grid::{Cell, Grid};
use super::layout::{CELL_COUNT, COLS, ROWS};

/// Whether the player still has a legal move.
///
/// Any board with a free cell counts as playable. A full board is playable
/// only if some tile has an equal right or down neighbor.
pub fn has_valid_moves(grid: &Grid) -> bool {
    if grid.len() < CELL_COUNT {
        return true;
    }

    grid.tiles().any(|tile| {
        let Cell { row, col } = tile.cell;
        let right = (col + 1 < COLS).then(|| Cell::new(row, col + 1));
        let down = (row + 1 < ROWS).then(|| Cell::new(row + 1, col));
        [right, down]
            .into_iter()
            .flatten()
            .any(|cell| grid.value_at(cell) == Some(tile.value))
    })
}
