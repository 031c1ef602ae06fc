use std::collections::BTreeMap;

use super::layout::{BoardLayout, CellRounding, Position, CELL_COUNT, COLS, ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub row: u8,
    pub col: u8,
}

impl Cell {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Row-major iteration over every cell of the board.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..ROWS).flat_map(|row| (0..COLS).map(move |col| Cell { row, col }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    pub value: u32,
    pub position: Position,
    pub cell: Cell,
}

impl Tile {
    pub(crate) fn step(&mut self, delta: (i32, i32)) {
        self.position.x += delta.0;
        self.position.y += delta.1;
    }

    pub(crate) fn resettle(&mut self, layout: &BoardLayout, rounding: CellRounding) {
        self.cell = layout.cell_at(self.position, rounding);
    }

    pub fn is_settled(&self, layout: &BoardLayout) -> bool {
        layout.position_of(self.cell) == self.position
    }
}

#[derive(Debug, Default, Clone)]
struct TileIdAllocator {
    next: u64,
}

impl TileIdAllocator {
    fn allocate(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Occupancy of the 4x4 board. Each cell holds at most one tile, keyed by
/// the tile's settled cell.
#[derive(Debug, Clone)]
pub struct Grid {
    layout: BoardLayout,
    tiles: BTreeMap<Cell, Tile>,
    ids: TileIdAllocator,
}

impl Grid {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            tiles: BTreeMap::new(),
            ids: TileIdAllocator::default(),
        }
    }

    /// Builds a grid from a row-major value matrix; `0` is an empty cell.
    pub fn from_rows(layout: BoardLayout, rows: [[u32; COLS as usize]; ROWS as usize]) -> Self {
        let mut grid = Self::new(layout);
        for cell in Cell::all() {
            let value = rows[cell.row as usize][cell.col as usize];
            if value != 0 {
                grid.place(cell, value);
            }
        }
        grid
    }

    pub fn to_rows(&self) -> [[u32; COLS as usize]; ROWS as usize] {
        let mut rows = [[0; COLS as usize]; ROWS as usize];
        for tile in self.tiles.values() {
            rows[tile.cell.row as usize][tile.cell.col as usize] = tile.value;
        }
        rows
    }

    pub fn layout(&self) -> &BoardLayout {
        &self.layout
    }

    pub fn get(&self, cell: Cell) -> Option<&Tile> {
        self.tiles.get(&cell)
    }

    pub fn value_at(&self, cell: Cell) -> Option<u32> {
        self.get(cell).map(|tile| tile.value)
    }

    pub fn set(&mut self, cell: Cell, tile: Tile) -> Option<Tile> {
        self.tiles.insert(cell, tile)
    }

    pub fn remove(&mut self, cell: Cell) -> Option<Tile> {
        self.tiles.remove(&cell)
    }

    /// Creates a settled tile with a fresh id at `cell`, replacing any
    /// previous occupant.
    pub fn place(&mut self, cell: Cell, value: u32) -> Tile {
        let tile = Tile {
            id: self.ids.allocate(),
            value,
            position: self.layout.position_of(cell),
            cell,
        };
        self.tiles.insert(cell, tile);
        tile
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.tiles.len() >= CELL_COUNT
    }

    pub fn empty_cells(&self) -> Vec<Cell> {
        Cell::all()
            .filter(|cell| !self.tiles.contains_key(cell))
            .collect()
    }

    pub fn max_value(&self) -> Option<u32> {
        self.tiles.values().map(|tile| tile.value).max()
    }

    pub fn value_sum(&self) -> u64 {
        self.tiles.values().map(|tile| u64::from(tile.value)).sum()
    }

    pub(crate) fn take_tiles(&mut self) -> Vec<Tile> {
        std::mem::take(&mut self.tiles).into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_positions_tile_and_allocates_unique_ids() {
        let mut grid = Grid::new(BoardLayout::default());
        let first = grid.place(Cell::new(0, 1), 2);
        let second = grid.place(Cell::new(2, 3), 4);

        assert_ne!(first.id, second.id);
        assert_eq!(first.position, Position { x: 200, y: 150 });
        assert!(second.is_settled(grid.layout()));
        assert_eq!(grid.len(), 2);
        assert_eq!(grid.value_at(Cell::new(2, 3)), Some(4));
    }

    #[test]
    fn set_and_remove_keep_one_tile_per_cell() {
        let mut grid = Grid::new(BoardLayout::default());
        let tile = grid.place(Cell::new(1, 1), 8);
        let replaced = grid.set(Cell::new(1, 1), Tile { value: 16, ..tile });

        assert_eq!(replaced.map(|t| t.value), Some(8));
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.remove(Cell::new(1, 1)).map(|t| t.value), Some(16));
        assert!(grid.is_empty());
        assert!(grid.remove(Cell::new(1, 1)).is_none());
    }

    #[test]
    fn rows_round_trip_and_empty_cells_are_row_major() {
        let rows = [[2, 0, 0, 4], [0, 0, 0, 0], [0, 8, 0, 0], [0, 0, 0, 2]];
        let grid = Grid::from_rows(BoardLayout::default(), rows);

        assert_eq!(grid.to_rows(), rows);
        assert_eq!(grid.len(), 4);
        let empty = grid.empty_cells();
        assert_eq!(empty.len(), 12);
        assert_eq!(empty[0], Cell::new(0, 1));
        assert_eq!(grid.max_value(), Some(8));
        assert_eq!(grid.value_sum(), 16);
    }

    #[test]
    fn full_grid_reports_full() {
        let grid = Grid::from_rows(BoardLayout::default(), [[2; 4]; 4]);
        assert!(grid.is_full());
        assert!(grid.empty_cells().is_empty());
    }
}
