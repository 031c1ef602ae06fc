use std::cmp::Ordering;
use std::fmt;

use super::grid::{Cell, Tile};
use super::layout::{BoardLayout, CellRounding, Position, COLS, ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn rules(self) -> &'static DirectionRules {
        match self {
            Direction::Left => &LEFT,
            Direction::Right => &RIGHT,
            Direction::Up => &UP,
            Direction::Down => &DOWN,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Everything the tick loop needs to know about one direction. Selected once
/// per move so the tick itself stays direction-agnostic.
pub struct DirectionRules {
    pub direction: Direction,
    pub axis: Axis,
    /// Tiles nearer the target edge sort first.
    pub toward_edge: fn(&Tile, &Tile) -> Ordering,
    /// Unit step; multiplied by the layout's move velocity.
    pub unit_step: (i32, i32),
    pub rounding: CellRounding,
    pub at_edge: fn(Cell) -> bool,
    pub next_cell: fn(Cell) -> Option<Cell>,
    /// Signed distance from the neighbor to the tile, measured away from the
    /// target edge.
    pub gap: fn(Position, Position) -> i32,
}

impl fmt::Debug for DirectionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionRules")
            .field("direction", &self.direction)
            .field("axis", &self.axis)
            .field("unit_step", &self.unit_step)
            .field("rounding", &self.rounding)
            .finish_non_exhaustive()
    }
}

impl DirectionRules {
    pub fn step(&self, layout: &BoardLayout) -> (i32, i32) {
        (
            self.unit_step.0 * layout.move_velocity,
            self.unit_step.1 * layout.move_velocity,
        )
    }

    fn extent(&self, layout: &BoardLayout) -> i32 {
        match self.axis {
            Axis::Horizontal => layout.cell_width,
            Axis::Vertical => layout.cell_height,
        }
    }

    /// The tile is still more than one step away from an equal neighbor, so
    /// it keeps sliding instead of merging.
    pub fn merge_gap_open(&self, tile: &Tile, neighbor: &Tile, layout: &BoardLayout) -> bool {
        (self.gap)(tile.position, neighbor.position) > layout.move_velocity
    }

    /// One more step still leaves the tile at or behind flush with the
    /// neighbor.
    pub fn move_gap_open(&self, tile: &Tile, neighbor: &Tile, layout: &BoardLayout) -> bool {
        (self.gap)(tile.position, neighbor.position)
            >= self.extent(layout) + layout.move_velocity
    }
}

static LEFT: DirectionRules = DirectionRules {
    direction: Direction::Left,
    axis: Axis::Horizontal,
    toward_edge: |a, b| (a.cell.col, a.cell.row).cmp(&(b.cell.col, b.cell.row)),
    unit_step: (-1, 0),
    rounding: CellRounding::Ceil,
    at_edge: |cell| cell.col == 0,
    next_cell: |cell| cell.col.checked_sub(1).map(|col| Cell { col, ..cell }),
    gap: |tile, neighbor| tile.x - neighbor.x,
};

static RIGHT: DirectionRules = DirectionRules {
    direction: Direction::Right,
    axis: Axis::Horizontal,
    toward_edge: |a, b| (b.cell.col, a.cell.row).cmp(&(a.cell.col, b.cell.row)),
    unit_step: (1, 0),
    rounding: CellRounding::Floor,
    at_edge: |cell| cell.col == COLS - 1,
    next_cell: |cell| (cell.col + 1 < COLS).then(|| Cell { col: cell.col + 1, ..cell }),
    gap: |tile, neighbor| neighbor.x - tile.x,
};

static UP: DirectionRules = DirectionRules {
    direction: Direction::Up,
    axis: Axis::Vertical,
    toward_edge: |a, b| (a.cell.row, a.cell.col).cmp(&(b.cell.row, b.cell.col)),
    unit_step: (0, -1),
    rounding: CellRounding::Ceil,
    at_edge: |cell| cell.row == 0,
    next_cell: |cell| cell.row.checked_sub(1).map(|row| Cell { row, ..cell }),
    gap: |tile, neighbor| tile.y - neighbor.y,
};

static DOWN: DirectionRules = DirectionRules {
    direction: Direction::Down,
    axis: Axis::Vertical,
    toward_edge: |a, b| (b.cell.row, a.cell.col).cmp(&(a.cell.row, b.cell.col)),
    unit_step: (0, 1),
    rounding: CellRounding::Floor,
    at_edge: |cell| cell.row == ROWS - 1,
    next_cell: |cell| (cell.row + 1 < ROWS).then(|| Cell { row: cell.row + 1, ..cell }),
    gap: |tile, neighbor| neighbor.y - tile.y,
};
