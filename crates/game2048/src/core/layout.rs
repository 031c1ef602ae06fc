use super::grid::Cell;

pub const ROWS: u8 = 4;
pub const COLS: u8 = 4;
pub const CELL_COUNT: usize = ROWS as usize * COLS as usize;

pub const DEFAULT_CELL_WIDTH: i32 = 200;
pub const DEFAULT_CELL_HEIGHT: i32 = 200;
pub const DEFAULT_SCORE_BAND_HEIGHT: i32 = 150;
pub const DEFAULT_MOVE_VELOCITY: i32 = 20;

/// Position in layout pixels. Tiles slide through these coordinates; the
/// grid cell is derived from them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// How a continuous position is snapped back onto a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRounding {
    Floor,
    Ceil,
}

/// Fixed geometry of the board in layout pixels.
///
/// The board starts below a score band, so row `r` column `c` has its top-left
/// corner at `(c * cell_width, score_band_height + r * cell_height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub cell_width: i32,
    pub cell_height: i32,
    pub score_band_height: i32,
    pub move_velocity: i32,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            cell_width: DEFAULT_CELL_WIDTH,
            cell_height: DEFAULT_CELL_HEIGHT,
            score_band_height: DEFAULT_SCORE_BAND_HEIGHT,
            move_velocity: DEFAULT_MOVE_VELOCITY,
        }
    }
}

impl BoardLayout {
    pub fn with_move_velocity(self, move_velocity: i32) -> Self {
        Self {
            move_velocity,
            ..self
        }
    }

    pub fn board_width(&self) -> i32 {
        self.cell_width * COLS as i32
    }

    pub fn board_height(&self) -> i32 {
        self.cell_height * ROWS as i32
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (
            self.board_width() as u32,
            (self.score_band_height + self.board_height()) as u32,
        )
    }

    pub fn position_of(&self, cell: Cell) -> Position {
        Position {
            x: cell.col as i32 * self.cell_width,
            y: self.score_band_height + cell.row as i32 * self.cell_height,
        }
    }

    /// Projects a position back onto the grid. Results are clamped to the
    /// board so a tile caught exactly between cells never yields an
    /// out-of-range coordinate.
    pub fn cell_at(&self, position: Position, rounding: CellRounding) -> Cell {
        let row = round_div(position.y - self.score_band_height, self.cell_height, rounding);
        let col = round_div(position.x, self.cell_width, rounding);
        Cell {
            row: row.clamp(0, ROWS as i32 - 1) as u8,
            col: col.clamp(0, COLS as i32 - 1) as u8,
        }
    }

    /// The velocity has to land tiles exactly on cell boundaries.
    pub fn velocity_divides_cells(&self) -> bool {
        self.move_velocity > 0
            && self.cell_width % self.move_velocity == 0
            && self.cell_height % self.move_velocity == 0
    }
}

fn round_div(value: i32, divisor: i32, rounding: CellRounding) -> i32 {
    match rounding {
        CellRounding::Floor => value.div_euclid(divisor),
        CellRounding::Ceil => -(-value).div_euclid(divisor),
    }
}
