//! Windowing-free game rules: board state, sliding, spawning, and end
//! detection.

pub mod direction;
pub mod grid;
pub mod layout;
pub mod movement;
pub mod session;
pub mod spawn;
pub mod terminal;

pub use direction::{Axis, Direction, DirectionRules};
pub use grid::{Cell, Grid, Tile, TileId};
pub use layout::{BoardLayout, CellRounding, Position, CELL_COUNT, COLS, ROWS};
pub use movement::{move_tiles, resolve_move, MoveOutcome, Slide, TickReport};
pub use session::{MoveReport, Session};
pub use spawn::spawn;
pub use terminal::has_valid_moves;
