use rand::rngs::StdRng;
use rand::Rng;
use tracing::{debug, info, warn};

use super::direction::Direction;
use super::grid::{Grid, Tile};
use super::layout::BoardLayout;
use super::movement::{move_tiles, MoveOutcome, Slide};
use super::spawn::spawn;
use super::terminal::has_valid_moves;

pub const STARTING_TILES: usize = 2;
pub const STARTING_TILE_VALUE: u32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveReport {
    pub changed: bool,
    pub score_delta: u64,
    pub spawned: Option<Tile>,
    pub game_over: bool,
}

/// One game: board, running score, and the random source used for spawns.
#[derive(Debug)]
pub struct Session {
    grid: Grid,
    score: u64,
    game_over: bool,
    moves: u64,
    rng: StdRng,
}

impl Session {
    pub fn new_game(layout: BoardLayout, rng: StdRng) -> Self {
        let mut session = Self {
            grid: Grid::new(layout),
            score: 0,
            game_over: false,
            moves: 0,
            rng,
        };
        session.seed_board();
        info!(tiles = session.grid.len(), "game_started");
        session
    }

    /// Replaces the board with a fresh one. The random source carries on.
    pub fn restart(&mut self) {
        let previous_score = self.score;
        self.grid = Grid::new(*self.grid.layout());
        self.score = 0;
        self.game_over = false;
        self.moves = 0;
        self.seed_board();
        info!(previous_score, "game_restarted");
    }

    fn seed_board(&mut self) {
        for _ in 0..STARTING_TILES {
            let cells = self.grid.empty_cells();
            if cells.is_empty() {
                break;
            }
            let index = self.rng.random_range(0..cells.len());
            self.grid.place(cells[index], STARTING_TILE_VALUE);
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn moves(&self) -> u64 {
        self.moves
    }

    pub fn best_tile(&self) -> u32 {
        self.grid.max_value().unwrap_or(0)
    }

    /// Blocking move. `on_tick` sees the board after every tick together with
    /// the score as it stands mid-move.
    pub fn play<F>(&mut self, direction: Direction, mut on_tick: F) -> MoveReport
    where
        F: FnMut(&Grid, u64),
    {
        if self.game_over {
            return MoveReport {
                game_over: true,
                ..MoveReport::default()
            };
        }
        let base = self.score;
        let outcome = move_tiles(&mut self.grid, direction, |grid, delta| {
            on_tick(grid, base.saturating_add(delta))
        });
        self.settle(direction, outcome)
    }

    /// Starts an animated move, or `None` once the game is over.
    pub fn begin_move(&self, direction: Direction) -> Option<Slide> {
        (!self.game_over).then(|| Slide::new(direction))
    }

    pub fn finish_move(&mut self, slide: &Slide) -> MoveReport {
        self.settle(slide.direction(), slide.outcome())
    }

    fn settle(&mut self, direction: Direction, outcome: MoveOutcome) -> MoveReport {
        if !outcome.changed {
            debug!(direction = direction.as_str(), "move_ignored");
            return MoveReport {
                game_over: self.game_over,
                ..MoveReport::default()
            };
        }

        self.score = self.score.saturating_add(outcome.score_delta);
        self.moves = self.moves.saturating_add(1);
        info!(
            direction = direction.as_str(),
            score_delta = outcome.score_delta,
            score = self.score,
            "move_settled"
        );

        let spawned = spawn(&mut self.grid, &mut self.rng);
        match spawned {
            Some(tile) => debug!(
                row = tile.cell.row,
                col = tile.cell.col,
                value = tile.value,
                "tile_spawned"
            ),
            None => warn!("spawn_skipped_full_grid"),
        }

        if !has_valid_moves(&self.grid) {
            self.game_over = true;
            info!(
                score = self.score,
                best_tile = self.best_tile(),
                moves = self.moves,
                "game_over"
            );
        }

        MoveReport {
            changed: true,
            score_delta: outcome.score_delta,
            spawned,
            game_over: self.game_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn session_with(rows: [[u32; 4]; 4]) -> Session {
        let mut session = Session::new_game(BoardLayout::default(), StdRng::seed_from_u64(9));
        *session.grid_mut() = Grid::from_rows(BoardLayout::default(), rows);
        session
    }

    #[test]
    fn new_game_places_two_starting_tiles() {
        let session = Session::new_game(BoardLayout::default(), StdRng::seed_from_u64(1));
        assert_eq!(session.grid().len(), 2);
        assert!(session.grid().tiles().all(|tile| tile.value == 2));
        assert_eq!(session.score(), 0);
        assert!(!session.is_game_over());
    }

    #[test]
    fn unchanged_move_does_not_spawn() {
        let mut session = session_with([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let report = session.play(Direction::Left, |_, _| {});

        assert!(!report.changed);
        assert!(report.spawned.is_none());
        assert_eq!(session.grid().len(), 2);
        assert_eq!(session.moves(), 0);
    }

    #[test]
    fn changed_move_scores_and_spawns_once() {
        let mut session = session_with([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut last_seen = 0;
        let report = session.play(Direction::Left, |_, score| last_seen = score);

        assert!(report.changed);
        assert_eq!(report.score_delta, 4);
        assert_eq!(last_seen, 4);
        assert_eq!(session.score(), 4);
        assert!(report.spawned.is_some());
        assert_eq!(session.grid().len(), 2);
        assert_eq!(session.grid().value_at(crate::core::Cell::new(0, 0)), Some(4));
    }

    #[test]
    fn final_move_into_dead_board_ends_game() {
        // Sliding left opens one hole at the end of the top row, flanked by 8
        // and 16, so neither a 2 nor a 4 spawned there can merge.
        let mut session = session_with([
            [0, 16, 32, 8],
            [2, 4, 2, 16],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
        ]);
        let report = session.play(Direction::Left, |_, _| {});

        assert!(report.changed);
        let spawned = report.spawned.expect("spawned");
        assert_eq!(spawned.cell, crate::core::Cell::new(0, 3));
        assert!(report.game_over);
        assert!(session.is_game_over());
    }

    #[test]
    fn game_over_blocks_moves_until_restart() {
        let mut session = session_with([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        session.game_over = true;

        assert!(session.begin_move(Direction::Up).is_none());
        let report = session.play(Direction::Up, |_, _| panic!("no ticks once over"));
        assert!(report.game_over);
        assert!(!report.changed);

        session.restart();
        assert!(!session.is_game_over());
        assert_eq!(session.score(), 0);
        assert_eq!(session.grid().len(), 2);
        assert!(session.begin_move(Direction::Up).is_some());
    }

    #[test]
    fn animated_path_matches_blocking_path() {
        let rows = [[0, 2, 2, 0], [4, 0, 0, 4], [0; 4], [8, 0, 0, 0]];
        let mut blocking = session_with(rows);
        let mut animated = session_with(rows);

        let expected = blocking.play(Direction::Right, |_, _| {});

        let mut slide = animated.begin_move(Direction::Right).expect("slide");
        while !slide.is_settled() {
            slide.tick(animated.grid_mut());
        }
        let report = animated.finish_move(&slide);

        assert_eq!(report, expected);
        assert_eq!(animated.grid().to_rows(), blocking.grid().to_rows());
        assert_eq!(animated.score(), 12);
    }
}
