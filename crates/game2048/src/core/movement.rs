use std::collections::{HashMap, HashSet};

use super::direction::{Direction, DirectionRules};
use super::grid::{Cell, Grid, TileId};

/// Result of a settled move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    pub changed: bool,
    pub score_delta: u64,
}

/// Summary of one animation tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub moved: bool,
    pub merges: u32,
}

/// A move in progress. Each call to [`Slide::tick`] advances every movable
/// tile by one step; the slide is settled once a tick changes nothing.
#[derive(Debug)]
pub struct Slide {
    rules: &'static DirectionRules,
    merged: HashSet<TileId>,
    score_delta: u64,
    changed: bool,
    ticks: u32,
    settled: bool,
}

impl Slide {
    pub fn new(direction: Direction) -> Self {
        Self {
            rules: direction.rules(),
            merged: HashSet::new(),
            score_delta: 0,
            changed: false,
            ticks: 0,
            settled: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.rules.direction
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn score_delta(&self) -> u64 {
        self.score_delta
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn outcome(&self) -> MoveOutcome {
        MoveOutcome {
            changed: self.changed,
            score_delta: self.score_delta,
        }
    }

    pub fn tick(&mut self, grid: &mut Grid) -> TickReport {
        if self.settled {
            return TickReport::default();
        }

        let layout = *grid.layout();
        let rules = self.rules;
        let step = rules.step(&layout);

        let mut tiles = grid.take_tiles();
        tiles.sort_by(rules.toward_edge);
        // Neighbor lookups use the occupancy from the start of the tick.
        let slots: HashMap<Cell, usize> = tiles
            .iter()
            .enumerate()
            .map(|(index, tile)| (tile.cell, index))
            .collect();
        let mut alive = vec![true; tiles.len()];
        let mut report = TickReport::default();

        for index in 0..tiles.len() {
            let tile = tiles[index];
            if (rules.at_edge)(tile.cell) {
                continue;
            }

            let neighbor_index = (rules.next_cell)(tile.cell)
                .and_then(|cell| slots.get(&cell).copied())
                .filter(|&neighbor_index| alive[neighbor_index] && neighbor_index != index);

            let moved = match neighbor_index {
                None => {
                    tiles[index].step(step);
                    true
                }
                Some(neighbor_index) => {
                    let neighbor = tiles[neighbor_index];
                    if tile.value == neighbor.value
                        && !self.merged.contains(&tile.id)
                        && !self.merged.contains(&neighbor.id)
                    {
                        if rules.merge_gap_open(&tile, &neighbor, &layout) {
                            tiles[index].step(step);
                        } else {
                            let doubled = neighbor.value.saturating_mul(2);
                            tiles[neighbor_index].value = doubled;
                            self.score_delta = self.score_delta.saturating_add(u64::from(doubled));
                            self.merged.insert(neighbor.id);
                            alive[index] = false;
                            report.merges += 1;
                        }
                        true
                    } else if rules.move_gap_open(&tile, &neighbor, &layout) {
                        tiles[index].step(step);
                        true
                    } else {
                        false
                    }
                }
            };

            if moved {
                tiles[index].resettle(&layout, rules.rounding);
                report.moved = true;
            }
        }

        for (tile, keep) in tiles.into_iter().zip(alive) {
            if keep {
                let displaced = grid.set(tile.cell, tile);
                debug_assert!(displaced.is_none(), "two tiles settled on one cell");
            }
        }

        self.ticks = self.ticks.saturating_add(1);
        if report.moved {
            self.changed = true;
        } else {
            self.settled = true;
        }
        report
    }

    /// Drives the slide to completion, calling `on_tick` after every tick
    /// with the grid and the score gained so far.
    pub fn run_to_settle<F>(&mut self, grid: &mut Grid, mut on_tick: F) -> MoveOutcome
    where
        F: FnMut(&Grid, u64),
    {
        while !self.settled {
            self.tick(grid);
            on_tick(grid, self.score_delta);
        }
        self.outcome()
    }
}

/// Blocking move: slides every tile in `direction` until nothing moves.
pub fn move_tiles<F>(grid: &mut Grid, direction: Direction, on_tick: F) -> MoveOutcome
where
    F: FnMut(&Grid, u64),
{
    Slide::new(direction).run_to_settle(grid, on_tick)
}

/// Non-animated resolution of a move.
pub fn resolve_move(grid: &mut Grid, direction: Direction) -> MoveOutcome {
    move_tiles(grid, direction, |_, _| {})
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::layout::BoardLayout;

    type Rows = [[u32; 4]; 4];

    fn grid(rows: Rows) -> Grid {
        Grid::from_rows(BoardLayout::default(), rows)
    }

    fn settle(rows: Rows, direction: Direction) -> (Rows, MoveOutcome) {
        let mut grid = grid(rows);
        let outcome = resolve_move(&mut grid, direction);
        (grid.to_rows(), outcome)
    }

    /// Classic line compress-and-merge, used as an oracle for the tick engine.
    fn reference_line(line: [u32; 4]) -> ([u32; 4], u64) {
        let values: Vec<u32> = line.into_iter().filter(|value| *value != 0).collect();
        let mut out = [0; 4];
        let mut score = 0;
        let mut write = 0;
        let mut read = 0;
        while read < values.len() {
            if read + 1 < values.len() && values[read] == values[read + 1] {
                out[write] = values[read] * 2;
                score += u64::from(out[write]);
                read += 2;
            } else {
                out[write] = values[read];
                read += 1;
            }
            write += 1;
        }
        (out, score)
    }

    fn reference_move(rows: Rows, direction: Direction) -> (Rows, u64) {
        let mut out = [[0; 4]; 4];
        let mut score = 0;
        for lane in 0..4 {
            let cells: [(usize, usize); 4] = match direction {
                Direction::Left => [(lane, 0), (lane, 1), (lane, 2), (lane, 3)],
                Direction::Right => [(lane, 3), (lane, 2), (lane, 1), (lane, 0)],
                Direction::Up => [(0, lane), (1, lane), (2, lane), (3, lane)],
                Direction::Down => [(3, lane), (2, lane), (1, lane), (0, lane)],
            };
            let line = cells.map(|(row, col)| rows[row][col]);
            let (merged, gained) = reference_line(line);
            score += gained;
            for ((row, col), value) in cells.into_iter().zip(merged) {
                out[row][col] = value;
            }
        }
        (out, score)
    }

    #[test]
    fn empty_grid_never_changes() {
        for direction in Direction::ALL {
            let (rows, outcome) = settle([[0; 4]; 4], direction);
            assert_eq!(rows, [[0; 4]; 4]);
            assert_eq!(outcome, MoveOutcome::default());
        }
    }

    #[test]
    fn adjacent_pair_merges_left() {
        let (rows, outcome) = settle(
            [[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Direction::Left,
        );
        assert_eq!(rows[0], [4, 0, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
        assert!(outcome.changed);
    }

    #[test]
    fn three_in_a_row_merges_leading_pair_only() {
        let (rows, outcome) = settle(
            [[2, 2, 2, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Direction::Left,
        );
        assert_eq!(rows[0], [4, 2, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
        assert!(outcome.changed);
    }

    #[test]
    fn merged_tile_does_not_merge_again_in_same_move() {
        let (rows, outcome) = settle(
            [[2, 2, 4, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Direction::Left,
        );
        assert_eq!(rows[0], [4, 4, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn four_equal_tiles_form_two_pairs() {
        let (rows, outcome) = settle(
            [[0, 0, 0, 0], [2, 2, 2, 2], [0, 0, 0, 0], [0, 0, 0, 0]],
            Direction::Right,
        );
        assert_eq!(rows[1], [0, 0, 4, 4]);
        assert_eq!(outcome.score_delta, 8);
    }

    #[test]
    fn blocked_follower_stops_flush_behind_leader() {
        let (rows, outcome) = settle(
            [[0, 4, 2, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
            Direction::Left,
        );
        assert_eq!(rows[0], [4, 4, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn columns_slide_up_and_down() {
        let start = [[2, 0, 0, 0], [0, 0, 0, 0], [2, 0, 0, 0], [4, 0, 0, 0]];
        let (up, up_outcome) = settle(start, Direction::Up);
        assert_eq!(
            up,
            [[4, 0, 0, 0], [4, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]
        );
        assert_eq!(up_outcome.score_delta, 4);

        let (down, down_outcome) = settle(start, Direction::Down);
        assert_eq!(
            down,
            [[0, 0, 0, 0], [0, 0, 0, 0], [4, 0, 0, 0], [4, 0, 0, 0]]
        );
        assert_eq!(down_outcome.score_delta, 4);
    }

    #[test]
    fn move_without_room_or_pairs_reports_unchanged() {
        let rows = [[2, 4, 2, 4], [4, 2, 4, 2], [0, 0, 0, 0], [0, 0, 0, 0]];
        let (after, outcome) = settle(rows, Direction::Up);
        assert_eq!(after, rows);
        assert!(!outcome.changed);
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn settled_grid_is_idempotent_in_same_direction() {
        let mut grid = grid([[0, 2, 2, 4], [8, 0, 8, 0], [2, 0, 0, 2], [0, 0, 16, 0]]);
        while resolve_move(&mut grid, Direction::Left).changed {}

        let first = resolve_move(&mut grid, Direction::Left);
        let second = resolve_move(&mut grid, Direction::Left);
        assert!(!first.changed);
        assert!(!second.changed);
    }

    #[test]
    fn left_then_right_round_trips_flush_right_grid_without_pairs() {
        let rows = [[0, 2, 4, 8], [0, 0, 16, 2], [0, 0, 0, 4], [0, 32, 64, 2]];
        let mut grid = grid(rows);

        assert!(resolve_move(&mut grid, Direction::Left).changed);
        assert!(resolve_move(&mut grid, Direction::Right).changed);
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn tiles_end_settled_on_their_cells() {
        let mut grid = grid([[2, 0, 2, 4], [0, 8, 8, 8], [2, 0, 0, 0], [4, 4, 0, 4]]);
        resolve_move(&mut grid, Direction::Down);
        let layout = *grid.layout();
        assert!(grid.tiles().all(|tile| tile.is_settled(&layout)));
    }

    #[test]
    fn on_tick_sees_running_score_and_final_grid() {
        let mut grid = grid([[2, 2, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let mut ticks = 0;
        let mut last_delta = 0;
        let outcome = move_tiles(&mut grid, Direction::Left, |observed, delta| {
            ticks += 1;
            assert!(observed.len() <= 2);
            assert!(delta >= last_delta);
            last_delta = delta;
        });

        assert_eq!(last_delta, outcome.score_delta);
        // Nine steps, the merge, then one tick where nothing moves.
        assert_eq!(ticks, 11);
    }

    #[test]
    fn slide_ticks_match_blocking_move() {
        let rows = [[0, 0, 2, 2], [4, 0, 4, 0], [0, 8, 0, 8], [2, 4, 8, 16]];
        let mut stepped = grid(rows);
        let mut slide = Slide::new(Direction::Left);
        while !slide.is_settled() {
            slide.tick(&mut stepped);
        }

        let (blocking, outcome) = settle(rows, Direction::Left);
        assert_eq!(stepped.to_rows(), blocking);
        assert_eq!(slide.outcome(), outcome);
        assert_eq!(slide.tick(&mut stepped), TickReport::default());
    }

    #[test]
    fn mid_slide_positions_advance_by_velocity() {
        let mut grid = grid([[0, 0, 0, 2], [0, 0, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]]);
        let mut slide = Slide::new(Direction::Left);
        let report = slide.tick(&mut grid);

        assert!(report.moved);
        let tile = grid.tiles().next().expect("tile");
        assert_eq!(tile.position.x, 580);
        assert_eq!(tile.cell, Cell::new(0, 3));
    }

    fn rows_strategy() -> impl Strategy<Value = Rows> {
        prop::array::uniform4(prop::array::uniform4(prop_oneof![
            3 => Just(0u32),
            1 => (1u32..=5).prop_map(|exponent| 1 << exponent),
        ]))
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Left),
            Just(Direction::Right),
            Just(Direction::Up),
            Just(Direction::Down),
        ]
    }

    proptest! {
        #[test]
        fn tick_engine_matches_line_reference(rows in rows_strategy(), direction in direction_strategy()) {
            let (after, outcome) = settle(rows, direction);
            let (expected, expected_score) = reference_move(rows, direction);
            prop_assert_eq!(after, expected);
            prop_assert_eq!(outcome.score_delta, expected_score);
            prop_assert_eq!(outcome.changed, expected != rows);
        }

        #[test]
        fn moves_conserve_value_and_never_add_tiles(rows in rows_strategy(), direction in direction_strategy()) {
            let mut grid = grid(rows);
            let before_len = grid.len();
            let before_sum = grid.value_sum();
            let before_ids: HashSet<TileId> = grid.tiles().map(|tile| tile.id).collect();

            resolve_move(&mut grid, direction);

            prop_assert!(grid.len() <= before_len);
            prop_assert_eq!(grid.value_sum(), before_sum);
            prop_assert!(grid.tiles().all(|tile| before_ids.contains(&tile.id)));
        }
    }
}
