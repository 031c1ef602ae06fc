use engine::{font, Canvas, Rect, Rgba};

use crate::core::{BoardLayout, Grid, Tile, COLS, ROWS};

use super::button::Button;

pub const BACKGROUND_COLOR: Rgba = [250, 235, 245, 255];
pub const OUTLINE_COLOR: Rgba = [216, 191, 216, 255];
pub const FONT_COLOR: Rgba = [99, 21, 80, 255];
const OVERLAY_COLOR: Rgba = [0, 0, 0, 200];
const OVERLAY_TEXT_COLOR: Rgba = [255, 255, 255, 255];
const OUTLINE_THICKNESS: i32 = 10;

const SCORE_TOP: i32 = 30;
const SCORE_TEXT_SCALE: i32 = 4;
const TILE_TEXT_MAX_SCALE: i32 = 6;
const TILE_TEXT_MARGIN: i32 = 16;
const GAME_OVER_TEXT_SCALE: i32 = 6;
const GAME_OVER_HINT_SCALE: i32 = 3;

pub const TILE_PALETTE: [Rgba; 11] = [
    [255, 240, 245, 255],
    [255, 228, 245, 255],
    [255, 192, 203, 255],
    [255, 182, 193, 255],
    [255, 160, 200, 255],
    [238, 130, 238, 255],
    [221, 160, 221, 255],
    [218, 112, 214, 255],
    [186, 85, 211, 255],
    [147, 112, 219, 255],
    [138, 43, 226, 255],
];

/// Palette slot for a tile value: 2 maps to the first colour, anything past
/// the end of the palette reuses the last one.
pub fn tile_color(value: u32) -> Rgba {
    let exponent = value.max(2).ilog2() as usize;
    TILE_PALETTE[(exponent - 1).min(TILE_PALETTE.len() - 1)]
}

/// Largest text scale at which `text` still fits inside a cell.
pub fn tile_text_scale(text: &str, layout: &BoardLayout) -> i32 {
    let available = layout.cell_width.min(layout.cell_height) - TILE_TEXT_MARGIN * 2;
    (1..=TILE_TEXT_MAX_SCALE)
        .rev()
        .find(|scale| font::text_width(text, *scale) <= available)
        .unwrap_or(1)
}

pub struct Frame<'a> {
    pub grid: &'a Grid,
    pub score: u64,
    pub game_over: bool,
    pub buttons: [&'a Button; 2],
}

pub fn draw_frame(canvas: &mut Canvas<'_>, frame: &Frame<'_>) {
    let layout = frame.grid.layout();
    canvas.clear(BACKGROUND_COLOR);
    for tile in frame.grid.tiles() {
        draw_tile(canvas, tile, layout);
    }
    draw_grid_lines(canvas, layout);
    draw_score(canvas, frame.score);
    for button in frame.buttons {
        button.draw(canvas);
    }
    if frame.game_over {
        draw_game_over(canvas);
    }
}

fn draw_tile(canvas: &mut Canvas<'_>, tile: &Tile, layout: &BoardLayout) {
    let rect = Rect::new(
        tile.position.x,
        tile.position.y,
        layout.cell_width,
        layout.cell_height,
    );
    canvas.fill_rect(rect, tile_color(tile.value));
    let label = tile.value.to_string();
    canvas.draw_text_centered(rect, &label, tile_text_scale(&label, layout), FONT_COLOR);
}

fn draw_grid_lines(canvas: &mut Canvas<'_>, layout: &BoardLayout) {
    let top = layout.score_band_height;
    let bottom = top + layout.board_height();
    let width = layout.board_width();

    for row in 1..ROWS as i32 {
        let y = top + row * layout.cell_height;
        canvas.draw_hline(0, width, y, OUTLINE_THICKNESS, OUTLINE_COLOR);
    }
    for col in 1..COLS as i32 {
        let x = col * layout.cell_width;
        canvas.draw_vline(x, top, bottom, OUTLINE_THICKNESS, OUTLINE_COLOR);
    }
    canvas.outline_rect(
        Rect::new(0, top, width, layout.board_height()),
        OUTLINE_THICKNESS,
        OUTLINE_COLOR,
    );
}

fn draw_score(canvas: &mut Canvas<'_>, score: u64) {
    let text = format!("Score: {score}");
    let x = (canvas.width() as i32 - font::text_width(&text, SCORE_TEXT_SCALE)) / 2;
    canvas.draw_text(x, SCORE_TOP, &text, SCORE_TEXT_SCALE, FONT_COLOR);
}

fn draw_game_over(canvas: &mut Canvas<'_>) {
    let bounds = canvas.bounds();
    canvas.blend_rect(bounds, OVERLAY_COLOR);

    let mid_y = bounds.height / 2;
    draw_centered_line(canvas, mid_y - 50, "Game Over!", GAME_OVER_TEXT_SCALE);
    draw_centered_line(
        canvas,
        mid_y + 10,
        "Click Restart to play again",
        GAME_OVER_HINT_SCALE,
    );
}

fn draw_centered_line(canvas: &mut Canvas<'_>, y: i32, text: &str, scale: i32) {
    let x = (canvas.width() as i32 - font::text_width(text, scale)) / 2;
    canvas.draw_text(x, y, text, scale, OVERLAY_TEXT_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::button::button_row;

    fn render(grid: &Grid, score: u64, game_over: bool) -> Vec<u8> {
        let (width, height) = grid.layout().canvas_size();
        let mut buffer = vec![0u8; (width * height * 4) as usize];
        let (restart, quit) = button_row(width as i32);
        let mut canvas = Canvas::new(&mut buffer, width, height);
        draw_frame(
            &mut canvas,
            &Frame {
                grid,
                score,
                game_over,
                buttons: [&restart, &quit],
            },
        );
        buffer
    }

    fn pixel(buffer: &[u8], width: u32, x: i32, y: i32) -> Rgba {
        let offset = ((y as u32 * width + x as u32) * 4) as usize;
        [
            buffer[offset],
            buffer[offset + 1],
            buffer[offset + 2],
            buffer[offset + 3],
        ]
    }

    #[test]
    fn palette_follows_log2_and_clamps() {
        assert_eq!(tile_color(2), TILE_PALETTE[0]);
        assert_eq!(tile_color(4), TILE_PALETTE[1]);
        assert_eq!(tile_color(2048), TILE_PALETTE[10]);
        assert_eq!(tile_color(8192), TILE_PALETTE[10]);
    }

    #[test]
    fn long_values_shrink_to_fit_cell() {
        let layout = BoardLayout::default();
        assert_eq!(tile_text_scale("2", &layout), TILE_TEXT_MAX_SCALE);
        let scale = tile_text_scale("131072", &layout);
        assert!(scale < TILE_TEXT_MAX_SCALE);
        assert!(font::text_width("131072", scale) <= 200 - TILE_TEXT_MARGIN * 2);
    }

    #[test]
    fn tiles_fill_their_cell_with_palette_color() {
        let grid = Grid::from_rows(
            BoardLayout::default(),
            [[0, 0, 0, 0], [0, 8, 0, 0], [0, 0, 0, 0], [0, 0, 0, 0]],
        );
        let buffer = render(&grid, 0, false);

        // Cell (1, 1) spans x 200..400, y 350..550; sample away from text and lines.
        assert_eq!(pixel(&buffer, 800, 220, 370), tile_color(8));
        assert_eq!(pixel(&buffer, 800, 620, 370), BACKGROUND_COLOR);
    }

    #[test]
    fn grid_lines_and_outline_are_drawn() {
        let grid = Grid::new(BoardLayout::default());
        let buffer = render(&grid, 0, false);

        assert_eq!(pixel(&buffer, 800, 100, 350), OUTLINE_COLOR);
        assert_eq!(pixel(&buffer, 800, 400, 600), OUTLINE_COLOR);
        assert_eq!(pixel(&buffer, 800, 2, 600), OUTLINE_COLOR);
        assert_eq!(pixel(&buffer, 800, 100, 945), OUTLINE_COLOR);
    }

    #[test]
    fn score_text_is_inked_in_header() {
        let grid = Grid::new(BoardLayout::default());
        let buffer = render(&grid, 1234, false);

        let inked = (SCORE_TOP..SCORE_TOP + font::text_height(SCORE_TEXT_SCALE))
            .flat_map(|y| (0..800).map(move |x| (x, y)))
            .filter(|&(x, y)| pixel(&buffer, 800, x, y) == FONT_COLOR)
            .count();
        assert!(inked > 0);
    }

    #[test]
    fn game_over_darkens_the_board() {
        let grid = Grid::new(BoardLayout::default());
        let live = render(&grid, 0, false);
        let over = render(&grid, 0, true);

        let before = pixel(&live, 800, 620, 800);
        let after = pixel(&over, 800, 620, 800);
        assert_eq!(before, BACKGROUND_COLOR);
        assert!(after[0] < before[0] / 2);
        assert_eq!(after[3], 255);
    }
}
