use engine::{Canvas, Rect, Rgba, Vec2};

pub const BUTTON_WIDTH: i32 = 150;
pub const BUTTON_HEIGHT: i32 = 40;
pub const BUTTON_TOP: i32 = 90;
pub const BUTTON_SPACING: i32 = 20;
const BUTTON_RADIUS: i32 = 10;
const BUTTON_TEXT_SCALE: i32 = 3;

const BUTTON_COLOR: Rgba = [186, 85, 211, 255];
const BUTTON_HOVER_COLOR: Rgba = [147, 112, 219, 255];
const BUTTON_TEXT_COLOR: Rgba = [255, 255, 255, 255];

#[derive(Debug, Clone, PartialEq)]
pub struct Button {
    label: &'static str,
    rect: Rect,
    hovered: bool,
}

impl Button {
    pub fn new(label: &'static str, rect: Rect) -> Self {
        Self {
            label,
            rect,
            hovered: false,
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn update_hover(&mut self, cursor: Option<Vec2>) {
        self.hovered = self.contains(cursor);
    }

    pub fn is_clicked(&self, cursor: Option<Vec2>) -> bool {
        self.contains(cursor)
    }

    fn contains(&self, cursor: Option<Vec2>) -> bool {
        cursor.is_some_and(|point| self.rect.contains(point))
    }

    pub fn draw(&self, canvas: &mut Canvas<'_>) {
        let color = if self.hovered {
            BUTTON_HOVER_COLOR
        } else {
            BUTTON_COLOR
        };
        canvas.fill_rounded_rect(self.rect, BUTTON_RADIUS, color);
        canvas.draw_text_centered(self.rect, self.label, BUTTON_TEXT_SCALE, BUTTON_TEXT_COLOR);
    }
}

/// Restart and Quit, centered side by side above the board.
pub fn button_row(canvas_width: i32) -> (Button, Button) {
    let total_width = BUTTON_WIDTH * 2 + BUTTON_SPACING;
    let start_x = (canvas_width - total_width) / 2;
    let restart = Button::new(
        "Restart",
        Rect::new(start_x, BUTTON_TOP, BUTTON_WIDTH, BUTTON_HEIGHT),
    );
    let quit = Button::new(
        "Quit",
        Rect::new(
            start_x + BUTTON_WIDTH + BUTTON_SPACING,
            BUTTON_TOP,
            BUTTON_WIDTH,
            BUTTON_HEIGHT,
        ),
    );
    (restart, quit)
}
