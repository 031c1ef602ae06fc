use crate::app::Vec2;

use super::font::{self, glyph_for, GLYPH_HEIGHT, GLYPH_WIDTH, SPACE_GLYPH};

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x as f32
            && point.y >= self.y as f32
            && point.x < self.right() as f32
            && point.y < self.bottom() as f32
    }

    pub fn inset(&self, amount: i32) -> Rect {
        Rect {
            x: self.x + amount,
            y: self.y + amount,
            width: self.width - amount * 2,
            height: self.height - amount * 2,
        }
    }
}

/// RGBA8 drawing surface over a borrowed frame buffer. Every primitive clips
/// against the canvas bounds.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: u32,
    height: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: u32, height: u32) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn clear(&mut self, color: Rgba) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color);
        }
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        let range = self.byte_range(x, y)?;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[range]);
        Some(out)
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if let Some(range) = self.byte_range(x, y) {
            self.frame[range].copy_from_slice(&color);
        }
    }

    /// Source-over blend using the alpha channel of `color`.
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        let Some(range) = self.byte_range(x, y) else {
            return;
        };
        let alpha = u16::from(color[3]);
        let dst = &mut self.frame[range];
        for channel in 0..3 {
            let blended = (u16::from(color[channel]) * alpha
                + u16::from(dst[channel]) * (255 - alpha))
                / 255;
            dst[channel] = blended as u8;
        }
        dst[3] = 255;
    }

    fn byte_range(&self, x: i32, y: i32) -> Option<std::ops::Range<usize>> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        let pixel_offset = (y as usize)
            .checked_mul(self.width as usize)?
            .checked_add(x as usize)?;
        let start = pixel_offset.checked_mul(4)?;
        let end = start.checked_add(4)?;
        (end <= self.frame.len()).then_some(start..end)
    }

    fn clip(&self, rect: Rect) -> Option<(i32, i32, i32, i32)> {
        let start_x = rect.x.max(0);
        let start_y = rect.y.max(0);
        let end_x = rect.right().min(self.width as i32);
        let end_y = rect.bottom().min(self.height as i32);
        (end_x > start_x && end_y > start_y).then_some((start_x, start_y, end_x, end_y))
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((start_x, start_y, end_x, end_y)) = self.clip(rect) else {
            return;
        };
        for y in start_y..end_y {
            for x in start_x..end_x {
                self.put_pixel(x, y, color);
            }
        }
    }

    pub fn blend_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((start_x, start_y, end_x, end_y)) = self.clip(rect) else {
            return;
        };
        for y in start_y..end_y {
            for x in start_x..end_x {
                self.blend_pixel(x, y, color);
            }
        }
    }

    /// Border drawn inside `rect`.
    pub fn outline_rect(&mut self, rect: Rect, thickness: i32, color: Rgba) {
        if rect.is_empty() || thickness <= 0 {
            return;
        }
        let t = thickness.min(rect.width).min(rect.height);
        self.fill_rect(Rect::new(rect.x, rect.y, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.bottom() - t, rect.width, t), color);
        self.fill_rect(Rect::new(rect.x, rect.y, t, rect.height), color);
        self.fill_rect(Rect::new(rect.right() - t, rect.y, t, rect.height), color);
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: i32, color: Rgba) {
        if rect.is_empty() {
            return;
        }
        let radius = radius.clamp(0, rect.width.min(rect.height) / 2);
        if radius == 0 {
            self.fill_rect(rect, color);
            return;
        }

        for row in 0..rect.height {
            let corner_row = if row < radius {
                Some(radius - row - 1)
            } else if row >= rect.height - radius {
                Some(row - (rect.height - radius))
            } else {
                None
            };
            let inset = corner_row.map_or(0, |distance| corner_inset(radius, distance));
            self.fill_rect(
                Rect::new(rect.x + inset, rect.y + row, rect.width - inset * 2, 1),
                color,
            );
        }
    }

    /// Horizontal line of `thickness` pixels centered on `y`.
    pub fn draw_hline(&mut self, x0: i32, x1: i32, y: i32, thickness: i32, color: Rgba) {
        let (left, right) = (x0.min(x1), x0.max(x1));
        self.fill_rect(
            Rect::new(left, y - thickness / 2, right - left, thickness.max(1)),
            color,
        );
    }

    /// Vertical line of `thickness` pixels centered on `x`.
    pub fn draw_vline(&mut self, x: i32, y0: i32, y1: i32, thickness: i32, color: Rgba) {
        let (top, bottom) = (y0.min(y1), y0.max(y1));
        self.fill_rect(
            Rect::new(x - thickness / 2, top, thickness.max(1), bottom - top),
            color,
        );
    }

    pub fn draw_text(&mut self, x: i32, y: i32, text: &str, scale: i32, color: Rgba) {
        let scale = scale.max(1);
        let mut cursor_x = x;
        for ch in text.chars() {
            let glyph = glyph_for(ch).unwrap_or(SPACE_GLYPH);
            for row in 0..GLYPH_HEIGHT {
                for col in 0..GLYPH_WIDTH {
                    if glyph.is_set(col, row) {
                        self.fill_rect(
                            Rect::new(cursor_x + col * scale, y + row * scale, scale, scale),
                            color,
                        );
                    }
                }
            }
            cursor_x += font::glyph_advance(scale);
        }
    }

    pub fn draw_text_centered(&mut self, area: Rect, text: &str, scale: i32, color: Rgba) {
        let width = font::text_width(text, scale);
        let height = font::text_height(scale);
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        self.draw_text(x, y, text, scale, color);
    }
}

fn corner_inset(radius: i32, distance_from_center_row: i32) -> i32 {
    let dy = distance_from_center_row as f32 + 0.5;
    let r = radius as f32;
    let dx = (r * r - dy * dy).max(0.0).sqrt();
    (radius - dx.round() as i32).max(0)
}
