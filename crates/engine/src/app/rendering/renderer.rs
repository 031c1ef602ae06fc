use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::tools::{draw_overlay, OverlayData};
use crate::app::Vec2;

use super::Canvas;

/// Presents a fixed-size canvas, scaled by pixels to whatever surface the
/// window currently has.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    canvas_width: u32,
    canvas_height: u32,
}

impl Renderer {
    pub fn new(window: Arc<Window>, canvas_width: u32, canvas_height: u32) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(
            Arc::clone(&window),
            size.width,
            size.height,
            canvas_width,
            canvas_height,
        )?;
        Ok(Self {
            window,
            pixels,
            canvas_width,
            canvas_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(
            Arc::clone(&self.window),
            width,
            height,
            self.canvas_width,
            self.canvas_height,
        )?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        surface_width: u32,
        surface_height: u32,
        canvas_width: u32,
        canvas_height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width.max(1), surface_height.max(1), window);
        Pixels::new(canvas_width, canvas_height, surface)
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    /// Maps a physical window position to canvas pixels, or `None` outside the
    /// presented canvas.
    pub fn window_to_canvas(&self, x: f32, y: f32) -> Option<Vec2> {
        self.pixels
            .window_pos_to_pixel((x, y))
            .ok()
            .map(|(px, py)| Vec2 {
                x: px as f32,
                y: py as f32,
            })
    }

    pub(crate) fn render_frame<F>(
        &mut self,
        draw_scene: F,
        overlay_data: Option<&OverlayData>,
    ) -> Result<(), Error>
    where
        F: FnOnce(&mut Canvas<'_>),
    {
        let mut canvas = Canvas::new(
            self.pixels.frame_mut(),
            self.canvas_width,
            self.canvas_height,
        );
        draw_scene(&mut canvas);
        if let Some(data) = overlay_data {
            draw_overlay(&mut canvas, data);
        }
        self.pixels.render()
    }
}
