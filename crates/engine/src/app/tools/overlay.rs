use crate::app::rendering::font::{glyph_advance, text_height, GLYPH_HEIGHT};
use crate::app::rendering::{Canvas, Rect, Rgba};
use crate::app::LoopMetricsSnapshot;

const TEXT_SCALE: i32 = 2;
const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 3) * TEXT_SCALE;
const OVERLAY_PADDING: i32 = 6 * TEXT_SCALE;
const OVERLAY_PANEL_INSET: i32 = 4 * TEXT_SCALE;
const OVERLAY_TEXT_PRIMARY_COLOR: Rgba = [244, 248, 252, 255];
const OVERLAY_TEXT_DIM_COLOR: Rgba = [176, 198, 220, 255];
const OVERLAY_PANEL_BG_COLOR: Rgba = [10, 12, 16, 200];
const OVERLAY_PANEL_BORDER_COLOR: Rgba = [92, 106, 126, 255];
const PERF_SECTION_LABEL: &str = "Perf";
const SCENE_SECTION_LABEL: &str = "Scene";

#[derive(Debug, Clone, Default)]
pub(crate) struct OverlayData {
    pub metrics: LoopMetricsSnapshot,
    pub render_fps_cap: Option<u32>,
    pub scene_lines: Vec<String>,
}

pub(crate) fn draw_overlay(canvas: &mut Canvas<'_>, data: &OverlayData) {
    if canvas.width() == 0 || canvas.height() == 0 {
        return;
    }

    let lines = build_overlay_lines(data);
    let longest_line_chars = lines
        .iter()
        .map(|line| line.chars().count() as i32)
        .max()
        .unwrap_or(0);
    let panel = Rect::new(
        OVERLAY_PADDING - OVERLAY_PANEL_INSET,
        OVERLAY_PADDING - OVERLAY_PANEL_INSET,
        longest_line_chars * glyph_advance(TEXT_SCALE) + OVERLAY_PANEL_INSET * 2,
        (lines.len() as i32 - 1) * LINE_ADVANCE
            + text_height(TEXT_SCALE)
            + OVERLAY_PANEL_INSET * 2,
    );
    canvas.blend_rect(panel, OVERLAY_PANEL_BG_COLOR);
    canvas.outline_rect(panel, 1, OVERLAY_PANEL_BORDER_COLOR);

    let mut y = OVERLAY_PADDING;
    for line in &lines {
        canvas.draw_text(OVERLAY_PADDING, y, line, TEXT_SCALE, overlay_line_color(line));
        y += LINE_ADVANCE;
    }
}

fn build_overlay_lines(data: &OverlayData) -> Vec<String> {
    let mut lines = vec![
        PERF_SECTION_LABEL.to_string(),
        format_fps_line(data.metrics.fps, data.render_fps_cap),
        format!("TPS: {:.1}", data.metrics.tps),
        format!("Frame: {:.2} ms", data.metrics.frame_time_ms),
    ];
    if !data.scene_lines.is_empty() {
        lines.push(String::new());
        lines.push(SCENE_SECTION_LABEL.to_string());
        lines.extend(data.scene_lines.iter().cloned());
    }
    lines
}

fn overlay_line_color(line: &str) -> Rgba {
    if matches!(line, PERF_SECTION_LABEL | SCENE_SECTION_LABEL) {
        OVERLAY_TEXT_DIM_COLOR
    } else {
        OVERLAY_TEXT_PRIMARY_COLOR
    }
}

fn format_fps_line(current_fps: f32, cap: Option<u32>) -> String {
    let cap_text = match cap {
        Some(value) => value.to_string(),
        None => "off".to_string(),
    };
    format!("FPS: {current_fps:.0} cap {cap_text}")
}
