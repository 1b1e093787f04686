//! Label measurement against the active canvas font.

use web_sys::CanvasRenderingContext2d;

use crate::render::text::{font_spec, TextMeasure};

/// Measures with `measureText` on a 2D context.
///
/// The context font is only touched when the requested size changes.
pub struct CanvasTextMeasure {
    ctx: CanvasRenderingContext2d,
    font_px: Option<u64>,
}

impl CanvasTextMeasure {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, font_px: None }
    }

    /// Forget the applied font, e.g. after a web font finished loading.
    pub fn reset(&mut self) {
        self.font_px = None;
    }
}

impl TextMeasure for CanvasTextMeasure {
    fn measure(&mut self, text: &str, font_px: f64) -> f64 {
        if self.font_px != Some(font_px.to_bits()) {
            self.ctx.set_font(&font_spec(font_px));
            self.font_px = Some(font_px.to_bits());
        }
        self.ctx
            .measure_text(text)
            .map(|m| m.width())
            .unwrap_or(0.0)
    }
}
