//! Paints engine frames onto a `<canvas>` element.
//!
//! The buffer is sized in physical pixels and the context is scaled by the
//! device pixel ratio, so every draw call below works in CSS pixels.

use std::f64::consts::FRAC_PI_2;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::Result;
use crate::layout::Rect;
use crate::render::backend::RenderBackend;
use crate::render::colors::{palette, ThemeColors};
use crate::render::frame::{Decorations, Frame, Label, TextAnchor};
use crate::render::text::font_spec;

/// Stroke width of the hover outline and selection rectangle.
const OUTLINE_WIDTH: f64 = 2.0;

pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    width: u32,
    height: u32,
    dpr: f32,
    /// Generation of the last painted frame.
    painted: Option<u64>,
}

impl CanvasRenderer {
    /// Wrap `canvas`; fails when no 2D context can be obtained.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| "Failed to get 2d context")?
            .ok_or("No 2d context available")?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| "Failed to cast to CanvasRenderingContext2d")?;

        let width = canvas.width();
        let height = canvas.height();

        Ok(Self {
            canvas,
            ctx,
            width,
            height,
            dpr: 1.0,
            painted: None,
        })
    }

    /// The 2D context, for text measurement.
    pub fn context(&self) -> CanvasRenderingContext2d {
        self.ctx.clone()
    }

    /// Set the CSS dimensions of the canvas element (logical pixels).
    pub fn set_canvas_css_size(&self, css_w: f64, css_h: f64) {
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{css_w}px"));
        let _ = style.set_property("height", &format!("{css_h}px"));
    }

    /// Generation of the frame currently on screen.
    pub fn painted_generation(&self) -> Option<u64> {
        self.painted
    }

    /// Half-pixel offset so 1px strokes land on a device pixel.
    fn crisp(x: f64) -> f64 {
        x.floor() + 0.5
    }

    fn fill_rect(&self, r: Rect, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(r.x, r.y, r.w, r.h);
    }

    fn stroke_rect(&self, r: Rect, width: f64, color: &str) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.stroke_rect(r.x, r.y, r.w, r.h);
    }

    fn stroke_line(&self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: &str) {
        self.ctx.begin_path();
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(width);
        self.ctx.move_to(Self::crisp(x1), Self::crisp(y1));
        self.ctx.line_to(Self::crisp(x2), Self::crisp(y2));
        self.ctx.stroke();
    }

    fn draw_label(&self, label: &Label, colors: &ThemeColors) {
        if label.text.is_empty() {
            return;
        }
        self.ctx.save();
        let _ = self.ctx.translate(label.x, label.y);
        if label.rotated {
            let _ = self.ctx.rotate(-FRAC_PI_2);
        }
        if let Some(band) = label.highlight_rect() {
            self.fill_rect(
                Rect::new(band.x - label.x, band.y - label.y, band.w, band.h),
                palette::SEARCH_HIGHLIGHT,
            );
        }
        let weight = if label.emphasized { "bold " } else { "" };
        self.ctx.set_font(&format!("{weight}{}", font_spec(label.font_px)));
        self.ctx.set_text_align(match label.anchor {
            TextAnchor::Start => "left",
            TextAnchor::Middle => "center",
            TextAnchor::End => "right",
        });
        self.ctx.set_text_baseline("middle");
        let color = if label.emphasized { colors.hover } else { colors.text };
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(&label.text, 0.0, 0.0);
        self.ctx.restore();
    }

    fn draw_decorations(&self, deco: &Decorations, colors: &ThemeColors) {
        if let Some(cell) = deco.hover_cell {
            self.stroke_rect(cell, OUTLINE_WIDTH, colors.hover);
        }
        if let Some(sel) = deco.selection {
            self.fill_rect(sel, palette::SELECTION_FILL);
            self.stroke_rect(sel, OUTLINE_WIDTH, palette::SELECTION);
        }
        if let Some(line) = deco.drag_guide {
            self.stroke_line(line.x1, line.y1, line.x2, line.y2, OUTLINE_WIDTH, palette::DRAG_GUIDE);
        }
    }
}

impl RenderBackend for CanvasRenderer {
    fn resize(&mut self, width: u32, height: u32, dpr: f32) {
        self.width = width;
        self.height = height;
        self.dpr = dpr;
        self.painted = None;

        // Set canvas buffer size to physical pixels
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.ctx
            .reset_transform()
            .map_err(|_| "Failed to reset transform")?;
        self.ctx
            .clear_rect(0.0, 0.0, f64::from(self.width), f64::from(self.height));

        // Clips survive reset_transform(); keep every frame inside save/restore.
        self.ctx.save();
        let _ = self.ctx.scale(f64::from(self.dpr), f64::from(self.dpr));

        let colors = &frame.colors;
        self.fill_rect(Rect::new(0.0, 0.0, frame.width, frame.height), colors.background);

        for cell in frame.cells.visible() {
            self.fill_rect(cell.rect, &cell.color.to_hex());
        }
        for strip in frame.row_strips.visible().chain(frame.col_strips.visible()) {
            self.fill_rect(strip.rect, &strip.color.to_hex());
        }
        for label in frame.row_labels.iter().chain(&frame.col_labels).chain(&frame.titles) {
            self.draw_label(label, colors);
        }
        self.draw_decorations(&frame.decorations, colors);

        self.ctx.restore();
        self.painted = Some(frame.generation);
        Ok(())
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }
}
