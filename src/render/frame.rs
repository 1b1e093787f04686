//! Backend-neutral description of one presented frame.
//!
//! The engine keeps a single `Frame` and updates it in place; backends only
//! read it.

use super::colors::ThemeColors;
use super::sprites::{CellSprite, SpritePool, StripSprite};
use crate::layout::Rect;
use crate::types::{Axis, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

/// A row/column label, an axis title, or a collapsed whole-axis label.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Label {
    pub text: String,
    /// Anchor point. Rotated labels are drawn at -90 degrees around it.
    pub x: f64,
    pub y: f64,
    pub font_px: f64,
    /// Measured text width in pixels.
    pub width: f64,
    pub anchor: TextAnchor,
    pub rotated: bool,
    /// Data index for per-item labels.
    pub index: Option<usize>,
    /// Search match band, as pixel offsets along the text from its start.
    pub highlight: Option<(f64, f64)>,
    pub emphasized: bool,
    /// Pointer target area of the label.
    pub hit: Rect,
}

impl Label {
    /// Offset from the anchor to where the text begins, along the text direction.
    pub fn start_offset(&self) -> f64 {
        match self.anchor {
            TextAnchor::Start => 0.0,
            TextAnchor::Middle => -self.width / 2.0,
            TextAnchor::End => -self.width,
        }
    }

    /// Search highlight band in unrotated label space: `(x, y, w, h)`.
    pub fn highlight_rect(&self) -> Option<Rect> {
        let (a, b) = self.highlight?;
        Some(Rect::new(
            self.x + self.start_offset() + a,
            self.y - self.font_px / 2.0,
            b - a,
            self.font_px,
        ))
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Transient overlays drawn on top of the grid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decorations {
    pub selection: Option<Rect>,
    pub drag_guide: Option<Line>,
    pub hover_cell: Option<Rect>,
    /// Hovered data row/column, for label emphasis.
    pub hover_row: Option<usize>,
    pub hover_col: Option<usize>,
}

impl Decorations {
    pub fn clear_hover(&mut self) {
        self.hover_cell = None;
        self.hover_row = None;
        self.hover_col = None;
    }

    /// Remove every gesture decoration.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Scrollbar {
    pub track: Rect,
    pub thumb: Rect,
    pub visible: bool,
}

/// Everything a backend needs to paint.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: f64,
    pub height: f64,
    pub theme: Theme,
    pub colors: ThemeColors,
    pub cells: SpritePool<CellSprite>,
    pub row_strips: SpritePool<StripSprite>,
    pub col_strips: SpritePool<StripSprite>,
    pub row_labels: Vec<Label>,
    pub col_labels: Vec<Label>,
    pub titles: Vec<Label>,
    pub row_scrollbar: Scrollbar,
    pub col_scrollbar: Scrollbar,
    /// Mouse-capture overlay: the visible grid area.
    pub capture: Rect,
    pub decorations: Decorations,
    /// Presentations so far.
    pub generation: u64,
}

impl Frame {
    pub fn new(theme: Theme) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            theme,
            colors: ThemeColors::for_theme(theme),
            cells: SpritePool::new(),
            row_strips: SpritePool::new(),
            col_strips: SpritePool::new(),
            row_labels: Vec::new(),
            col_labels: Vec::new(),
            titles: Vec::new(),
            row_scrollbar: Scrollbar::default(),
            col_scrollbar: Scrollbar::default(),
            capture: Rect::default(),
            decorations: Decorations::default(),
            generation: 0,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.colors = ThemeColors::for_theme(theme);
    }

    pub fn labels(&self, axis: Axis) -> &[Label] {
        match axis {
            Axis::Row => &self.row_labels,
            Axis::Col => &self.col_labels,
        }
    }

    pub fn labels_mut(&mut self, axis: Axis) -> &mut Vec<Label> {
        match axis {
            Axis::Row => &mut self.row_labels,
            Axis::Col => &mut self.col_labels,
        }
    }

    pub fn strips(&self, axis: Axis) -> &SpritePool<StripSprite> {
        match axis {
            Axis::Row => &self.row_strips,
            Axis::Col => &self.col_strips,
        }
    }

    /// The per-item label under a pixel, if any.
    pub fn label_at(&self, px: f64, py: f64) -> Option<(Axis, usize)> {
        [Axis::Row, Axis::Col].into_iter().find_map(|axis| {
            self.labels(axis)
                .iter()
                .find(|l| l.index.is_some() && l.hit.contains(px, py))
                .and_then(|l| l.index.map(|i| (axis, i)))
        })
    }
}
