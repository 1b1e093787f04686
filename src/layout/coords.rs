//! Layout constants and the mapping between data indices, viewbox-local cell
//! coordinates, and pixels.
//!
//! Local coordinates are `(x, y)` = (column, row) offsets from the first
//! visible cell; data coordinates are `(row, col)` matrix indices.

use crate::types::{Axis, ChartOptions, EllipsisPos};

/// Smallest cell edge, in pixels.
pub const CELL_MIN: f64 = 1.0;
/// Largest cell edge, in pixels.
pub const CELL_MAX: f64 = 50.0;
/// Pixels added per zoom step.
pub const ZOOM_FACTOR: f64 = 2.0;
/// Matrices above this many cells start at `LARGE_MATRIX_CELL`.
pub const LARGE_MATRIX_CELLS: usize = 250_000;
pub const LARGE_MATRIX_CELL: f64 = 5.0;
/// At or below this cell size labels collapse into one axis label.
pub const LEGIBLE_LABEL_PX: f64 = 10.0;
/// Thickness of one category strip.
pub const CATEGORY_STRIP: f64 = 12.0;
pub const SCROLLBAR_SIZE: f64 = 10.0;
/// Room for row labels (width) and column labels (height).
pub const LABEL_SPACE: f64 = 120.0;
/// Room for the axis titles.
pub const TITLE_SPACE: f64 = 20.0;
/// Extra padding around everything when `useMargins` is set.
pub const MARGIN_PADDING: f64 = 20.0;
/// Width reserved for the tree panel when a newick string is supplied.
pub const TREE_PANEL_WIDTH: f64 = 160.0;

/// Axis-aligned rectangle in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn is_empty(&self) -> bool {
        self.w <= 0.0 || self.h <= 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Layout constants for one render, derived from options and data shape.
///
/// From the left edge inwards: outer padding, tree panel, row title, row
/// labels, text padding, row category strips, grid. The top edge mirrors
/// this without the tree panel.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    pub margins: Margins,
    pub outer_pad: f64,
    pub tree_width: f64,
    pub title_space: f64,
    pub label_space: f64,
    pub text_padding: f64,
    pub max_font_size: f64,
    pub row_strips: usize,
    pub col_strips: usize,
    pub strip_size: f64,
    pub scrollbar_size: f64,
    pub ellipsis: EllipsisPos,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(&ChartOptions::default(), 0, 0, false)
    }
}

impl LayoutConfig {
    #[allow(clippy::cast_precision_loss)]
    pub fn new(options: &ChartOptions, row_strips: usize, col_strips: usize, tree: bool) -> Self {
        let outer_pad = if options.use_margins {
            MARGIN_PADDING
        } else {
            0.0
        };
        let tree_width = if tree { TREE_PANEL_WIDTH } else { 0.0 };
        let text_padding = f64::from(options.text_padding.max(0.0));
        let strip_size = CATEGORY_STRIP;
        let left = outer_pad
            + tree_width
            + TITLE_SPACE
            + LABEL_SPACE
            + text_padding
            + row_strips as f64 * strip_size;
        let top = outer_pad + TITLE_SPACE + LABEL_SPACE + text_padding + col_strips as f64 * strip_size;
        Self {
            margins: Margins {
                top,
                right: SCROLLBAR_SIZE + outer_pad,
                bottom: SCROLLBAR_SIZE + outer_pad,
                left,
            },
            outer_pad,
            tree_width,
            title_space: TITLE_SPACE,
            label_space: LABEL_SPACE,
            text_padding,
            max_font_size: f64::from(options.max_font_size.max(1.0)),
            row_strips,
            col_strips,
            strip_size,
            scrollbar_size: SCROLLBAR_SIZE,
            ellipsis: options.row_label_ellipsis_pos,
        }
    }

    /// Space left for the grid on a surface of the given size.
    pub fn available(&self, width: f64, height: f64) -> (f64, f64) {
        (
            (width - self.margins.left - self.margins.right).max(0.0),
            (height - self.margins.top - self.margins.bottom).max(0.0),
        )
    }

    /// Offset of the first category strip from the grid edge.
    #[allow(clippy::cast_precision_loss)]
    fn strips_extent(&self, axis: Axis) -> f64 {
        let n = match axis {
            Axis::Row => self.row_strips,
            Axis::Col => self.col_strips,
        };
        n as f64 * self.strip_size
    }

    /// Strip `k` of `axis`: x (rows) or y (columns) of its leading edge.
    #[allow(clippy::cast_precision_loss)]
    pub fn strip_offset(&self, axis: Axis, k: usize) -> f64 {
        let edge = match axis {
            Axis::Row => self.margins.left,
            Axis::Col => self.margins.top,
        };
        edge - self.strips_extent(axis) + k as f64 * self.strip_size
    }

    /// Where labels of `axis` end (right edge for rows, bottom for columns).
    pub fn label_edge(&self, axis: Axis) -> f64 {
        let edge = match axis {
            Axis::Row => self.margins.left,
            Axis::Col => self.margins.top,
        };
        edge - self.strips_extent(axis) - self.text_padding
    }

    /// Center of the title band of `axis`, perpendicular to the labels.
    pub fn title_center(&self, axis: Axis) -> f64 {
        let lead = match axis {
            Axis::Row => self.outer_pad + self.tree_width,
            Axis::Col => self.outer_pad,
        };
        lead + self.title_space / 2.0
    }

    /// Tree panel area, if any.
    pub fn tree_rect(&self, height: f64) -> Option<Rect> {
        (self.tree_width > 0.0).then(|| {
            Rect::new(
                self.outer_pad,
                self.margins.top,
                self.tree_width,
                (height - self.margins.top - self.margins.bottom).max(0.0),
            )
        })
    }
}

/// Stateless coordinate math for one viewport state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateSpace {
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_w: f64,
    pub cell_h: f64,
    pub x_start: usize,
    pub y_start: usize,
}

impl CoordinateSpace {
    /// Data `(row, col)` to local `(x, y)`. `None` above/left of the viewbox.
    pub fn data_to_local(&self, row: usize, col: usize) -> Option<(usize, usize)> {
        Some((col.checked_sub(self.x_start)?, row.checked_sub(self.y_start)?))
    }

    /// Local `(x, y)` to data `(row, col)`.
    pub fn local_to_data(&self, x: usize, y: usize) -> (usize, usize) {
        (self.y_start + y, self.x_start + x)
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn local_rect(&self, x: usize, y: usize) -> Rect {
        Rect::new(
            self.origin_x + x as f64 * self.cell_w,
            self.origin_y + y as f64 * self.cell_h,
            self.cell_w,
            self.cell_h,
        )
    }

    pub fn cell_rect(&self, row: usize, col: usize) -> Option<Rect> {
        let (x, y) = self.data_to_local(row, col)?;
        Some(self.local_rect(x, y))
    }

    /// Rectangle covering the inclusive local range.
    #[allow(clippy::cast_precision_loss)]
    pub fn local_span(&self, x1: usize, y1: usize, x2: usize, y2: usize) -> Rect {
        let a = self.local_rect(x1.min(x2), y1.min(y2));
        let w = (x1.abs_diff(x2) + 1) as f64 * self.cell_w;
        let h = (y1.abs_diff(y2) + 1) as f64 * self.cell_h;
        Rect::new(a.x, a.y, w, h)
    }

    /// Pixel to local cell. `None` left of or above the grid origin.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn pixel_to_local(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        if self.cell_w <= 0.0 || self.cell_h <= 0.0 {
            return None;
        }
        let fx = ((px - self.origin_x) / self.cell_w).floor();
        let fy = ((py - self.origin_y) / self.cell_h).floor();
        if fx < 0.0 || fy < 0.0 || !fx.is_finite() || !fy.is_finite() {
            return None;
        }
        Some((fx as usize, fy as usize))
    }

    /// Pixel to data `(row, col)`.
    pub fn pixel_to_data(&self, px: f64, py: f64) -> Option<(usize, usize)> {
        let (x, y) = self.pixel_to_local(px, py)?;
        Some(self.local_to_data(x, y))
    }

    /// Pixel position of the leading edge of item `index` along `axis`
    /// (y for rows, x for columns).
    #[allow(clippy::cast_precision_loss)]
    pub fn item_offset(&self, axis: Axis, index: usize) -> f64 {
        match axis {
            Axis::Row => self.origin_y + (index as f64 - self.y_start as f64) * self.cell_h,
            Axis::Col => self.origin_x + (index as f64 - self.x_start as f64) * self.cell_w,
        }
    }

    pub fn cell_size(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Row => self.cell_h,
            Axis::Col => self.cell_w,
        }
    }

    /// Nearest item boundary (in data indices) to a pixel position along
    /// `axis`. Boundary `b` sits between items `b - 1` and `b`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn boundary_at(&self, axis: Axis, pos: f64) -> usize {
        let (origin, size, start) = match axis {
            Axis::Row => (self.origin_y, self.cell_h, self.y_start),
            Axis::Col => (self.origin_x, self.cell_w, self.x_start),
        };
        if size <= 0.0 {
            return start;
        }
        let local = ((pos - origin) / size).round();
        if local.is_finite() && local > 0.0 {
            start + local as usize
        } else {
            start
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn space() -> CoordinateSpace {
        CoordinateSpace {
            origin_x: 100.0,
            origin_y: 50.0,
            cell_w: 10.0,
            cell_h: 20.0,
            x_start: 3,
            y_start: 5,
        }
    }

    #[test]
    fn pixel_and_data_agree() {
        let cs = space();
        assert_eq!(cs.pixel_to_data(100.0, 50.0), Some((5, 3)));
        assert_eq!(cs.pixel_to_data(125.0, 95.0), Some((7, 5)));
        assert_eq!(cs.pixel_to_data(99.0, 60.0), None);
        let r = cs.cell_rect(7, 5).unwrap();
        assert_eq!((r.x, r.y, r.w, r.h), (120.0, 90.0, 10.0, 20.0));
        assert!(cs.cell_rect(4, 5).is_none());
    }

    #[test]
    fn local_span_covers_reverse_ranges() {
        let cs = space();
        let r = cs.local_span(2, 3, 0, 1);
        assert_eq!((r.x, r.y, r.w, r.h), (100.0, 70.0, 30.0, 60.0));
    }

    #[test]
    fn boundary_rounds_to_nearest_edge() {
        let cs = space();
        assert_eq!(cs.boundary_at(Axis::Col, 100.0), 3);
        assert_eq!(cs.boundary_at(Axis::Col, 114.0), 4);
        assert_eq!(cs.boundary_at(Axis::Col, 116.0), 5);
        assert_eq!(cs.boundary_at(Axis::Row, 0.0), 5);
    }

    #[test]
    fn layout_margins_include_strips_and_padding() {
        let plain = LayoutConfig::new(&ChartOptions::default(), 0, 0, false);
        let opts = ChartOptions {
            use_margins: true,
            ..ChartOptions::default()
        };
        let padded = LayoutConfig::new(&opts, 2, 1, true);
        assert_eq!(
            padded.margins.left - plain.margins.left,
            MARGIN_PADDING + TREE_PANEL_WIDTH + 2.0 * CATEGORY_STRIP
        );
        assert_eq!(
            padded.margins.top - plain.margins.top,
            MARGIN_PADDING + CATEGORY_STRIP
        );
        assert_eq!(padded.strip_offset(Axis::Row, 0), padded.margins.left - 24.0);
        assert_eq!(
            padded.label_edge(Axis::Row),
            padded.margins.left - 24.0 - padded.text_padding
        );
        assert!(padded.tree_rect(500.0).is_some());
        assert!(plain.tree_rect(500.0).is_none());
    }

    #[test]
    fn rect_containment_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(0.0, 9.9));
        assert!(!r.contains(10.0, 5.0));
    }
}
