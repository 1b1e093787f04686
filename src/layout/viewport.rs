//! Viewport state: scroll offsets (in whole cells), cell size, and the
//! derived view sizes.

use std::ops::Range;

use serde::Serialize;

use super::coords::{
    CoordinateSpace, LayoutConfig, CELL_MAX, CELL_MIN, LARGE_MATRIX_CELL, LARGE_MATRIX_CELLS,
    ZOOM_FACTOR,
};
use crate::types::{Axis, CellDefaults};

/// Serializable snapshot of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewportState {
    pub x_start: usize,
    pub y_start: usize,
    pub cell_w: f64,
    pub cell_h: f64,
    pub x_view_size: usize,
    pub y_view_size: usize,
}

/// Viewport controller.
///
/// `x_view`/`y_view` are the number of whole cells that fit the surface,
/// never more than the matrix has.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub x_start: usize,
    pub y_start: usize,
    pub cell_w: f64,
    pub cell_h: f64,
    pub x_view: usize,
    pub y_view: usize,
    /// Surface width in CSS pixels
    pub width: f64,
    /// Surface height in CSS pixels
    pub height: f64,
    /// Zoom both axes together and keep cells square.
    pub locked: bool,
    n_rows: usize,
    n_cols: usize,
    initialized: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            x_start: 0,
            y_start: 0,
            cell_w: CELL_MIN,
            cell_h: CELL_MIN,
            x_view: 0,
            y_view: 0,
            width,
            height,
            locked: false,
            n_rows: 0,
            n_cols: 0,
            initialized: false,
        }
    }

    /// Whether the initial cell size has been computed.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Forget the cell size so the next redraw stages again.
    pub fn invalidate(&mut self) {
        self.initialized = false;
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Track a new matrix shape and reset scroll.
    pub fn set_shape(&mut self, rows: usize, cols: usize) {
        self.n_rows = rows;
        self.n_cols = cols;
        self.x_start = 0;
        self.y_start = 0;
    }

    /// Swap axes after a flip; offsets and cell sizes travel with their axis.
    pub fn flip(&mut self) {
        std::mem::swap(&mut self.n_rows, &mut self.n_cols);
        std::mem::swap(&mut self.x_start, &mut self.y_start);
        std::mem::swap(&mut self.cell_w, &mut self.cell_h);
        std::mem::swap(&mut self.x_view, &mut self.y_view);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    /// Initial cell size: the available surface divided by the matrix
    /// dimensions, capped at `CELL_MAX`. Above `LARGE_MATRIX_CELLS` a fixed
    /// cell is used. Configured defaults override the computed size.
    pub fn init_cell_size(&mut self, layout: &LayoutConfig, defaults: CellDefaults) {
        let (avail_w, avail_h) = layout.available(self.width, self.height);
        let (w, h) = initial_cell_size(avail_w, avail_h, self.n_rows, self.n_cols);
        self.cell_w = defaults.cell_width.map_or(w, |v| clamp_cell(f64::from(v)));
        self.cell_h = defaults.cell_height.map_or(h, |v| clamp_cell(f64::from(v)));
        if self.locked {
            self.square();
        }
        self.initialized = true;
        tracing::debug!(cell_w = self.cell_w, cell_h = self.cell_h, "initial cell size");
    }

    /// Recompute `x_view`/`y_view` from the surface and clamp offsets.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn compute_view_size(&mut self, layout: &LayoutConfig) {
        let (avail_w, avail_h) = layout.available(self.width, self.height);
        let fit = |avail: f64, cell: f64, n: usize| -> usize {
            let k = (avail / cell).floor();
            if k.is_finite() && k > 0.0 {
                (k as usize).min(n)
            } else {
                0
            }
        };
        self.x_view = fit(avail_w, self.cell_w, self.n_cols);
        self.y_view = fit(avail_h, self.cell_h, self.n_rows);
        self.clamp_offsets();
    }

    /// Largest useful start offset along `axis`.
    pub fn max_start(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.n_rows.saturating_sub(self.y_view),
            Axis::Col => self.n_cols.saturating_sub(self.x_view),
        }
    }

    fn clamp_offsets(&mut self) {
        self.x_start = self.x_start.min(self.max_start(Axis::Col));
        self.y_start = self.y_start.min(self.max_start(Axis::Row));
    }

    /// Set either offset. Returns true when something moved.
    pub fn pan(&mut self, x_start: Option<usize>, y_start: Option<usize>) -> bool {
        let before = (self.x_start, self.y_start);
        if let Some(x) = x_start {
            self.x_start = x;
        }
        if let Some(y) = y_start {
            self.y_start = y;
        }
        self.clamp_offsets();
        before != (self.x_start, self.y_start)
    }

    /// Move by whole cells.
    pub fn pan_by(&mut self, dx: isize, dy: isize) -> bool {
        let x = self.x_start.saturating_add_signed(dx);
        let y = self.y_start.saturating_add_signed(dy);
        self.pan(Some(x), Some(y))
    }

    /// Scroll just enough that item `index` of `axis` is visible.
    pub fn scroll_into_view(&mut self, axis: Axis, index: usize) -> bool {
        let (start, view) = match axis {
            Axis::Row => (self.y_start, self.y_view.max(1)),
            Axis::Col => (self.x_start, self.x_view.max(1)),
        };
        let target = if index < start {
            index
        } else if index >= start + view {
            index + 1 - view
        } else {
            return false;
        };
        match axis {
            Axis::Row => self.pan(None, Some(target)),
            Axis::Col => self.pan(Some(target), None),
        }
    }

    /// `cell += delta * ZOOM_FACTOR` on `axis` (both when `None`), clamped.
    /// With the lock active both axes move together and stay square.
    pub fn zoom(&mut self, delta: f64, axis: Option<Axis>) -> bool {
        let before = (self.cell_w, self.cell_h);
        let step = delta * ZOOM_FACTOR;
        if self.locked {
            let base = match axis {
                Some(Axis::Row) => self.cell_h,
                _ => self.cell_w,
            };
            let size = clamp_cell(base + step);
            self.cell_w = size;
            self.cell_h = size;
        } else {
            if axis != Some(Axis::Row) {
                self.cell_w = clamp_cell(self.cell_w + step);
            }
            if axis != Some(Axis::Col) {
                self.cell_h = clamp_cell(self.cell_h + step);
            }
        }
        tracing::debug!(cell_w = self.cell_w, cell_h = self.cell_h, "zoom");
        (before.0 - self.cell_w).abs() > f64::EPSILON || (before.1 - self.cell_h).abs() > f64::EPSILON
    }

    /// Toggle the zoom lock; locking squares the cells to the smaller edge.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.square();
        }
    }

    fn square(&mut self) {
        let size = self.cell_w.min(self.cell_h);
        self.cell_w = size;
        self.cell_h = size;
    }

    /// Visible data rows, clipped to the matrix.
    pub fn visible_rows(&self) -> Range<usize> {
        self.y_start.min(self.n_rows)..(self.y_start + self.y_view).min(self.n_rows)
    }

    /// Visible data columns, clipped to the matrix.
    pub fn visible_cols(&self) -> Range<usize> {
        self.x_start.min(self.n_cols)..(self.x_start + self.x_view).min(self.n_cols)
    }

    pub fn visible(&self, axis: Axis) -> Range<usize> {
        match axis {
            Axis::Row => self.visible_rows(),
            Axis::Col => self.visible_cols(),
        }
    }

    pub fn coords(&self, layout: &LayoutConfig) -> CoordinateSpace {
        CoordinateSpace {
            origin_x: layout.margins.left,
            origin_y: layout.margins.top,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
            x_start: self.x_start,
            y_start: self.y_start,
        }
    }

    pub fn state(&self) -> ViewportState {
        ViewportState {
            x_start: self.x_start,
            y_start: self.y_start,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
            x_view_size: self.x_view,
            y_view_size: self.y_view,
        }
    }
}

pub fn clamp_cell(size: f64) -> f64 {
    if size.is_finite() {
        size.clamp(CELL_MIN, CELL_MAX)
    } else {
        CELL_MIN
    }
}

/// Cell size for a matrix on the given available area.
#[allow(clippy::cast_precision_loss)]
pub fn initial_cell_size(avail_w: f64, avail_h: f64, rows: usize, cols: usize) -> (f64, f64) {
    if rows.saturating_mul(cols) > LARGE_MATRIX_CELLS {
        return (LARGE_MATRIX_CELL, LARGE_MATRIX_CELL);
    }
    let w = if cols > 0 { avail_w / cols as f64 } else { CELL_MAX };
    let h = if rows > 0 { avail_h / rows as f64 } else { CELL_MAX };
    (clamp_cell(w), clamp_cell(h))
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

    fn viewport(rows: usize, cols: usize) -> (Viewport, LayoutConfig) {
        let layout = LayoutConfig::default();
        let mut vp = Viewport::new(
            layout.margins.left + layout.margins.right + 200.0,
            layout.margins.top + layout.margins.bottom + 100.0,
        );
        vp.set_shape(rows, cols);
        (vp, layout)
    }

    #[test]
    fn initial_size_divides_available_space() {
        assert_eq!(initial_cell_size(200.0, 100.0, 10, 20), (10.0, 10.0));
        assert_eq!(initial_cell_size(200.0, 100.0, 1, 1), (CELL_MAX, CELL_MAX));
        assert_eq!(initial_cell_size(200.0, 100.0, 1000, 1000), (5.0, 5.0));
    }

    #[test]
    fn view_size_counts_whole_cells() {
        let (mut vp, layout) = viewport(100, 100);
        vp.cell_w = 30.0;
        vp.cell_h = 30.0;
        vp.compute_view_size(&layout);
        assert_eq!((vp.x_view, vp.y_view), (6, 3));
    }

    #[test]
    fn view_size_never_exceeds_matrix() {
        let (mut vp, layout) = viewport(2, 3);
        vp.cell_w = 1.0;
        vp.cell_h = 1.0;
        vp.compute_view_size(&layout);
        assert_eq!((vp.x_view, vp.y_view), (3, 2));
        assert_eq!(vp.visible_rows(), 0..2);
    }

    #[test]
    fn pan_clamps_to_last_full_view() {
        let (mut vp, layout) = viewport(100, 100);
        vp.cell_w = 20.0;
        vp.cell_h = 20.0;
        vp.compute_view_size(&layout);
        assert!(vp.pan(Some(500), Some(3)));
        assert_eq!(vp.x_start, 90);
        assert_eq!(vp.y_start, 3);
        assert!(!vp.pan_by(0, 0));
        vp.pan_by(-10, -10);
        assert_eq!((vp.x_start, vp.y_start), (80, 0));
    }

    #[test]
    fn zoom_is_clamped_and_axis_specific() {
        let (mut vp, _) = viewport(10, 10);
        vp.cell_w = 10.0;
        vp.cell_h = 10.0;
        vp.zoom(1.0, Some(Axis::Col));
        assert_eq!((vp.cell_w, vp.cell_h), (12.0, 10.0));
        vp.zoom(-100.0, None);
        assert_eq!((vp.cell_w, vp.cell_h), (CELL_MIN, CELL_MIN));
        vp.zoom(100.0, Some(Axis::Row));
        assert_eq!(vp.cell_h, CELL_MAX);
    }

    #[test]
    fn locked_zoom_keeps_cells_square() {
        let (mut vp, _) = viewport(10, 10);
        vp.cell_w = 10.0;
        vp.cell_h = 16.0;
        vp.set_locked(true);
        assert_eq!(vp.cell_h, 10.0);
        vp.zoom(2.0, Some(Axis::Row));
        assert_eq!((vp.cell_w, vp.cell_h), (14.0, 14.0));
    }

    #[test]
    fn scroll_into_view_moves_minimally() {
        let (mut vp, layout) = viewport(100, 100);
        vp.cell_w = 20.0;
        vp.cell_h = 20.0;
        vp.compute_view_size(&layout);
        assert!(vp.scroll_into_view(Axis::Row, 40));
        assert_eq!(vp.y_start, 36);
        assert!(!vp.scroll_into_view(Axis::Row, 38));
        assert!(vp.scroll_into_view(Axis::Row, 2));
        assert_eq!(vp.y_start, 2);
    }

    #[test]
    fn flip_swaps_axes() {
        let (mut vp, _) = viewport(4, 9);
        vp.x_start = 2;
        vp.cell_w = 7.0;
        vp.flip();
        assert_eq!(vp.shape(), (9, 4));
        assert_eq!(vp.y_start, 2);
        assert_eq!(vp.cell_h, 7.0);
    }
}
