//! Scrollbar geometry and native-scroll mapping.
//!
//! The grid scrolls in whole cells. A native scroll container is given a
//! spacer of `content` pixels; its scroll offset maps back to a start index.

use super::coords::Rect;
use super::viewport::Viewport;
use crate::types::Axis;

/// Minimum thumb length in pixels.
const MIN_THUMB: f64 = 16.0;

/// One axis' scroll extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBox {
    pub axis: Axis,
    /// Full length of the axis at the current cell size.
    pub content: f64,
    /// Length of the visible part.
    pub viewport: f64,
    /// Current offset in pixels.
    pub offset: f64,
    /// Hidden when the whole axis fits.
    pub visible: bool,
    cell: f64,
}

impl ScrollBox {
    #[allow(clippy::cast_precision_loss)]
    pub fn from_viewport(vp: &Viewport, axis: Axis) -> Self {
        let (rows, cols) = vp.shape();
        let (n, view, start, cell) = match axis {
            Axis::Row => (rows, vp.y_view, vp.y_start, vp.cell_h),
            Axis::Col => (cols, vp.x_view, vp.x_start, vp.cell_w),
        };
        Self {
            axis,
            content: n as f64 * cell,
            viewport: view as f64 * cell,
            offset: start as f64 * cell,
            visible: view < n,
            cell,
        }
    }

    /// Start index for a native scroll offset, rounded to the nearest cell.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn start_for_offset(&self, offset: f64) -> usize {
        if self.cell <= 0.0 {
            return 0;
        }
        let idx = (offset / self.cell).round();
        if idx.is_finite() && idx > 0.0 {
            idx as usize
        } else {
            0
        }
    }

    /// Thumb `(position, length)` along a track of `track` pixels.
    pub fn thumb(&self, track: f64) -> (f64, f64) {
        if self.content <= 0.0 || track <= 0.0 {
            return (0.0, track.max(0.0));
        }
        let len = (track * self.viewport / self.content).clamp(MIN_THUMB.min(track), track);
        let scrollable = (self.content - self.viewport).max(0.0);
        let pos = if scrollable > 0.0 {
            (self.offset / scrollable).clamp(0.0, 1.0) * (track - len)
        } else {
            0.0
        };
        (pos, len)
    }

    /// Track and thumb rectangles for a track along `track_rect`.
    pub fn geometry(&self, track_rect: Rect) -> (Rect, Rect) {
        match self.axis {
            Axis::Col => {
                let (pos, len) = self.thumb(track_rect.w);
                (
                    track_rect,
                    Rect::new(track_rect.x + pos, track_rect.y, len, track_rect.h),
                )
            }
            Axis::Row => {
                let (pos, len) = self.thumb(track_rect.h);
                (
                    track_rect,
                    Rect::new(track_rect.x, track_rect.y + pos, track_rect.w, len),
                )
            }
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

    fn viewport() -> Viewport {
        let mut vp = Viewport::new(0.0, 0.0);
        vp.set_shape(100, 4);
        vp.cell_w = 10.0;
        vp.cell_h = 10.0;
        vp.x_view = 4;
        vp.y_view = 20;
        vp.y_start = 40;
        vp
    }

    #[test]
    fn hidden_when_axis_fits() {
        let vp = viewport();
        assert!(!ScrollBox::from_viewport(&vp, Axis::Col).visible);
        let rows = ScrollBox::from_viewport(&vp, Axis::Row);
        assert!(rows.visible);
        assert_eq!((rows.content, rows.viewport, rows.offset), (1000.0, 200.0, 400.0));
    }

    #[test]
    fn offset_maps_back_to_start() {
        let rows = ScrollBox::from_viewport(&viewport(), Axis::Row);
        assert_eq!(rows.start_for_offset(400.0), 40);
        assert_eq!(rows.start_for_offset(404.0), 40);
        assert_eq!(rows.start_for_offset(406.0), 41);
        assert_eq!(rows.start_for_offset(-20.0), 0);
    }

    #[test]
    fn thumb_tracks_offset() {
        let rows = ScrollBox::from_viewport(&viewport(), Axis::Row);
        let (pos, len) = rows.thumb(200.0);
        assert_eq!(len, 40.0);
        assert_eq!(pos, 80.0);
        let (_, thumb) = rows.geometry(Rect::new(500.0, 0.0, 10.0, 200.0));
        assert_eq!((thumb.x, thumb.y, thumb.h), (500.0, 80.0, 40.0));
    }
}
