//! Rectangular drag selection and single-cell click detection.
//!
//! Works in viewbox-local cell coordinates; the chart maps the result back
//! to data indices.

use crate::layout::CoordinateSpace;
use crate::types::SelectionBox;

/// What a completed press/release produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionGesture {
    /// Released without a press inside the grid.
    None,
    /// Zero-extent press/release on local cell `(x, y)`.
    Click { x: usize, y: usize },
    /// Normalized inclusive local bounds.
    Select {
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum State {
    #[default]
    Idle,
    Dragging(SelectionBox),
}

/// `idle -> dragging -> idle`.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: State,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, State::Dragging(_))
    }

    /// The live selection box while dragging.
    pub fn selection(&self) -> Option<SelectionBox> {
        match self.state {
            State::Dragging(b) => Some(b),
            State::Idle => None,
        }
    }

    /// Press on local cell `cell`; `None` (outside the grid) stays idle.
    pub fn pointer_down(&mut self, cell: Option<(usize, usize)>) -> bool {
        match cell {
            Some((x, y)) => {
                self.state = State::Dragging(SelectionBox::at(x, y));
                true
            }
            None => {
                self.state = State::Idle;
                false
            }
        }
    }

    /// Move the corner to `(x, y)`, already clamped to the viewbox. Returns
    /// true when the box changed.
    pub fn pointer_move(&mut self, x: usize, y: usize) -> bool {
        let State::Dragging(b) = &mut self.state else {
            return false;
        };
        if (b.x2, b.y2) == (x, y) {
            return false;
        }
        b.x2 = x;
        b.y2 = y;
        true
    }

    /// Pull both corners back inside a `view_w` x `view_h` viewbox after the
    /// view shrank mid-drag. Returns true when the box changed.
    pub fn clamp_to(&mut self, view_w: usize, view_h: usize) -> bool {
        let State::Dragging(b) = &mut self.state else {
            return false;
        };
        if view_w == 0 || view_h == 0 {
            self.state = State::Idle;
            return true;
        }
        let clamped = SelectionBox {
            x: b.x.min(view_w - 1),
            y: b.y.min(view_h - 1),
            x2: b.x2.min(view_w - 1),
            y2: b.y2.min(view_h - 1),
        };
        let changed = clamped != *b;
        *b = clamped;
        changed
    }

    /// Finish the gesture.
    pub fn pointer_up(&mut self) -> SelectionGesture {
        let state = std::mem::take(&mut self.state);
        match state {
            State::Idle => SelectionGesture::None,
            State::Dragging(b) if b.is_point() => SelectionGesture::Click { x: b.x, y: b.y },
            State::Dragging(b) => {
                let (x1, y1, x2, y2) = b.bounds();
                SelectionGesture::Select { x1, y1, x2, y2 }
            }
        }
    }

    /// Drop any gesture in progress.
    pub fn cancel(&mut self) -> bool {
        let was = self.is_dragging();
        self.state = State::Idle;
        was
    }
}

/// Local cell under a pixel, clamped into a `view_w` x `view_h` viewbox.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn clamp_to_view(
    cs: &CoordinateSpace,
    view_w: usize,
    view_h: usize,
    px: f64,
    py: f64,
) -> Option<(usize, usize)> {
    if view_w == 0 || view_h == 0 || cs.cell_w <= 0.0 || cs.cell_h <= 0.0 {
        return None;
    }
    let clamp = |v: f64, n: usize| -> usize {
        if v.is_finite() && v > 0.0 {
            (v as usize).min(n - 1)
        } else {
            0
        }
    };
    let fx = ((px - cs.origin_x) / cs.cell_w).floor();
    let fy = ((py - cs.origin_y) / cs.cell_h).floor();
    Some((clamp(fx, view_w), clamp(fy, view_h)))
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

    fn cs() -> CoordinateSpace {
        CoordinateSpace {
            origin_x: 100.0,
            origin_y: 50.0,
            cell_w: 10.0,
            cell_h: 10.0,
            x_start: 0,
            y_start: 0,
        }
    }

    #[test]
    fn zero_extent_is_click() {
        let mut sel = SelectionController::new();
        assert!(sel.pointer_down(Some((1, 1))));
        assert_eq!(sel.pointer_up(), SelectionGesture::Click { x: 1, y: 1 });
        assert!(!sel.is_dragging());
    }

    #[test]
    fn drag_back_to_origin_is_click() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Some((2, 2)));
        sel.pointer_move(4, 4);
        sel.pointer_move(2, 2);
        assert_eq!(sel.pointer_up(), SelectionGesture::Click { x: 2, y: 2 });
    }

    #[test]
    fn reverse_drag_is_normalized() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Some((5, 4)));
        assert!(sel.pointer_move(1, 2));
        assert!(!sel.pointer_move(1, 2));
        assert_eq!(
            sel.pointer_up(),
            SelectionGesture::Select {
                x1: 1,
                y1: 2,
                x2: 5,
                y2: 4
            }
        );
    }

    #[test]
    fn press_outside_grid_stays_idle() {
        let mut sel = SelectionController::new();
        assert!(!sel.pointer_down(None));
        assert!(!sel.pointer_move(3, 3));
        assert_eq!(sel.pointer_up(), SelectionGesture::None);
    }

    #[test]
    fn cancel_drops_the_box() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Some((0, 0)));
        assert!(sel.cancel());
        assert!(sel.selection().is_none());
        assert!(!sel.cancel());
    }

    #[test]
    fn shrunken_view_clamps_the_box() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Some((2, 1)));
        sel.pointer_move(9, 7);
        assert!(sel.clamp_to(5, 4));
        assert!(!sel.clamp_to(5, 4));
        assert_eq!(
            sel.pointer_up(),
            SelectionGesture::Select {
                x1: 2,
                y1: 1,
                x2: 4,
                y2: 3
            }
        );
    }

    #[test]
    fn empty_view_drops_the_box() {
        let mut sel = SelectionController::new();
        sel.pointer_down(Some((0, 0)));
        assert!(sel.clamp_to(0, 3));
        assert_eq!(sel.pointer_up(), SelectionGesture::None);
    }

    #[test]
    fn clamps_pointer_to_viewbox() {
        let cs = cs();
        assert_eq!(clamp_to_view(&cs, 5, 4, 0.0, 0.0), Some((0, 0)));
        assert_eq!(clamp_to_view(&cs, 5, 4, 1000.0, 1000.0), Some((4, 3)));
        assert_eq!(clamp_to_view(&cs, 5, 4, 125.0, 61.0), Some((2, 1)));
        assert_eq!(clamp_to_view(&cs, 0, 4, 125.0, 61.0), None);
    }
}
