//! Drag-and-drop reordering of rows or columns by their labels.

use crate::types::Axis;

/// Index an item lands on when dropped at `boundary`.
///
/// Boundary `b` sits between items `b - 1` and `b`. Removing the source first
/// shifts every later boundary down by one.
pub fn drop_destination(from: usize, boundary: usize) -> usize {
    if boundary > from {
        boundary - 1
    } else {
        boundary
    }
}

/// One controller per axis.
#[derive(Debug, Clone)]
pub struct DragReorder {
    axis: Axis,
    source: Option<usize>,
    /// Candidate insertion boundary shown by the guide line.
    boundary: Option<usize>,
}

impl DragReorder {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            source: None,
            boundary: None,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn is_dragging(&self) -> bool {
        self.source.is_some()
    }

    pub fn source(&self) -> Option<usize> {
        self.source
    }

    pub fn boundary(&self) -> Option<usize> {
        self.boundary
    }

    pub fn drag_start(&mut self, index: usize) {
        self.source = Some(index);
        self.boundary = None;
    }

    /// Move the guide to `boundary`, clamped to `[0, len]`. Returns true when
    /// the guide moved.
    pub fn drag_over(&mut self, boundary: usize, len: usize) -> bool {
        if self.source.is_none() {
            return false;
        }
        let boundary = Some(boundary.min(len));
        let moved = self.boundary != boundary;
        self.boundary = boundary;
        moved
    }

    /// Finish the drag. Returns `(from, to)` when the item actually moves.
    pub fn drag_end(&mut self) -> Option<(usize, usize)> {
        let from = self.source.take()?;
        let boundary = self.boundary.take()?;
        let to = drop_destination(from, boundary);
        (to != from).then_some((from, to))
    }

    pub fn cancel(&mut self) -> bool {
        let was = self.is_dragging();
        self.source = None;
        self.boundary = None;
        was
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
    use test_case::test_case;

    #[test_case(0, 3, 2 ; "down past two items")]
    #[test_case(3, 0, 0 ; "up to the top")]
    #[test_case(2, 2, 2 ; "own leading edge")]
    #[test_case(2, 3, 2 ; "own trailing edge")]
    #[test_case(1, 4, 3 ; "to the end")]
    fn destination_accounts_for_removal(from: usize, boundary: usize, expected: usize) {
        assert_eq!(drop_destination(from, boundary), expected);
    }

    #[test]
    fn drag_emits_move() {
        let mut drag = DragReorder::new(Axis::Row);
        drag.drag_start(0);
        assert!(drag.drag_over(3, 4));
        assert!(!drag.drag_over(3, 4));
        assert_eq!(drag.drag_end(), Some((0, 2)));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn drop_in_place_is_noop() {
        let mut drag = DragReorder::new(Axis::Col);
        drag.drag_start(1);
        drag.drag_over(2, 4);
        assert_eq!(drag.drag_end(), None);
    }

    #[test]
    fn drag_without_start_is_ignored() {
        let mut drag = DragReorder::new(Axis::Row);
        assert!(!drag.drag_over(1, 4));
        assert_eq!(drag.drag_end(), None);
    }

    #[test]
    fn boundary_is_clamped() {
        let mut drag = DragReorder::new(Axis::Row);
        drag.drag_start(0);
        drag.drag_over(99, 4);
        assert_eq!(drag.boundary(), Some(4));
        assert_eq!(drag.drag_end(), Some((0, 3)));
    }
}
