//! Hover tracking and the default tooltip.

use crate::render::legend::{escape_html, format_value};
use crate::types::{CategoryField, HoverInfo};

/// Result of feeding a pointer position to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverChange {
    /// Same cell as last time, or still outside.
    Unchanged,
    /// Pointer is now over data cell `(row, col)`.
    Entered(usize, usize),
    /// Pointer left the grid.
    Left,
}

/// Deduplicates pointer moves to one event per resolved cell.
#[derive(Debug, Clone, Default)]
pub struct HoverTracker {
    last: Option<(usize, usize)>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<(usize, usize)> {
        self.last
    }

    pub fn track(&mut self, cell: Option<(usize, usize)>) -> HoverChange {
        if cell == self.last {
            return HoverChange::Unchanged;
        }
        self.last = cell;
        match cell {
            Some((row, col)) => HoverChange::Entered(row, col),
            None => HoverChange::Left,
        }
    }

    /// Forget the last cell so the next move re-emits.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Tooltip markup used when no `onHover` callback is configured.
pub fn default_tooltip_html(info: &HoverInfo) -> String {
    let mut html = format!(
        "<div><b>row</b>: {}</div><div><b>column</b>: {}</div><div><b>value</b>: {}</div>",
        escape_html(&info.row_label),
        escape_html(&info.col_label),
        format_value(info.value)
    );
    push_categories(&mut html, &info.row_categories);
    push_categories(&mut html, &info.col_categories);
    html
}

fn push_categories(html: &mut String, fields: &[CategoryField]) {
    for field in fields {
        html.push_str(&format!(
            "<div><b>{}</b>: {}</div>",
            escape_html(&field.label),
            field.value.as_deref().map_or_else(|| "n/a".to_string(), escape_html)
        ));
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

    fn info() -> HoverInfo {
        HoverInfo {
            row_index: 0,
            col_index: 1,
            value: 2.5,
            row_label: "<r0>".to_string(),
            col_label: "c1".to_string(),
            row_id: None,
            col_id: None,
            row_categories: vec![CategoryField {
                label: "group".to_string(),
                value: None,
            }],
            col_categories: Vec::new(),
        }
    }

    #[test]
    fn repeated_cell_is_deduplicated() {
        let mut hover = HoverTracker::new();
        assert_eq!(hover.track(Some((1, 2))), HoverChange::Entered(1, 2));
        assert_eq!(hover.track(Some((1, 2))), HoverChange::Unchanged);
        assert_eq!(hover.track(Some((1, 3))), HoverChange::Entered(1, 3));
        assert_eq!(hover.track(None), HoverChange::Left);
        assert_eq!(hover.track(None), HoverChange::Unchanged);
    }

    #[test]
    fn tooltip_escapes_and_lists_categories() {
        let html = default_tooltip_html(&info());
        assert!(html.contains("&lt;r0&gt;"));
        assert!(html.contains("2.5"));
        assert!(html.contains("<b>group</b>: n/a"));
    }

    #[test]
    fn tooltip_omits_missing_category_lines() {
        let mut info = info();
        info.row_categories.clear();
        assert!(!default_tooltip_html(&info).contains("group"));
    }
}
