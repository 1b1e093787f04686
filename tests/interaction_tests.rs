//! Pointer interaction tests
//!
//! Click and drag selection, hover, label clicks, drag reordering, sorting
//! and search, driven through `Chart` with pixel coordinates.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use common::*;
use heatview::interact::default_tooltip_html;
use heatview::sort::{SortDirection, SortKey};
use heatview::{Axis, Chart, ChartEvent};

fn grid(m: usize, n: usize) -> Chart {
    rendered(&ChartBuilder::new(m, n).cell_size(20.0, 20.0).build())
}

fn selection_values(event: Option<ChartEvent>) -> Vec<f64> {
    match event {
        Some(ChartEvent::Selection(entries)) => entries.iter().map(|e| e.value).collect(),
        other => panic!("expected a selection, got {other:?}"),
    }
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn click_reports_entry_with_metadata() {
    let config = ChartBuilder::new(4, 3)
        .row_meta("Parity", |i| if i % 2 == 0 { "even" } else { "odd" })
        .cell_size(20.0, 20.0)
        .build();
    let mut chart = rendered(&config);
    let (x, y) = cell_center(&chart, 2, 1);
    assert!(chart.pointer_down(x, y));
    let Some(ChartEvent::Click(entry)) = chart.pointer_up() else {
        panic!("expected a click");
    };
    assert_eq!(entry.value, 7.0);
    assert_eq!(entry.row_label, "r2");
    assert_eq!(entry.col_label, "c1");
    assert_eq!(entry.row_meta, Some(vec![Some("even".to_string())]));
    assert_eq!(entry.col_meta, None);
}

#[test]
fn drag_past_the_grid_clamps_to_last_visible_cell() {
    let mut chart = grid(5, 5);
    let (x, y) = cell_center(&chart, 1, 1);
    chart.pointer_down(x, y);
    chart.pointer_move(10_000.0, 10_000.0);
    render(&mut chart);
    assert!(chart.frame().decorations.selection.is_some());
    let values = selection_values(chart.pointer_up());
    assert_eq!(values.len(), 16);
    assert_eq!(values.first(), Some(&6.0));
    assert_eq!(values.last(), Some(&24.0));
}

#[test]
fn dragging_up_and_left_normalizes_bounds() {
    let mut chart = grid(4, 4);
    let (x1, y1) = cell_center(&chart, 3, 3);
    let (x2, y2) = cell_center(&chart, 2, 2);
    chart.pointer_down(x1, y1);
    chart.pointer_move(x2, y2);
    assert_eq!(selection_values(chart.pointer_up()), vec![10.0, 11.0, 14.0, 15.0]);
}

#[test]
fn press_outside_grid_does_nothing() {
    let mut chart = grid(4, 4);
    assert!(!chart.pointer_down(1.0, 1.0));
    assert_eq!(chart.pointer_up(), None);
}

#[test]
fn selection_maps_through_scroll_offsets() {
    let mut chart = grid(100, 100);
    chart.pan(Some(15), Some(25));
    render(&mut chart);
    let (x, y) = cell_center(&chart, 25, 15);
    chart.pointer_down(x, y);
    let Some(ChartEvent::Click(entry)) = chart.pointer_up() else {
        panic!("expected a click");
    };
    assert_eq!(entry.value, 2515.0);
    assert_eq!((entry.row_label.as_str(), entry.col_label.as_str()), ("r25", "c15"));
}

#[test]
fn leaving_cancels_a_selection() {
    let mut chart = grid(4, 4);
    let (x, y) = cell_center(&chart, 0, 0);
    chart.pointer_down(x, y);
    chart.pointer_move(x + 30.0, y + 30.0);
    chart.pointer_leave();
    assert_eq!(chart.pointer_up(), None);
    render(&mut chart);
    assert!(chart.frame().decorations.selection.is_none());
}

#[test]
fn zooming_mid_drag_clamps_the_selection() {
    let mut chart = grid(100, 100);
    let (x1, y1) = cell_center(&chart, 1, 1);
    let (x2, y2) = cell_center(&chart, 20, 30);
    chart.pointer_down(x1, y1);
    chart.pointer_move(x2, y2);
    assert_eq!((chart.viewport().x_view, chart.viewport().y_view), (32, 22));

    // 22px cells leave room for 29 x 20 cells.
    assert!(chart.zoom(1.0, None));
    let values = selection_values(chart.pointer_up());
    assert_eq!(values.len(), 19 * 28);
    assert_eq!(values.first(), Some(&101.0));
    assert_eq!(values.last(), Some(&1928.0));
}

#[test]
fn shrinking_mid_drag_clamps_the_drawn_box() {
    let mut chart = grid(100, 100);
    let (x1, y1) = cell_center(&chart, 0, 0);
    let (x2, y2) = cell_center(&chart, 21, 31);
    chart.pointer_down(x1, y1);
    chart.pointer_move(x2, y2);
    chart.resize(WIDTH / 2.0, HEIGHT / 2.0);
    render(&mut chart);
    let (w, h) = (chart.viewport().x_view, chart.viewport().y_view);
    let selection = chart.frame().decorations.selection.expect("box is drawn");
    let cs = chart.coords();
    assert!(selection.x + selection.w <= cs.item_offset(Axis::Col, w) + 1e-9);
    assert!(selection.y + selection.h <= cs.item_offset(Axis::Row, h) + 1e-9);
    assert_eq!(selection_values(chart.pointer_up()).len(), w * h);
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn hover_reports_cell_and_emphasizes_labels() {
    let mut chart = grid(3, 3);
    let (x, y) = cell_center(&chart, 1, 2);
    let events = chart.pointer_move(x, y);
    let [ChartEvent::Hover(info)] = events.as_slice() else {
        panic!("expected one hover event, got {events:?}");
    };
    assert_eq!((info.row_index, info.col_index), (1, 2));
    assert_eq!(info.value, 5.0);
    let html = default_tooltip_html(info);
    assert!(html.contains("r1") && html.contains("c2"));

    render(&mut chart);
    let frame = chart.frame();
    assert_eq!(frame.decorations.hover_row, Some(1));
    assert!(find_label(&frame.row_labels, 1).unwrap().emphasized);
    assert!(!find_label(&frame.row_labels, 0).unwrap().emphasized);
    assert!(find_label(&frame.col_labels, 2).unwrap().emphasized);
}

#[test]
fn moving_off_the_grid_ends_hover() {
    let mut chart = grid(3, 3);
    let (x, y) = cell_center(&chart, 0, 0);
    chart.pointer_move(x, y);
    assert_eq!(chart.pointer_move(1.0, 1.0), vec![ChartEvent::HoverEnd]);
    assert!(chart.pointer_move(2.0, 2.0).is_empty());
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn labels_are_hit_tested() {
    let chart = grid(5, 5);
    let (x, y) = label_center(&chart, Axis::Row, 3);
    assert_eq!(chart.label_at(x, y), Some((Axis::Row, 3)));
    let (x, y) = label_center(&chart, Axis::Col, 0);
    assert_eq!(chart.label_at(x, y), Some((Axis::Col, 0)));
    let (x, y) = cell_center(&chart, 0, 0);
    assert_eq!(chart.label_at(x, y), None);
}

#[test]
fn label_click_selects_whole_column() {
    let chart = grid(3, 4);
    assert_eq!(
        selection_values(chart.label_click(Axis::Col, 1)),
        vec![1.0, 5.0, 9.0]
    );
    assert_eq!(chart.label_click(Axis::Row, 99), None);
}

#[test]
fn dragging_a_column_label_reorders_columns() {
    let mut chart = grid(3, 4);
    assert!(chart.drag_start(Axis::Col, 3));
    let x = chart.coords().item_offset(Axis::Col, 0);
    assert!(chart.drag_over(Axis::Col, x, 0.0));
    render(&mut chart);
    let guide = chart.frame().decorations.drag_guide.expect("guide is shown");
    assert_eq!(guide.x1, x);

    assert_eq!(chart.drag_end(Axis::Col).unwrap(), Some((3, 0)));
    assert_eq!(names(&chart, Axis::Col), ["c3", "c0", "c1", "c2"]);
    assert_eq!(chart.model().matrix()[0], vec![3.0, 0.0, 1.0, 2.0]);
    render(&mut chart);
    assert!(chart.frame().decorations.drag_guide.is_none());
}

#[test]
fn dropping_next_to_itself_is_a_no_op() {
    let mut chart = grid(4, 2);
    let before = chart.state();
    chart.drag_start(Axis::Row, 1);
    let y = chart.coords().item_offset(Axis::Row, 2);
    chart.drag_over(Axis::Row, 0.0, y);
    assert_eq!(chart.drag_end(Axis::Row).unwrap(), None);
    assert_eq!(chart.state(), before);
}

#[test]
fn cancelled_drag_leaves_order_alone() {
    let mut chart = grid(4, 2);
    let before = chart.state();
    chart.drag_start(Axis::Row, 0);
    let y = chart.coords().item_offset(Axis::Row, 3);
    chart.drag_over(Axis::Row, 0.0, y);
    chart.drag_cancel(Axis::Row);
    assert_eq!(chart.drag_end(Axis::Row).unwrap(), None);
    assert_eq!(chart.state(), before);
    assert!(!chart.drag_start(Axis::Row, 4));
}

#[test]
fn dropping_past_the_grid_keeps_the_guide_on_screen() {
    let mut chart = grid(100, 2);
    chart.pan(None, Some(40));
    render(&mut chart);
    let visible = chart.viewport().visible_rows();

    assert!(chart.drag_start(Axis::Row, 45));
    chart.drag_over(Axis::Row, 0.0, 10_000.0);
    render(&mut chart);
    let guide = chart.frame().decorations.drag_guide.expect("guide is shown");
    assert_eq!(guide.y1, chart.coords().item_offset(Axis::Row, visible.end));

    chart.drag_over(Axis::Row, 0.0, -10_000.0);
    render(&mut chart);
    let guide = chart.frame().decorations.drag_guide.expect("guide is shown");
    assert_eq!(guide.y1, chart.coords().item_offset(Axis::Row, visible.start));
    assert_eq!(chart.drag_end(Axis::Row).unwrap(), Some((45, visible.start)));
    assert_eq!(chart.model().label(Axis::Row, visible.start).unwrap().name, "r45");
}

#[test]
fn label_press_never_starts_a_selection() {
    let mut chart = grid(5, 5);
    let (x, y) = label_center(&chart, Axis::Row, 2);
    assert!(!chart.pointer_down(x, y));
    let (x, y) = cell_center(&chart, 4, 4);
    chart.pointer_move(x, y);
    assert_eq!(chart.pointer_up(), None);
    render(&mut chart);
    assert!(chart.frame().decorations.selection.is_none());
}

#[test]
fn cell_press_never_starts_a_reorder() {
    let mut chart = grid(5, 5);
    let before = chart.state();
    let (x, y) = cell_center(&chart, 1, 1);
    assert!(chart.pointer_down(x, y));
    assert!(!chart.drag_start(Axis::Row, 1));
    assert_eq!(chart.reordering(), None);
    assert!(!chart.drag_over(Axis::Row, x, y + 60.0));
    assert_eq!(chart.drag_end(Axis::Row).unwrap(), None);
    assert!(matches!(chart.pointer_up(), Some(ChartEvent::Click(_))));
    assert_eq!(chart.state(), before);
}

#[test]
fn reorder_blocks_cell_selection() {
    let mut chart = grid(5, 5);
    assert!(chart.drag_start(Axis::Col, 0));
    assert_eq!(chart.reordering(), Some(Axis::Col));
    assert!(!chart.drag_start(Axis::Row, 0));
    let (x, y) = cell_center(&chart, 2, 2);
    assert!(!chart.pointer_down(x, y));
    assert_eq!(chart.pointer_up(), None);
    chart.drag_cancel(Axis::Col);
    assert!(chart.pointer_down(x, y));
}

// ============================================================================
// Sort and search
// ============================================================================

#[test]
fn sort_reorders_rows_and_move_clears_it() {
    let config = ChartBuilder::new(4, 2)
        .row_meta("Group", |i| ["b", "a", "c", "a"][i])
        .cell_size(20.0, 20.0)
        .build();
    let mut chart = rendered(&config);
    let key = SortKey {
        axis: Axis::Row,
        category: 0,
    };

    assert_eq!(chart.toggle_sort(Axis::Row, 0).unwrap(), SortDirection::Ascending);
    assert_eq!(names(&chart, Axis::Row), ["r1", "r3", "r0", "r2"]);
    assert_eq!(chart.model().value(0, 0), Some(2.0));

    chart.sort(Axis::Row, 0, SortDirection::Descending).unwrap();
    assert_eq!(names(&chart, Axis::Row), ["r2", "r0", "r1", "r3"]);
    assert_eq!(chart.model().sort_model().direction(key), SortDirection::Descending);

    chart.move_item(Axis::Row, 0, 3).unwrap();
    assert_eq!(chart.model().sort_model().active(), None);
    assert!(chart.sort(Axis::Col, 0, SortDirection::Ascending).is_err());
}

#[test]
fn search_highlights_and_cycles_matches() {
    let mut chart = grid(12, 3);
    assert_eq!(chart.search("R1"), 3);
    render(&mut chart);
    let frame = chart.frame();
    assert!(find_label(&frame.row_labels, 1).unwrap().highlight.is_some());
    assert!(find_label(&frame.row_labels, 11).unwrap().highlight.is_some());
    assert!(find_label(&frame.row_labels, 2).unwrap().highlight.is_none());

    assert_eq!(chart.next_match(), Some((Axis::Row, 1)));
    assert_eq!(chart.next_match(), Some((Axis::Row, 10)));
    assert_eq!(chart.next_match(), Some((Axis::Row, 11)));
    assert_eq!(chart.next_match(), Some((Axis::Row, 1)));

    assert_eq!(chart.search(""), 0);
    assert_eq!(chart.next_match(), None);
}

#[test]
fn search_matches_rows_then_columns() {
    let mut chart = grid(3, 3);
    assert_eq!(chart.search("2"), 2);
    assert_eq!(chart.next_match(), Some((Axis::Row, 2)));
    assert_eq!(chart.next_match(), Some((Axis::Col, 2)));
}
