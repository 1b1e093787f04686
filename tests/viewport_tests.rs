//! Viewport and scroll tests
//!
//! Initial cell sizing, zoom and lock, pan clamping, resize and scrollbar
//! geometry, all driven through `Chart`.

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
use heatview::layout::{CELL_MAX, CELL_MIN, LARGE_MATRIX_CELL, ZOOM_FACTOR};
use heatview::{Axis, Chart, ChartOptions, DataUpdate};

/// Grid area on the 800x600 test surface with default options:
/// 145px of title, labels and padding on the left/top, 10px scrollbars.
const AVAIL_W: f64 = 645.0;
const AVAIL_H: f64 = 445.0;

#[test]
fn small_matrix_cells_are_capped() {
    let chart = rendered(&ChartBuilder::new(10, 10).build());
    let vp = chart.viewport();
    assert_eq!(vp.cell_w, CELL_MAX);
    assert_eq!(vp.cell_h, AVAIL_H / 10.0);
    assert_eq!((vp.x_view, vp.y_view), (10, 10));
    assert!(chart.last_stats().staged);
}

#[test]
fn cells_fill_available_area() {
    let chart = rendered(&ChartBuilder::new(50, 100).build());
    let vp = chart.viewport();
    assert_eq!(vp.cell_w, AVAIL_W / 100.0);
    assert_eq!(vp.cell_h, AVAIL_H / 50.0);
    assert!(vp.x_view <= 100 && vp.x_view >= 99);
    assert!(vp.y_view <= 50 && vp.y_view >= 49);
}

#[test]
fn huge_matrix_uses_fixed_cell() {
    let chart = rendered(&ChartBuilder::new(600, 500).build());
    let vp = chart.viewport();
    assert_eq!((vp.cell_w, vp.cell_h), (LARGE_MATRIX_CELL, LARGE_MATRIX_CELL));
    // 645 / 5 and 445 / 5, floored.
    assert_eq!((vp.x_view, vp.y_view), (129, 89));
    assert_eq!(chart.frame().cells.visible_count(), 129 * 89);
}

#[test]
fn configured_cell_size_wins() {
    let chart = rendered(&ChartBuilder::new(10, 10).cell_size(12.0, 30.0).build());
    assert_eq!((chart.viewport().cell_w, chart.viewport().cell_h), (12.0, 30.0));
}

#[test]
fn zoom_steps_and_clamps() {
    let mut chart = rendered(&ChartBuilder::new(20, 20).cell_size(10.0, 10.0).build());
    assert!(chart.zoom(1.0, None));
    render(&mut chart);
    assert_eq!(chart.viewport().cell_w, 10.0 + ZOOM_FACTOR);
    assert_eq!(chart.viewport().cell_h, 10.0 + ZOOM_FACTOR);

    assert!(chart.zoom(-1.0, Some(Axis::Col)));
    assert_eq!(chart.viewport().cell_w, 10.0);
    assert_eq!(chart.viewport().cell_h, 12.0);

    chart.zoom(100.0, None);
    assert_eq!(chart.viewport().cell_w, CELL_MAX);
    assert!(!chart.zoom(1.0, None));

    chart.zoom(-100.0, Some(Axis::Row));
    assert_eq!(chart.viewport().cell_h, CELL_MIN);
}

#[test]
fn lock_keeps_cells_square() {
    let mut chart = rendered(&ChartBuilder::new(20, 20).cell_size(10.0, 16.0).build());
    chart.set_locked(true);
    assert!(chart.is_locked());
    assert_eq!(chart.viewport().cell_w, chart.viewport().cell_h);
    assert_eq!(chart.viewport().cell_w, 10.0);

    chart.zoom(1.0, Some(Axis::Col));
    assert_eq!(chart.viewport().cell_w, 12.0);
    assert_eq!(chart.viewport().cell_h, 12.0);
}

#[test]
fn pan_is_clamped_to_the_last_window() {
    let mut chart = rendered(&ChartBuilder::new(300, 300).cell_size(10.0, 10.0).build());
    let max_x = 300 - chart.viewport().x_view;
    let max_y = 300 - chart.viewport().y_view;

    assert!(chart.pan(Some(10_000), Some(10_000)));
    assert_eq!(chart.viewport().x_start, max_x);
    assert_eq!(chart.viewport().y_start, max_y);
    assert!(!chart.pan(Some(10_000), None));

    assert!(chart.pan_by(-5, -1000));
    assert_eq!(chart.viewport().x_start, max_x - 5);
    assert_eq!(chart.viewport().y_start, 0);
}

#[test]
fn visible_window_follows_scroll() {
    let mut chart = rendered(&ChartBuilder::new(300, 300).cell_size(10.0, 10.0).build());
    chart.pan(Some(40), Some(7));
    render(&mut chart);
    let rows = chart.viewport().visible_rows();
    let cols = chart.viewport().visible_cols();
    assert_eq!(rows.start, 7);
    assert_eq!(cols.start, 40);

    let cells: Vec<_> = chart.frame().cells.visible().collect();
    assert_eq!(cells.len(), rows.len() * cols.len());
    assert!(cells.iter().all(|c| rows.contains(&c.row) && cols.contains(&c.col)));
    let (x, y) = cell_center(&chart, 7, 40);
    assert_eq!(chart.cell_at(x, y), Some((7, 40)));
}

#[test]
fn resize_recomputes_view_and_clamps() {
    let mut chart = rendered(&ChartBuilder::new(100, 100).cell_size(10.0, 10.0).build());
    let before = chart.viewport().x_view;
    chart.pan(Some(100), None);
    chart.resize(1600.0, 600.0);
    render(&mut chart);
    let vp = chart.viewport();
    assert!(vp.x_view > before);
    assert_eq!(vp.x_start, 100 - vp.x_view);
    assert_eq!(chart.frame().width, 1600.0);
}

#[test]
fn scrollbars_only_when_axis_overflows() {
    let chart = rendered(&ChartBuilder::new(5, 500).cell_size(10.0, 10.0).build());
    let frame = chart.frame();
    assert!(frame.col_scrollbar.visible);
    assert!(!frame.row_scrollbar.visible);
    assert!(frame.col_scrollbar.thumb.w < frame.col_scrollbar.track.w);
}

#[test]
fn update_restages_the_cell_size() {
    let mut chart = rendered(&ChartBuilder::new(10, 10).build());
    chart.zoom(-5.0, None);
    chart
        .update(DataUpdate {
            matrix: Some(vec![vec![1.0; 10]; 10]),
            ..DataUpdate::default()
        })
        .unwrap();
    render(&mut chart);
    assert!(chart.last_stats().staged);
    assert_eq!(chart.viewport().cell_w, CELL_MAX);
}

#[test]
fn viewport_state_serializes_camel_case() {
    let chart = rendered(&ChartBuilder::new(10, 10).cell_size(20.0, 20.0).build());
    let json = serde_json::to_value(chart.viewport_state()).unwrap();
    assert_eq!(json["xStart"], 0);
    assert_eq!(json["cellW"], 20.0);
    assert_eq!(json["xViewSize"], 10);
    assert_eq!(json["yViewSize"], 10);
}

#[test]
fn margins_shrink_the_grid() {
    let options = ChartOptions {
        use_margins: true,
        ..ChartOptions::default()
    };
    let config = ChartBuilder::new(10, 10).options(options).build();
    let chart = Chart::new(&config, WIDTH, HEIGHT).unwrap();
    let (w, _) = chart.layout().available(WIDTH, HEIGHT);
    assert_eq!(w, AVAIL_W - 40.0);
}
