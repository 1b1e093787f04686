//! Render engine tests
//!
//! Partial redraws, label layout (collapsed ranges, ellipsizing, font size),
//! themes, and the tree panel request.

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
use heatview::layout::TREE_PANEL_WIDTH;
use heatview::render::{label_font_px, ApproxTextMeasure, TextAnchor};
use heatview::{Axis, AxisLabel, ChartConfig, ChartOptions, EllipsisPos, Theme};
use test_case::test_case;

fn big_grid() -> heatview::Chart {
    rendered(&ChartBuilder::new(200, 200).cell_size(10.0, 10.0).build())
}

// ============================================================================
// Partial redraws
// ============================================================================

#[test]
fn first_render_stages_and_builds_everything() {
    let chart = big_grid();
    let stats = chart.last_stats();
    assert!(stats.staged);
    assert!(stats.row_labels_rebuilt && stats.col_labels_rebuilt);
    assert_eq!(stats.cells, chart.frame().cells.visible_count());
}

#[test]
fn horizontal_pan_rebuilds_only_column_labels() {
    let mut chart = big_grid();
    assert!(chart.pan(Some(3), None));
    assert!(render(&mut chart));
    let stats = chart.last_stats();
    assert!(!stats.staged);
    assert!(stats.col_labels_rebuilt);
    assert!(!stats.row_labels_rebuilt);
}

#[test]
fn vertical_pan_rebuilds_only_row_labels() {
    let mut chart = big_grid();
    chart.pan_by(0, 4);
    render(&mut chart);
    let stats = chart.last_stats();
    assert!(stats.row_labels_rebuilt);
    assert!(!stats.col_labels_rebuilt);
}

#[test]
fn nothing_pending_means_nothing_presented() {
    let mut chart = big_grid();
    let generation = chart.frame().generation;
    assert!(!chart.needs_render());
    assert!(!render(&mut chart));
    assert_eq!(chart.frame().generation, generation);
}

#[test]
fn pool_is_reused_across_scrolls() {
    let mut chart = big_grid();
    let capacity = chart.frame().cells.capacity();
    for step in 1..20 {
        chart.pan(Some(step), Some(step));
        render(&mut chart);
    }
    assert_eq!(chart.frame().cells.capacity(), capacity);
}

// ============================================================================
// Labels
// ============================================================================

#[test]
fn small_cells_collapse_labels_into_a_range() {
    let mut chart = rendered(&ChartBuilder::new(200, 200).cell_size(5.0, 5.0).build());
    chart.pan(None, Some(10));
    render(&mut chart);
    let rows = chart.viewport().visible_rows();
    let labels = &chart.frame().row_labels;
    assert_eq!(labels.len(), 1);
    assert_eq!(labels[0].index, None);
    assert_eq!(labels[0].text, format!("Rows 11\u{2013}{}", rows.end));
    assert!(labels[0].rotated);
    assert_eq!(chart.frame().col_labels[0].text.split(' ').next(), Some("Columns"));
}

#[test]
fn legible_cells_get_one_label_each() {
    let chart = rendered(&ChartBuilder::new(6, 4).cell_size(20.0, 20.0).build());
    let frame = chart.frame();
    assert_eq!(frame.row_labels.len(), 6);
    assert_eq!(frame.col_labels.len(), 4);
    assert!(frame.row_labels.iter().all(|l| l.anchor == TextAnchor::End));
    assert!(frame.col_labels.iter().all(|l| l.rotated));
    assert_eq!(frame.row_labels[2].text, "r2");
}

#[test_case(20.0, 14.0 ; "capped at max font")]
#[test_case(12.0, 9.6 ; "scaled with the cell")]
fn label_font_tracks_cell_size(cell: f64, expected: f64) {
    assert!((label_font_px(cell, 14.0) - expected).abs() < 1e-9);
}

fn long_named(pos: EllipsisPos) -> ChartConfig {
    let mut config = ChartBuilder::new(2, 2)
        .cell_size(20.0, 20.0)
        .options(ChartOptions {
            row_label_ellipsis_pos: pos,
            ..ChartOptions::default()
        })
        .build();
    let long = "abcdefghijklmnopqrstuvwxyz";
    config.rows.as_mut().unwrap()[0] = AxisLabel::new(long);
    config.cols.as_mut().unwrap()[0] = AxisLabel::new(long);
    config
}

// 14px font at 0.6em per character leaves room for 13 characters plus the
// ellipsis in the 120px label band.
#[test_case(EllipsisPos::End, "abcdefghijklm\u{2026}" ; "end")]
#[test_case(EllipsisPos::Start, "\u{2026}nopqrstuvwxyz" ; "start")]
#[test_case(EllipsisPos::Middle, "abcdefg\u{2026}uvwxyz" ; "middle")]
fn long_row_labels_are_ellipsized(pos: EllipsisPos, expected: &str) {
    let chart = rendered(&long_named(pos));
    let label = find_label(&chart.frame().row_labels, 0).unwrap();
    assert_eq!(label.text, expected);
    assert!(label.width <= chart.layout().label_space);
}

#[test]
fn column_labels_always_cut_at_the_end() {
    let chart = rendered(&long_named(EllipsisPos::Start));
    let label = find_label(&chart.frame().col_labels, 0).unwrap();
    assert_eq!(label.text, "abcdefghijklm\u{2026}");
}

#[test]
fn search_highlight_survives_ellipsizing() {
    let mut chart = rendered(&long_named(EllipsisPos::End));
    assert_eq!(chart.search("def"), 2);
    render(&mut chart);
    let label = find_label(&chart.frame().row_labels, 0).unwrap();
    // Characters 3..6 at 8.4px each.
    let (from, to) = label.highlight.expect("match is visible");
    assert!((from - 25.2).abs() < 1e-9);
    assert!((to - 50.4).abs() < 1e-9);

    // A match hidden by the ellipsis marks the ellipsis itself.
    chart.search("xyz");
    render(&mut chart);
    let label = find_label(&chart.frame().row_labels, 0).unwrap();
    let (from, to) = label.highlight.expect("ellipsis is highlighted");
    assert!((from - 13.0 * 8.4).abs() < 1e-9);
    assert!((to - 14.0 * 8.4).abs() < 1e-9);
    assert!(find_label(&chart.frame().row_labels, 1).unwrap().highlight.is_none());
}

#[test]
fn titles_follow_configured_names() {
    let mut config = ChartBuilder::new(3, 3).build();
    config.rows_label = Some("Genes".to_string());
    let chart = rendered(&config);
    let titles: Vec<_> = chart.frame().titles.iter().map(|t| t.text.as_str()).collect();
    assert_eq!(titles, ["Genes", "Columns"]);
}

// ============================================================================
// Theme and tree panel
// ============================================================================

#[test]
fn dark_theme_is_the_default() {
    let chart = rendered(&ChartBuilder::new(2, 2).build());
    assert_eq!(chart.theme(), Theme::Dark);
    assert_eq!(chart.frame().colors.background, "#1E1E1E");
}

#[test]
fn light_theme_changes_chrome_colors() {
    let options = ChartOptions {
        theme: Some("light".to_string()),
        ..ChartOptions::default()
    };
    let chart = rendered(&ChartBuilder::new(2, 2).options(options).build());
    assert_eq!(chart.theme(), Theme::Light);
    let frame = chart.frame();
    assert_eq!(frame.colors.background, "#FFFFFF");
    let svg = heatview::render::frame_to_svg(frame).unwrap();
    assert!(svg.contains(r##"fill="#FFFFFF""##));
    assert!(svg.contains(r##"fill="#202124""##));
}

#[test]
fn newick_reserves_a_tree_panel() {
    let plain = rendered(&ChartBuilder::new(4, 4).build());
    assert!(plain.tree_request().is_none());

    let chart = rendered(&ChartBuilder::new(4, 4).newick("((r0,r1),(r2,r3));").build());
    let request = chart.tree_request().expect("tree requested");
    assert_eq!(request.newick, "((r0,r1),(r2,r3));");
    assert_eq!(request.width, TREE_PANEL_WIDTH);
    let margins = chart.layout().margins;
    assert_eq!(request.height, HEIGHT - margins.top - margins.bottom);
    assert_eq!(margins.left, plain.layout().margins.left + TREE_PANEL_WIDTH);
}

#[test]
fn labels_fit_after_a_remeasure() {
    let mut chart = rendered(&long_named(EllipsisPos::End));
    chart.refresh();
    assert!(chart
        .render(&mut ApproxTextMeasure { em_ratio: 0.3 })
        .unwrap());
    let label = find_label(&chart.frame().row_labels, 0).unwrap();
    assert_eq!(label.text, "abcdefghijklmnopqrstuvwxyz");
    assert_eq!(chart.frame().row_labels.len(), 2);
    assert_eq!(chart.model().label(Axis::Row, 1).unwrap().name, "r1");
}
