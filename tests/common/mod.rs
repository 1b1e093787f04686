//! Common test utilities and assertion helpers.
//!
//! Charts here are rendered with `ApproxTextMeasure`, so label geometry is
//! deterministic without a browser.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use heatview::render::{ApproxTextMeasure, Label};
use heatview::{Axis, Chart, ChartConfig};

// Re-export fixtures for convenience
pub use super::fixtures::*;

pub const WIDTH: f64 = 800.0;
pub const HEIGHT: f64 = 600.0;

// ============================================================================
// Chart Helpers
// ============================================================================

/// Build and render a chart on an 800x600 surface.
#[must_use]
pub fn rendered(config: &ChartConfig) -> Chart {
    let mut chart = Chart::new(config, WIDTH, HEIGHT).expect("valid config");
    render(&mut chart);
    chart
}

/// Render pending changes; returns whether the frame changed.
pub fn render(chart: &mut Chart) -> bool {
    chart
        .render(&mut ApproxTextMeasure::default())
        .expect("render succeeds")
}

/// Pixel at the center of data cell `(row, col)`; it must be visible.
#[must_use]
pub fn cell_center(chart: &Chart, row: usize, col: usize) -> (f64, f64) {
    let r = chart
        .coords()
        .cell_rect(row, col)
        .unwrap_or_else(|| panic!("cell ({row}, {col}) is not visible"));
    (r.x + r.w / 2.0, r.y + r.h / 2.0)
}

/// Pixel at the center of a label's hit box.
#[must_use]
pub fn label_center(chart: &Chart, axis: Axis, index: usize) -> (f64, f64) {
    let label = find_label(chart.frame().labels(axis), index)
        .unwrap_or_else(|| panic!("no {} label for {index}", axis.name()));
    (
        label.hit.x + label.hit.w / 2.0,
        label.hit.y + label.hit.h / 2.0,
    )
}

pub fn find_label(labels: &[Label], index: usize) -> Option<&Label> {
    labels.iter().find(|l| l.index == Some(index))
}

/// Current label names along an axis.
#[must_use]
pub fn names(chart: &Chart, axis: Axis) -> Vec<String> {
    chart
        .model()
        .labels(axis)
        .iter()
        .map(|l| l.name.clone())
        .collect()
}

// ============================================================================
// SVG Helpers
// ============================================================================

/// Occurrences of `needle` in `haystack`.
#[must_use]
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// The body of `<g class="{class}">…</g>` in an exported document.
#[must_use]
pub fn svg_group<'a>(svg: &'a str, class: &str) -> &'a str {
    let open = format!(r#"<g class="{class}">"#);
    let start = svg
        .find(&open)
        .unwrap_or_else(|| panic!("missing group {class}"))
        + open.len();
    let end = svg[start..].find("</g>").expect("group is closed") + start;
    &svg[start..end]
}
