//! Data model tests
//!
//! Config parsing and validation, update/flip/move semantics and the
//! `getState()` snapshot.

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
use heatview::{
    Axis, AxisLabel, Chart, ChartConfig, ColorConfig, DataUpdate, EllipsisPos, HeatviewError,
    Theme,
};

fn build_err(config: &ChartConfig) -> HeatviewError {
    Chart::new(config, WIDTH, HEIGHT)
        .err()
        .expect("config should be rejected")
}

// ============================================================================
// Parsing and validation
// ============================================================================

#[test]
fn parses_camel_case_config() {
    let json = r##"{
        "rows": [{"name": "TP53", "id": 7, "meta": ["tumor", null]}],
        "cols": [{"name": "s1"}, {"name": "s2"}],
        "matrix": [[0.5, -1]],
        "rowsLabel": "Genes",
        "rowMetaLabels": ["Tissue", "Stage"],
        "hideColMeta": true,
        "color": {"bins": ["<0", ">=0"], "colors": ["#00f", "#f00"]},
        "options": {"theme": "light", "maxFontSize": 12, "rowLabelEllipsisPos": "middle"},
        "defaults": {"cellWidth": 8}
    }"##;
    let config = ChartConfig::from_json(json).unwrap();
    assert_eq!(config.rows_label.as_deref(), Some("Genes"));
    assert!(config.hide_col_meta);
    assert_eq!(config.options.theme(), Theme::Light);
    assert_eq!(config.options.row_label_ellipsis_pos, EllipsisPos::Middle);
    assert_eq!(config.defaults.cell_width, Some(8.0));
    assert_eq!(config.defaults.cell_height, None);
    assert!(matches!(config.color, ColorConfig::Bins(_)));

    let rows = config.rows.as_ref().unwrap();
    assert_eq!(rows[0].id, Some(serde_json::json!(7)));
    assert_eq!(rows[0].meta_value(0), Some("tumor"));
    assert_eq!(rows[0].meta_value(1), None);

    let chart = Chart::new(&config, WIDTH, HEIGHT).unwrap();
    assert_eq!(chart.model().title(Axis::Row), "Genes");
    assert_eq!(chart.model().title(Axis::Col), "Columns");
    assert!(chart.model().shows_categories(Axis::Row));
}

#[test]
fn missing_fields_are_config_errors() {
    let config = ChartConfig::from_json(r#"{"rows": [], "cols": []}"#).unwrap();
    let err = build_err(&config);
    assert!(matches!(err, HeatviewError::Config(ref m) if m.contains("matrix")), "{err}");
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        ChartConfig::from_json("{\"rows\": 5}"),
        Err(HeatviewError::Json(_))
    ));
}

#[test]
fn empty_matrix_is_rejected() {
    let config = ChartConfig::new(Vec::new(), Vec::new(), Vec::new());
    assert!(matches!(build_err(&config), HeatviewError::EmptyMatrix(_)));

    let config = ChartConfig::new(vec![AxisLabel::new("a")], Vec::new(), vec![Vec::new()]);
    assert!(matches!(build_err(&config), HeatviewError::EmptyMatrix(_)));
}

#[test]
fn ragged_matrix_names_the_row() {
    let config = ChartBuilder::new(3, 2)
        .matrix(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0]])
        .build();
    let err = build_err(&config);
    assert!(matches!(
        err,
        HeatviewError::NonRectangular {
            row: 2,
            expected: 2,
            found: 1
        }
    ));
}

#[test]
fn column_labels_must_match() {
    let mut config = ChartBuilder::new(2, 3).build();
    config.cols.as_mut().unwrap().pop();
    let err = build_err(&config);
    assert!(matches!(
        err,
        HeatviewError::LabelMismatch {
            axis: "column",
            labels: 2,
            dimension: 3
        }
    ));
    assert!(err.to_string().contains("column labels (2)"));
}

#[test]
fn undeclared_metadata_warns_and_disables_strips() {
    let mut config = ChartBuilder::new(3, 2)
        .row_meta("Kind", |_| "x")
        .build();
    config.row_meta_labels = None;
    let chart = rendered(&config);
    assert_eq!(chart.warnings().len(), 1);
    assert!(!chart.model().shows_categories(Axis::Row));
    assert_eq!(chart.frame().row_strips.visible_count(), 0);
}

#[test]
fn hidden_metadata_keeps_hover_categories() {
    let mut config = ChartBuilder::new(2, 2)
        .col_meta("Batch", |j| if j == 0 { "A" } else { "B" })
        .cell_size(20.0, 20.0)
        .build();
    config.hide_col_meta = true;
    let chart = rendered(&config);
    assert_eq!(chart.frame().col_strips.visible_count(), 0);
    assert_eq!(chart.layout().col_strips, 0);
    let info = chart.model().hover_info(0, 1).unwrap();
    assert_eq!(info.col_categories[0].label, "Batch");
    assert_eq!(info.col_categories[0].value.as_deref(), Some("B"));
}

// ============================================================================
// Mutations
// ============================================================================

#[test]
fn update_replaces_labels_and_matrix() {
    let mut chart = rendered(&ChartBuilder::new(2, 2).build());
    chart
        .update(DataUpdate {
            rows: Some(vec![AxisLabel::new("x"), AxisLabel::new("y"), AxisLabel::new("z")]),
            matrix: Some(vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]]),
            ..DataUpdate::default()
        })
        .unwrap();
    render(&mut chart);
    assert_eq!(names(&chart, Axis::Row), ["x", "y", "z"]);
    assert_eq!(chart.viewport().shape(), (3, 2));
    assert_eq!(chart.frame().cells.visible_count(), 6);
}

#[test]
fn invalid_update_changes_nothing() {
    let mut chart = rendered(&ChartBuilder::new(2, 2).build());
    let before = chart.state();
    let generation = chart.frame().generation;
    let err = chart.update(DataUpdate {
        matrix: Some(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]),
        ..DataUpdate::default()
    });
    assert!(matches!(err, Err(HeatviewError::LabelMismatch { .. })));
    assert_eq!(chart.state(), before);
    assert!(!render(&mut chart));
    assert_eq!(chart.frame().generation, generation);
}

#[test]
fn flip_swaps_axes_and_titles() {
    let config = ChartBuilder::new(2, 3)
        .row_meta("Parity", |i| if i % 2 == 0 { "even" } else { "odd" })
        .build();
    let mut chart = rendered(&config);
    chart.flip_axis();
    render(&mut chart);

    let state = chart.state();
    assert_eq!(state.rows.len(), 3);
    assert_eq!(state.cols.len(), 2);
    assert_eq!(state.matrix[2], vec![2.0, 5.0]);
    assert_eq!(chart.model().title(Axis::Row), "Columns");
    assert_eq!(chart.model().meta_labels(Axis::Col), ["Parity".to_string()]);
    assert_eq!(chart.layout().col_strips, 1);
    assert_eq!(chart.layout().row_strips, 0);

    chart.flip_axis();
    assert_eq!(chart.state().matrix, vec![vec![0.0, 1.0, 2.0], vec![3.0, 4.0, 5.0]]);
}

#[test]
fn move_item_round_trips() {
    let mut chart = rendered(&ChartBuilder::new(5, 2).build());
    let before = chart.state();
    chart.move_item(Axis::Row, 4, 1).unwrap();
    assert_eq!(names(&chart, Axis::Row), ["r0", "r4", "r1", "r2", "r3"]);
    chart.move_item(Axis::Row, 1, 4).unwrap();
    assert_eq!(chart.state(), before);
    assert!(matches!(
        chart.move_item(Axis::Col, 0, 2),
        Err(HeatviewError::IndexOutOfRange { index: 2, len: 2, .. })
    ));
}

#[test]
fn state_serializes_as_plain_json() {
    let mut config = ChartBuilder::new(1, 2).build();
    config.rows.as_mut().unwrap()[0] = AxisLabel::new("only").with_id(serde_json::json!("g-1"));
    let chart = Chart::new(&config, WIDTH, HEIGHT).unwrap();
    let json = serde_json::to_value(chart.state()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "rows": [{"name": "only", "id": "g-1"}],
            "cols": [{"name": "c0"}, {"name": "c1"}],
            "matrix": [[0.0, 1.0]]
        })
    );
}
