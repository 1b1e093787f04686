//! SVG export tests
//!
//! Visible-window and full-matrix exports, document structure, and the data
//! URL used for downloads.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;
mod fixtures;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use common::*;
use heatview::render::{palette, svg_data_url, ApproxTextMeasure, SvgExportOptions};
use heatview::Chart;

fn export(chart: &Chart, full: bool) -> String {
    chart
        .export_svg(full, &mut ApproxTextMeasure::default())
        .expect("export succeeds")
}

#[test]
fn visible_export_matches_the_frame() {
    let mut chart = rendered(&ChartBuilder::new(100, 100).cell_size(10.0, 10.0).build());
    chart.pan(Some(20), Some(30));
    render(&mut chart);
    let svg = export(&chart, false);

    assert!(svg.starts_with("<?xml"));
    assert!(svg.contains(r#"xmlns="http://www.w3.org/2000/svg""#));
    assert!(svg.contains(r#"width="800" height="600""#));
    let cells = svg_group(&svg, "cells");
    assert_eq!(count(cells, "<rect"), chart.frame().cells.visible_count());
}

#[test]
fn full_export_draws_every_cell() {
    let chart = rendered(&ChartBuilder::new(100, 100).cell_size(10.0, 10.0).build());
    assert!(chart.frame().cells.visible_count() < 100 * 100);
    let svg = export(&chart, true);
    assert_eq!(count(svg_group(&svg, "cells"), "<rect"), 100 * 100);
    // The on-screen frame is untouched.
    assert!(chart.frame().cells.visible_count() < 100 * 100);
}

#[test]
fn full_export_sizes_the_document_to_the_matrix() {
    let chart = rendered(&ChartBuilder::new(40, 60).cell_size(10.0, 10.0).build());
    let margins = chart.layout().margins;
    let width = margins.left + margins.right + 600.0 + 0.5;
    let svg = export(&chart, true);
    assert!(svg.contains(&format!(r#"width="{width}""#)), "{}", &svg[..200]);
}

#[test]
fn cells_use_resolved_colors() {
    let config = ChartBuilder::new(1, 3)
        .matrix(vec![vec![-1.0, 0.0, 1.0]])
        .bins(&["<0", "=0", ">0"], &["#0000ff", "white", "rgb(255, 0, 0)"])
        .cell_size(20.0, 20.0)
        .build();
    let svg = export(&rendered(&config), false);
    let cells = svg_group(&svg, "cells");
    for fill in ["#0000FF", "#FFFFFF", "#FF0000"] {
        assert_eq!(count(cells, &format!(r##"fill="{fill}""##)), 1, "{fill}");
    }
}

#[test]
fn labels_and_strips_are_exported() {
    let config = ChartBuilder::new(3, 2)
        .row_meta("Kind", |i| if i == 0 { "a" } else { "b" })
        .cell_size(20.0, 20.0)
        .build();
    let chart = rendered(&config);
    let svg = export(&chart, false);

    assert_eq!(count(svg_group(&svg, "strips"), "<rect"), 3);
    let labels = svg_group(&svg, "labels");
    // Three row labels, two column labels, two titles.
    assert_eq!(count(labels, "<text"), 7);
    assert!(labels.contains(">r2</text>"));
    assert!(labels.contains(">Rows</text>"));
    assert!(labels.contains("rotate(-90"));
}

#[test]
fn label_text_is_escaped() {
    let mut config = ChartBuilder::new(2, 2).cell_size(20.0, 20.0).build();
    config.rows.as_mut().unwrap()[0].name = "a<b & c".to_string();
    let svg = export(&rendered(&config), false);
    assert!(svg.contains("a&lt;b &amp; c"));
}

#[test]
fn gesture_decorations_are_not_exported() {
    let mut chart = rendered(&ChartBuilder::new(5, 5).cell_size(20.0, 20.0).build());
    let (x, y) = cell_center(&chart, 1, 1);
    chart.pointer_down(x, y);
    chart.pointer_move(x + 40.0, y + 40.0);
    render(&mut chart);
    assert!(chart.frame().decorations.selection.is_some());

    let svg = export(&chart, false);
    assert!(!svg.contains(palette::SELECTION));
    assert!(!svg.contains(chart.frame().colors.scrollbar_thumb));
}

#[test]
fn data_url_round_trips_the_document() {
    let svg = export(&rendered(&ChartBuilder::new(2, 2).build()), false);
    let url = svg_data_url(&svg);
    let encoded = url
        .strip_prefix("data:image/svg+xml;base64,")
        .expect("svg data url");
    assert_eq!(BASE64.decode(encoded).unwrap(), svg.as_bytes());
}

#[test]
fn export_options_parse_camel_case() {
    let options: SvgExportOptions =
        serde_json::from_str(r#"{"fileName": "genes", "full": true}"#).unwrap();
    assert!(options.full);
    assert_eq!(options.file_name(), "genes.svg");
    assert_eq!(SvgExportOptions::default().file_name(), "heatmap.svg");

    let options = SvgExportOptions {
        file_name: Some("Plot.SVG".to_string()),
        full: false,
    };
    assert_eq!(options.file_name(), "Plot.SVG");
}
