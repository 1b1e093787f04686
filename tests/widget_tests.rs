//! Widget tests
//!
//! Natively the widget presents into an SVG backend, which is enough to check
//! the render-once contract and the JS-facing operations. In a browser
//! (`wasm-pack test --headless`) the exported free functions are exercised.

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

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use heatview::render::SvgExportOptions;
    use heatview::sort::SortDirection;
    use heatview::{Axis, AxisLabel, ColorConfig, DataUpdate, HeatView};

    fn view(builder: ChartBuilder) -> HeatView {
        let mut view = HeatView::new_test(&builder.json(), WIDTH, HEIGHT).expect("valid config");
        assert!(view.render().unwrap());
        view
    }

    #[test]
    fn batches_changes_into_one_present() {
        let mut view = view(ChartBuilder::new(50, 50).cell_size(10.0, 10.0));
        assert_eq!(view.presents(), 1);

        let chart = view.chart_mut();
        chart.pan_by(1, 0);
        chart.pan_by(0, 1);
        chart.zoom(1.0, None);
        assert!(view.render().unwrap());
        assert!(!view.render().unwrap());
        assert_eq!(view.presents(), 2);
    }

    #[test]
    fn presented_svg_tracks_the_frame() {
        let view = view(ChartBuilder::new(3, 3).cell_size(20.0, 20.0));
        let svg = view.last_svg().unwrap();
        assert_eq!(count(svg_group(svg, "cells"), "<rect"), 9);
    }

    #[test]
    fn update_then_get_state() {
        let mut view = view(ChartBuilder::new(2, 2));
        view.update(DataUpdate {
            cols: Some(vec![AxisLabel::new("x"), AxisLabel::new("y")]),
            ..DataUpdate::default()
        })
        .unwrap();
        assert!(view.render().unwrap());
        let state = view.get_state();
        assert_eq!(state.cols[1].name, "y");
        assert_eq!(state.matrix, vec![vec![0.0, 1.0], vec![2.0, 3.0]]);
    }

    #[test]
    fn flip_is_reflected_in_state() {
        let mut view = view(ChartBuilder::new(2, 4));
        view.flip_axis();
        view.render().unwrap();
        assert_eq!(view.get_state().rows.len(), 4);
        assert_eq!(view.chart().viewport().shape(), (4, 2));
    }

    #[test]
    fn set_color_errors_keep_the_old_colors() {
        let mut view = view(ChartBuilder::new(2, 2));
        let presents = view.presents();
        assert!(view.set_color(ColorConfig::bins(["<0"], ["red"])).is_err());
        assert!(!view.render().unwrap());
        assert_eq!(view.presents(), presents);

        view.set_color(ColorConfig::bins([">=0"], ["red"])).unwrap();
        assert!(view.render().unwrap());
        assert!(view.last_svg().unwrap().contains(r##"fill="#FF0000""##));
    }

    #[test]
    fn sort_accepts_js_strings() {
        let mut view = view(
            ChartBuilder::new(3, 2).col_meta("Batch", |j| if j == 0 { "z" } else { "a" }),
        );
        view.sort("cols", 0, "asc").unwrap();
        assert_eq!(names(view.chart(), Axis::Col), ["c1", "c0"]);
        assert_eq!(
            view.chart().model().sort_model().active().map(|(_, d)| d),
            Some(SortDirection::Ascending)
        );
        assert!(view.sort("diagonal", 0, "asc").is_err());
        assert!(view.sort("rows", 0, "asc").is_err());
    }

    #[test]
    fn download_defaults_to_visible_window() {
        let mut view = view(ChartBuilder::new(200, 200).cell_size(10.0, 10.0));
        let (name, url) = view.download_svg(&SvgExportOptions::default()).unwrap();
        assert_eq!(name, "heatmap.svg");
        let (_, full_url) = view
            .download_svg(&SvgExportOptions {
                file_name: None,
                full: true,
            })
            .unwrap();
        assert!(full_url.len() > url.len());
    }

    #[test]
    fn validate_config_normalizes_state() {
        let json = heatview::validate_config(&ChartBuilder::new(1, 2).json()).unwrap();
        let state: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(state["rows"][0]["name"], "r0");
        assert_eq!(state["matrix"], serde_json::json!([[0.0, 1.0]]));
    }

    #[test]
    fn version_matches_the_package() {
        assert_eq!(heatview::version(), env!("CARGO_PKG_VERSION"));
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn validate_config_accepts_a_chart() {
        let json = heatview::validate_config(&ChartBuilder::new(2, 3).json()).unwrap();
        assert!(json.contains("\"matrix\""));
    }

    #[wasm_bindgen_test]
    fn validate_config_rejects_ragged_matrix() {
        let json = ChartBuilder::new(2, 2)
            .matrix(vec![vec![1.0, 2.0], vec![3.0]])
            .json();
        let err = heatview::validate_config(&json).unwrap_err();
        assert!(err.as_string().unwrap().contains("not rectangular"));
    }

    #[wasm_bindgen_test]
    fn version_is_exported() {
        assert!(!heatview::version().is_empty());
    }
}
