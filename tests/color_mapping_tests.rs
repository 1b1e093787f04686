//! Color resolution tests
//!
//! Gradient and bin mapping through the public API, category colors, and
//! how mapping failures surface on construction and recolor.

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
use heatview::color::{category_color, resolve, ColorScale, CATEGORY_PALETTE_SIZE};
use heatview::render::{palette, Legend, Rgb};
use heatview::{Axis, Chart, ColorConfig, ColorMappingError, HeatviewError};
use test_case::test_case;

fn traffic_light() -> ColorConfig {
    ColorConfig::bins(["<0", "=0", ">0"], ["#0000FF", "#FFFFFF", "#FF0000"])
}

#[test]
fn gradient_runs_from_white_to_end_color() {
    let m = vec![vec![0.0, 5.0, 10.0]];
    let colors = resolve(&m, &ColorConfig::default()).unwrap();
    assert_eq!(colors[0][0], palette::GRADIENT_START);
    assert_eq!(colors[0][2], palette::GRADIENT_END);
    let mid = colors[0][1];
    assert!(mid != palette::GRADIENT_START && mid != palette::GRADIENT_END);
}

#[test]
fn gradient_scales_by_absolute_maximum() {
    // |-20| is the largest magnitude, so 10 sits halfway.
    let m = vec![vec![-20.0, 10.0]];
    let colors = resolve(&m, &ColorConfig::default()).unwrap();
    let half = palette::GRADIENT_START.lerp(palette::GRADIENT_END, 0.5);
    assert_eq!(colors[0][1], half);
    assert_eq!(colors[0][0], palette::GRADIENT_START);
}

#[test]
fn all_zero_matrix_is_white() {
    let m = vec![vec![0.0, 0.0], vec![0.0, 0.0]];
    let colors = resolve(&m, &ColorConfig::default()).unwrap();
    assert!(colors.iter().flatten().all(|c| *c == palette::GRADIENT_START));
}

#[test_case(-3.0, "#0000FF" ; "negative")]
#[test_case(0.0, "#FFFFFF" ; "zero")]
#[test_case(7.5, "#FF0000" ; "positive")]
fn bins_pick_matching_color(value: f64, expected: &str) {
    let colors = resolve(&[vec![value]], &traffic_light()).unwrap();
    assert_eq!(colors[0][0].to_hex(), expected);
}

#[test]
fn first_matching_bin_wins() {
    let config = ColorConfig::bins(["<10", "<5"], ["red", "blue"]);
    let colors = resolve(&[vec![1.0]], &config).unwrap();
    assert_eq!(colors[0][0], Rgb::new(255, 0, 0));
}

#[test]
fn unmapped_value_names_value_position_and_bins() {
    let config = ColorConfig::bins(["<0", ">0"], ["blue", "red"]);
    let m = vec![vec![1.0, -1.0], vec![2.0, 0.0]];
    let err = resolve(&m, &config).unwrap_err();
    assert_eq!(
        err,
        ColorMappingError::UnmappedValue {
            value: 0.0,
            row: 1,
            col: 1,
            bins: vec!["<0".to_string(), ">0".to_string()],
        }
    );
    let msg = err.to_string();
    assert!(msg.contains("row 1"), "{msg}");
    assert!(msg.contains("column 1"), "{msg}");
}

#[test]
fn mismatched_bin_and_color_counts_fail() {
    let config = ColorConfig::bins(["<0", ">=0"], ["blue"]);
    assert_eq!(
        resolve(&[vec![1.0]], &config),
        Err(ColorMappingError::CountMismatch { bins: 2, colors: 1 })
    );
}

#[test]
fn unparseable_color_fails() {
    let config = ColorConfig::bins([">=0"], ["not-a-color"]);
    assert_eq!(
        ColorScale::from_config(&config, 1.0),
        Err(ColorMappingError::InvalidColor("not-a-color".to_string()))
    );
}

#[test]
fn constructor_rejects_unmapped_values() {
    let config = ChartBuilder::new(2, 2).bins(&["<2"], &["red"]).build();
    let err = Chart::new(&config, WIDTH, HEIGHT).err().expect("construction fails");
    assert!(matches!(
        err,
        HeatviewError::ColorMapping(ColorMappingError::UnmappedValue { value, .. }) if value == 2.0
    ));
}

#[test]
fn frame_cells_carry_resolved_colors() {
    let config = ChartBuilder::new(2, 2)
        .matrix(vec![vec![-1.0, 0.0], vec![0.0, 1.0]])
        .color(traffic_light())
        .cell_size(20.0, 20.0)
        .build();
    let chart = rendered(&config);
    let cells: Vec<_> = chart.frame().cells.visible().collect();
    assert_eq!(cells.len(), 4);
    for cell in cells {
        assert_eq!(Some(cell.color), chart.model().color_at(cell.row, cell.col));
    }
    assert_eq!(chart.model().color_at(0, 0).unwrap().to_hex(), "#0000FF");
}

#[test]
fn recolor_swaps_legend_and_cells() {
    let mut chart = rendered(&ChartBuilder::new(2, 2).build());
    assert!(matches!(chart.legend(), Legend::Gradient { .. }));

    chart
        .set_color(ColorConfig::bins(["<2", ">=2"], ["green", "purple"]))
        .unwrap();
    assert!(render(&mut chart));
    let Legend::Bins(items) = chart.legend() else {
        panic!("expected bins legend");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(chart.model().color_at(1, 1), Some(Rgb::new(128, 0, 128)));
}

#[test]
fn failed_recolor_leaves_frame_untouched() {
    let mut chart = rendered(&ChartBuilder::new(3, 3).build());
    let generation = chart.frame().generation;
    let legend = chart.legend().clone();

    let err = chart.set_color(ColorConfig::bins(["<1"], ["red"]));
    assert!(err.is_err());
    assert!(!render(&mut chart));
    assert_eq!(chart.frame().generation, generation);
    assert_eq!(chart.legend(), &legend);
    assert_eq!(chart.model().color_config(), &ColorConfig::default());
}

#[test]
fn category_colors_are_deterministic() {
    let a = category_color(Some("tumor"));
    assert_eq!(a, category_color(Some("tumor")));
    assert!(palette::CATEGORY.contains(&a));
    assert_eq!(category_color(None), palette::CATEGORY_MISSING);
    assert_eq!(CATEGORY_PALETTE_SIZE, 20);
}

#[test]
fn equal_categories_share_strip_colors() {
    let config = ChartBuilder::new(4, 2)
        .row_meta("Parity", |i| if i % 2 == 0 { "even" } else { "odd" })
        .build();
    let chart = rendered(&config);
    let model = chart.model();
    assert_eq!(
        model.category_colors(Axis::Row, 0),
        model.category_colors(Axis::Row, 2)
    );
    assert_eq!(
        model.category_colors(Axis::Row, 0)[0],
        category_color(Some("even"))
    );
    assert!(chart.frame().row_strips.visible_count() > 0);
}
