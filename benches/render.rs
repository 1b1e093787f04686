//! Benchmarks for color resolution and windowed redraws.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.
#![allow(
    clippy::expect_used,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use heatview::color::resolve;
use heatview::render::ApproxTextMeasure;
use heatview::{AxisLabel, Chart, ChartConfig, ColorConfig};

fn matrix(rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| ((r * 31 + c * 17) % 200) as f64 - 100.0)
                .collect()
        })
        .collect()
}

fn config(rows: usize, cols: usize) -> ChartConfig {
    let row_labels = (0..rows)
        .map(|r| AxisLabel::new(format!("row {r}")).with_meta([Some(if r % 2 == 0 { "a" } else { "b" })]))
        .collect();
    let col_labels = (0..cols).map(|c| AxisLabel::new(format!("col {c}"))).collect();
    let mut cfg = ChartConfig::new(row_labels, col_labels, matrix(rows, cols));
    cfg.row_meta_labels = Some(vec!["group".to_string()]);
    cfg
}

/// Resolving colors touches every value once.
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    let bins = ColorConfig::bins(
        ["<-50", "<0", "=0", "<=50", ">50"],
        ["#2166ac", "#92c5de", "#f7f7f7", "#f4a582", "#b2182b"],
    );
    for size in [100usize, 1000] {
        let m = matrix(size, size);
        group.throughput(Throughput::Elements((size * size) as u64));
        group.bench_with_input(BenchmarkId::new("gradient", size), &m, |b, m| {
            b.iter(|| resolve(black_box(m), &ColorConfig::default()).expect("resolve"))
        });
        group.bench_with_input(BenchmarkId::new("bins", size), &m, |b, m| {
            b.iter(|| resolve(black_box(m), &bins).expect("resolve"))
        });
    }
    group.finish();
}

/// A full redraw only draws the visible window, whatever the matrix size.
fn bench_full_redraw(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_redraw");
    for size in [100usize, 2000] {
        let cfg = config(size, size);
        let mut chart = Chart::new(&cfg, 1200.0, 800.0).expect("chart");
        let mut measure = ApproxTextMeasure::default();
        group.bench_function(BenchmarkId::from_parameter(size), |b| {
            b.iter(|| {
                chart.refresh();
                chart.render(black_box(&mut measure)).expect("render")
            })
        });
    }
    group.finish();
}

/// Scrolling one axis rebuilds cells and that axis' labels only.
fn bench_scroll(c: &mut Criterion) {
    let cfg = config(5000, 200);
    let mut chart = Chart::new(&cfg, 1200.0, 800.0).expect("chart");
    let mut measure = ApproxTextMeasure::default();
    chart.render(&mut measure).expect("render");
    let mut down = true;

    c.bench_function("scroll_rows_5000x200", |b| {
        b.iter(|| {
            let step = if down { 1 } else { -1 };
            if !chart.pan_by(0, step) {
                down = !down;
            }
            chart.render(black_box(&mut measure)).expect("render")
        })
    });
}

fn bench_svg_export(c: &mut Criterion) {
    let cfg = config(200, 200);
    let mut chart = Chart::new(&cfg, 1200.0, 800.0).expect("chart");
    let mut measure = ApproxTextMeasure::default();
    chart.render(&mut measure).expect("render");

    c.bench_function("export_visible_svg", |b| {
        b.iter(|| chart.export_svg(false, black_box(&mut measure)).expect("export"))
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_full_redraw,
    bench_scroll,
    bench_svg_export
);
criterion_main!(benches);
