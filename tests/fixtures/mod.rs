//! Test fixtures for building chart configs in memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::ChartBuilder;
//!
//! let config = ChartBuilder::new(4, 3)
//!     .row_meta("Parity", |i| if i % 2 == 0 { "even" } else { "odd" })
//!     .cell_size(10.0, 10.0)
//!     .build();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic,
    clippy::cast_precision_loss
)]

use heatview::{AxisLabel, CellDefaults, ChartConfig, ChartOptions, ColorConfig};

// ============================================================================
// Chart Builder
// ============================================================================

/// Builder for an `m` x `n` chart whose cell `(i, j)` holds `i * n + j`.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    rows: Vec<AxisLabel>,
    cols: Vec<AxisLabel>,
    matrix: Vec<Vec<f64>>,
    row_meta_labels: Vec<String>,
    col_meta_labels: Vec<String>,
    color: ColorConfig,
    options: ChartOptions,
    defaults: CellDefaults,
    newick: Option<String>,
}

impl ChartBuilder {
    pub fn new(m: usize, n: usize) -> Self {
        Self {
            rows: (0..m).map(|i| AxisLabel::new(format!("r{i}"))).collect(),
            cols: (0..n).map(|j| AxisLabel::new(format!("c{j}"))).collect(),
            matrix: (0..m)
                .map(|i| (0..n).map(|j| (i * n + j) as f64).collect())
                .collect(),
            row_meta_labels: Vec::new(),
            col_meta_labels: Vec::new(),
            color: ColorConfig::default(),
            options: ChartOptions::default(),
            defaults: CellDefaults::default(),
            newick: None,
        }
    }

    /// Replace the matrix values (shape must stay the same to be valid).
    pub fn matrix(mut self, matrix: Vec<Vec<f64>>) -> Self {
        self.matrix = matrix;
        self
    }

    /// Add a row metadata column computed from the row index.
    pub fn row_meta<F>(mut self, label: &str, value: F) -> Self
    where
        F: Fn(usize) -> &'static str,
    {
        self.row_meta_labels.push(label.to_string());
        for (i, row) in self.rows.iter_mut().enumerate() {
            row.meta
                .get_or_insert_with(Vec::new)
                .push(Some(value(i).to_string()));
        }
        self
    }

    /// Add a column metadata column computed from the column index.
    pub fn col_meta<F>(mut self, label: &str, value: F) -> Self
    where
        F: Fn(usize) -> &'static str,
    {
        self.col_meta_labels.push(label.to_string());
        for (j, col) in self.cols.iter_mut().enumerate() {
            col.meta
                .get_or_insert_with(Vec::new)
                .push(Some(value(j).to_string()));
        }
        self
    }

    pub fn color(mut self, color: ColorConfig) -> Self {
        self.color = color;
        self
    }

    pub fn bins(self, bins: &[&str], colors: &[&str]) -> Self {
        self.color(ColorConfig::bins(bins.iter().copied(), colors.iter().copied()))
    }

    pub fn options(mut self, options: ChartOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cell_size(mut self, w: f32, h: f32) -> Self {
        self.defaults = CellDefaults {
            cell_width: Some(w),
            cell_height: Some(h),
        };
        self
    }

    pub fn newick(mut self, newick: &str) -> Self {
        self.newick = Some(newick.to_string());
        self
    }

    pub fn build(self) -> ChartConfig {
        let mut config = ChartConfig::new(self.rows, self.cols, self.matrix);
        if !self.row_meta_labels.is_empty() {
            config.row_meta_labels = Some(self.row_meta_labels);
        }
        if !self.col_meta_labels.is_empty() {
            config.col_meta_labels = Some(self.col_meta_labels);
        }
        config.color = self.color;
        config.options = self.options;
        config.defaults = self.defaults;
        config.newick = self.newick;
        config
    }

    /// The config as the JSON a page (or the CLI) would pass in.
    pub fn json(self) -> String {
        serde_json::to_string(&self.build()).expect("config serializes")
    }
}
