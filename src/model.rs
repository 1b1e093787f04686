//! The data model: labels, matrix, and everything derived from them.
//!
//! Every mutation validates first and only then swaps state in, so a failed
//! update or recolor leaves the model exactly as it was.

use std::ops::RangeInclusive;

use crate::color::{colorize_labels, resolve, ResolvedColorMatrix};
use crate::error::{HeatviewError, Result};
use crate::render::colors::Rgb;
use crate::sort::{apply_permutation, sort_permutation, SortDirection, SortKey, SortModel};
use crate::types::{
    matrix_stats, transpose, Axis, AxisLabel, CategoryField, CellEntry, ChartConfig, ChartState,
    ColorConfig, DataUpdate, HoverInfo, Matrix, MatrixStats, DEFAULT_COLS_LABEL,
    DEFAULT_ROWS_LABEL,
};

/// Per-axis label state.
#[derive(Debug, Clone, PartialEq)]
struct AxisData {
    labels: Vec<AxisLabel>,
    title: String,
    /// Metadata labels as configured.
    declared: Option<Vec<String>>,
    /// Usable metadata labels. Empty when missing or misaligned.
    meta_labels: Vec<String>,
    hide_meta: bool,
    /// `categories[i][k]`: color of item `i`'s k-th category.
    categories: Vec<Vec<Rgb>>,
}

impl AxisData {
    fn new(
        axis: Axis,
        labels: Vec<AxisLabel>,
        title: String,
        declared: Option<Vec<String>>,
        hide_meta: bool,
        warnings: &mut Vec<String>,
    ) -> Self {
        let meta_labels = check_meta(axis, &labels, declared.as_deref(), warnings);
        let categories = colorize_labels(&labels, meta_labels.len());
        Self {
            labels,
            title,
            declared,
            meta_labels,
            hide_meta,
            categories,
        }
    }

    fn recolor_categories(&mut self) {
        self.categories = colorize_labels(&self.labels, self.meta_labels.len());
    }

    fn categories_of(&self, index: usize) -> Vec<CategoryField> {
        let Some(label) = self.labels.get(index) else {
            return Vec::new();
        };
        self.meta_labels
            .iter()
            .enumerate()
            .map(|(k, name)| CategoryField {
                label: name.clone(),
                value: label.meta_value(k).map(str::to_string),
            })
            .collect()
    }
}

/// Validate metadata alignment for one axis.
///
/// Returns the usable metadata labels; on any mismatch a warning is recorded
/// and the category features of that axis are turned off.
fn check_meta(
    axis: Axis,
    labels: &[AxisLabel],
    declared: Option<&[String]>,
    warnings: &mut Vec<String>,
) -> Vec<String> {
    match declared {
        None | Some([]) => {
            if labels.iter().any(|l| l.meta_len() > 0) {
                let msg = format!(
                    "{} labels carry metadata but no {} meta labels were given; categories disabled",
                    axis.name(),
                    axis.name()
                );
                tracing::warn!(axis = axis.name(), "{msg}");
                warnings.push(msg);
            }
            Vec::new()
        }
        Some(names) => {
            if let Some((i, label)) = labels
                .iter()
                .enumerate()
                .find(|(_, l)| l.meta_len() != names.len())
            {
                let msg = format!(
                    "{} {i} ({:?}) has {} metadata values, expected {}; categories disabled",
                    axis.name(),
                    label.name,
                    label.meta_len(),
                    names.len()
                );
                tracing::warn!(axis = axis.name(), index = i, "{msg}");
                warnings.push(msg);
                Vec::new()
            } else {
                names.to_vec()
            }
        }
    }
}

/// Labels, matrix, and derived colors behind one chart.
#[derive(Debug, Clone)]
pub struct DataModel {
    rows: AxisData,
    cols: AxisData,
    matrix: Matrix,
    color: ColorConfig,
    colors: ResolvedColorMatrix,
    stats: MatrixStats,
    sort: SortModel,
    warnings: Vec<String>,
}

impl DataModel {
    /// Validate a constructor config and derive colors.
    pub fn new(config: &ChartConfig) -> Result<Self> {
        let (rows, cols, matrix) = config.required_parts()?;
        let stats = validate_shape(rows, cols, matrix)?;
        let colors = resolve(matrix, &config.color)?;

        let mut warnings = Vec::new();
        let rows = AxisData::new(
            Axis::Row,
            rows.to_vec(),
            config
                .rows_label
                .clone()
                .unwrap_or_else(|| DEFAULT_ROWS_LABEL.to_string()),
            config.row_meta_labels.clone(),
            config.hide_row_meta,
            &mut warnings,
        );
        let cols = AxisData::new(
            Axis::Col,
            cols.to_vec(),
            config
                .cols_label
                .clone()
                .unwrap_or_else(|| DEFAULT_COLS_LABEL.to_string()),
            config.col_meta_labels.clone(),
            config.hide_col_meta,
            &mut warnings,
        );

        tracing::debug!(rows = stats.rows, cols = stats.cols, "data model built");
        Ok(Self {
            rows,
            cols,
            matrix: matrix.clone(),
            color: config.color.clone(),
            colors,
            stats,
            sort: SortModel::new(),
            warnings,
        })
    }

    fn axis(&self, axis: Axis) -> &AxisData {
        match axis {
            Axis::Row => &self.rows,
            Axis::Col => &self.cols,
        }
    }

    fn axis_mut(&mut self, axis: Axis) -> &mut AxisData {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Col => &mut self.cols,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.cols.labels.len()
    }

    /// Item count along `axis`.
    pub fn len(&self, axis: Axis) -> usize {
        self.axis(axis).labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn labels(&self, axis: Axis) -> &[AxisLabel] {
        &self.axis(axis).labels
    }

    pub fn label(&self, axis: Axis, index: usize) -> Option<&AxisLabel> {
        self.axis(axis).labels.get(index)
    }

    /// Axis title ("Rows"/"Columns" unless configured).
    pub fn title(&self, axis: Axis) -> &str {
        &self.axis(axis).title
    }

    /// Usable metadata labels (empty when the axis metadata is unusable).
    pub fn meta_labels(&self, axis: Axis) -> &[String] {
        &self.axis(axis).meta_labels
    }

    /// Whether category strips are drawn for `axis`.
    pub fn shows_categories(&self, axis: Axis) -> bool {
        let data = self.axis(axis);
        !data.hide_meta && !data.meta_labels.is_empty()
    }

    /// Number of category strips drawn along `axis`.
    pub fn visible_category_count(&self, axis: Axis) -> usize {
        if self.shows_categories(axis) {
            self.axis(axis).meta_labels.len()
        } else {
            0
        }
    }

    pub fn category_colors(&self, axis: Axis, index: usize) -> &[Rgb] {
        self.axis(axis)
            .categories
            .get(index)
            .map_or(&[], Vec::as_slice)
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        self.matrix.get(row)?.get(col).copied()
    }

    pub fn color_at(&self, row: usize, col: usize) -> Option<Rgb> {
        self.colors.get(row)?.get(col).copied()
    }

    pub fn resolved_colors(&self) -> &ResolvedColorMatrix {
        &self.colors
    }

    pub fn color_config(&self) -> &ColorConfig {
        &self.color
    }

    pub fn stats(&self) -> MatrixStats {
        self.stats
    }

    pub fn sort_model(&self) -> &SortModel {
        &self.sort
    }

    /// Metadata warnings collected while building the model.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Snapshot for `getState()`.
    pub fn state(&self) -> ChartState {
        ChartState {
            rows: self.rows.labels.clone(),
            cols: self.cols.labels.clone(),
            matrix: self.matrix.clone(),
        }
    }

    /// Replace any of rows, cols, matrix and titles wholesale.
    ///
    /// Resets the sort. On error nothing changes.
    pub fn update(&mut self, update: DataUpdate) -> Result<()> {
        let rows = update.rows.unwrap_or_else(|| self.rows.labels.clone());
        let cols = update.cols.unwrap_or_else(|| self.cols.labels.clone());
        let matrix = update.matrix.unwrap_or_else(|| self.matrix.clone());
        let stats = validate_shape(&rows, &cols, &matrix)?;
        let colors = resolve(&matrix, &self.color)?;

        let mut warnings = Vec::new();
        self.rows = AxisData::new(
            Axis::Row,
            rows,
            update.rows_label.unwrap_or_else(|| self.rows.title.clone()),
            self.rows.declared.clone(),
            self.rows.hide_meta,
            &mut warnings,
        );
        self.cols = AxisData::new(
            Axis::Col,
            cols,
            update.cols_label.unwrap_or_else(|| self.cols.title.clone()),
            self.cols.declared.clone(),
            self.cols.hide_meta,
            &mut warnings,
        );
        self.matrix = matrix;
        self.colors = colors;
        self.stats = stats;
        self.warnings = warnings;
        self.sort.reset();
        tracing::debug!(rows = stats.rows, cols = stats.cols, "data model updated");
        Ok(())
    }

    /// Replace the color configuration. On error the previous colors stay.
    pub fn set_color(&mut self, color: ColorConfig) -> Result<()> {
        let colors = resolve(&self.matrix, &color)?;
        self.color = color;
        self.colors = colors;
        Ok(())
    }

    /// Move item `from` to position `to` along `axis`, carrying its matrix
    /// row/column along. Resets the sort.
    pub fn move_item(&mut self, axis: Axis, from: usize, to: usize) -> Result<()> {
        let len = self.len(axis);
        for index in [from, to] {
            if index >= len {
                return Err(HeatviewError::IndexOutOfRange {
                    axis: axis.name(),
                    index,
                    len,
                });
            }
        }
        if from == to {
            return Ok(());
        }

        let labels = &mut self.axis_mut(axis).labels;
        let label = labels.remove(from);
        labels.insert(to, label);
        match axis {
            Axis::Row => {
                let row = self.matrix.remove(from);
                self.matrix.insert(to, row);
            }
            Axis::Col => {
                for row in &mut self.matrix {
                    let v = row.remove(from);
                    row.insert(to, v);
                }
            }
        }
        self.refresh()?;
        self.sort.reset();
        tracing::debug!(axis = axis.name(), from, to, "moved item");
        Ok(())
    }

    /// Swap rows and columns.
    pub fn flip(&mut self) {
        self.matrix = transpose(&self.matrix);
        self.colors = transpose_colors(&self.colors);
        std::mem::swap(&mut self.rows, &mut self.cols);
        self.stats = MatrixStats {
            rows: self.stats.cols,
            cols: self.stats.rows,
            ..self.stats
        };
        self.sort.flip();
    }

    /// Sort `key.axis` by one metadata category. `SortDirection::None` only
    /// clears the sort state and keeps the current order.
    pub fn sort(&mut self, key: SortKey, direction: SortDirection) -> Result<()> {
        let data = self.axis(key.axis);
        if key.category >= data.meta_labels.len() {
            return Err(HeatviewError::IndexOutOfRange {
                axis: "category",
                index: key.category,
                len: data.meta_labels.len(),
            });
        }
        if direction != SortDirection::None {
            let order = sort_permutation(&data.labels, key.category, direction);
            self.apply_order(key.axis, &order);
        }
        self.sort.set_sort(key, direction);
        tracing::debug!(axis = key.axis.name(), category = key.category, ?direction, "sorted");
        Ok(())
    }

    /// Advance the sort of `key` (none/descending -> ascending -> descending).
    pub fn toggle_sort(&mut self, key: SortKey) -> Result<SortDirection> {
        let next = self.sort.direction(key).toggled();
        self.sort(key, next)?;
        Ok(next)
    }

    /// Permute one axis; labels, matrix, colors and categories travel together.
    fn apply_order(&mut self, axis: Axis, order: &[usize]) {
        let data = self.axis_mut(axis);
        data.labels = apply_permutation(&data.labels, order);
        data.categories = apply_permutation(&data.categories, order);
        match axis {
            Axis::Row => {
                self.matrix = apply_permutation(&self.matrix, order);
                self.colors = apply_permutation(&self.colors, order);
            }
            Axis::Col => {
                for row in &mut self.matrix {
                    *row = apply_permutation(row, order);
                }
                for row in &mut self.colors {
                    *row = apply_permutation(row, order);
                }
            }
        }
    }

    /// Recompute colors and categories from the current data.
    fn refresh(&mut self) -> Result<()> {
        self.colors = resolve(&self.matrix, &self.color)?;
        self.rows.recolor_categories();
        self.cols.recolor_categories();
        Ok(())
    }

    /// The cell at `(row, col)` as handed to selection callbacks.
    pub fn cell_entry(&self, row: usize, col: usize) -> Option<CellEntry> {
        let value = self.value(row, col)?;
        let r = self.rows.labels.get(row)?;
        let c = self.cols.labels.get(col)?;
        Some(CellEntry {
            value,
            row_label: r.name.clone(),
            col_label: c.name.clone(),
            row_id: r.id.clone(),
            col_id: c.id.clone(),
            row_meta: r.meta.clone(),
            col_meta: c.meta.clone(),
        })
    }

    /// All cells in the inclusive rectangle, row-major. Out-of-range parts are
    /// dropped.
    pub fn entries(
        &self,
        rows: RangeInclusive<usize>,
        cols: RangeInclusive<usize>,
    ) -> Vec<CellEntry> {
        rows.flat_map(|r| cols.clone().filter_map(move |c| self.cell_entry(r, c)))
            .collect()
    }

    /// The whole row or column at `index`.
    pub fn axis_entries(&self, axis: Axis, index: usize) -> Vec<CellEntry> {
        match axis {
            Axis::Row => self.entries(index..=index, 0..=self.n_cols().saturating_sub(1)),
            Axis::Col => self.entries(0..=self.n_rows().saturating_sub(1), index..=index),
        }
    }

    /// Payload for `onHover`.
    pub fn hover_info(&self, row: usize, col: usize) -> Option<HoverInfo> {
        let value = self.value(row, col)?;
        let r = self.rows.labels.get(row)?;
        let c = self.cols.labels.get(col)?;
        Some(HoverInfo {
            row_index: row,
            col_index: col,
            value,
            row_label: r.name.clone(),
            col_label: c.name.clone(),
            row_id: r.id.clone(),
            col_id: c.id.clone(),
            row_categories: self.rows.categories_of(row),
            col_categories: self.cols.categories_of(col),
        })
    }
}

fn validate_shape(
    rows: &[AxisLabel],
    cols: &[AxisLabel],
    matrix: &[Vec<f64>],
) -> Result<MatrixStats> {
    let stats = matrix_stats(matrix)?;
    if rows.len() != stats.rows {
        return Err(HeatviewError::LabelMismatch {
            axis: "row",
            labels: rows.len(),
            dimension: stats.rows,
        });
    }
    if cols.len() != stats.cols {
        return Err(HeatviewError::LabelMismatch {
            axis: "column",
            labels: cols.len(),
            dimension: stats.cols,
        });
    }
    Ok(stats)
}

fn transpose_colors(colors: &[Vec<Rgb>]) -> ResolvedColorMatrix {
    let cols = colors.first().map_or(0, Vec::len);
    (0..cols)
        .map(|j| colors.iter().filter_map(|row| row.get(j).copied()).collect())
        .collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn names(labels: &[AxisLabel]) -> Vec<&str> {
        labels.iter().map(|l| l.name.as_str()).collect()
    }

    fn model(m: usize, n: usize) -> DataModel {
        let rows = (0..m)
            .map(|i| {
                let parity = if i % 2 == 0 { "even" } else { "odd" };
                AxisLabel::new(format!("r{i}")).with_meta([Some(parity)])
            })
            .collect();
        let cols = (0..n).map(|j| AxisLabel::new(format!("c{j}"))).collect();
        let matrix = (0..m)
            .map(|i| (0..n).map(|j| (i * n + j) as f64).collect())
            .collect();
        let mut cfg = ChartConfig::new(rows, cols, matrix);
        cfg.row_meta_labels = Some(vec!["Parity".to_string()]);
        DataModel::new(&cfg).unwrap()
    }

    #[test]
    fn move_row_zero_to_two() {
        let mut dm = model(4, 2);
        dm.move_item(Axis::Row, 0, 2).unwrap();
        assert_eq!(names(dm.labels(Axis::Row)), vec!["r1", "r2", "r0", "r3"]);
        assert_eq!(dm.matrix()[2], vec![0.0, 1.0]);
        assert_eq!(dm.matrix()[0], vec![2.0, 3.0]);
        assert_eq!(
            dm.category_colors(Axis::Row, 2),
            dm.category_colors(Axis::Row, 1)
        );
    }

    #[test]
    fn move_and_back_restores() {
        let mut dm = model(4, 3);
        let before = dm.state();
        dm.move_item(Axis::Col, 0, 2).unwrap();
        assert_ne!(dm.state(), before);
        dm.move_item(Axis::Col, 2, 0).unwrap();
        assert_eq!(dm.state(), before);
    }

    #[test]
    fn move_out_of_range_is_rejected() {
        let mut dm = model(2, 2);
        assert!(matches!(
            dm.move_item(Axis::Row, 0, 5),
            Err(HeatviewError::IndexOutOfRange { index: 5, len: 2, .. })
        ));
    }

    #[test]
    fn flip_twice_is_identity() {
        let mut dm = model(3, 2);
        let before = dm.state();
        dm.flip();
        assert_eq!(dm.n_rows(), 2);
        assert_eq!(dm.n_cols(), 3);
        assert_eq!(dm.value(1, 2), Some(5.0));
        assert_eq!(dm.meta_labels(Axis::Col), ["Parity".to_string()]);
        dm.flip();
        assert_eq!(dm.state(), before);
    }

    #[test]
    fn sort_carries_matrix_rows() {
        let mut dm = model(4, 1);
        let key = SortKey {
            axis: Axis::Row,
            category: 0,
        };
        dm.sort(key, SortDirection::Descending).unwrap();
        assert_eq!(names(dm.labels(Axis::Row)), vec!["r1", "r3", "r0", "r2"]);
        assert_eq!(dm.value(0, 0), Some(1.0));
        assert_eq!(dm.sort_model().direction(key), SortDirection::Descending);
        assert_eq!(dm.toggle_sort(key).unwrap(), SortDirection::Ascending);
        assert_eq!(names(dm.labels(Axis::Row)), vec!["r0", "r2", "r1", "r3"]);
    }

    #[test]
    fn sort_unknown_category_fails() {
        let mut dm = model(2, 2);
        let key = SortKey {
            axis: Axis::Col,
            category: 0,
        };
        assert!(dm.sort(key, SortDirection::Ascending).is_err());
    }

    #[test]
    fn failed_recolor_keeps_previous_colors() {
        let mut dm = model(2, 2);
        let before = dm.resolved_colors().clone();
        let err = dm.set_color(ColorConfig::bins(["<1"], ["#000000"]));
        assert!(err.is_err());
        assert_eq!(dm.resolved_colors(), &before);
        assert_eq!(dm.color_config(), &ColorConfig::default());
    }

    #[test]
    fn update_validates_before_swapping() {
        let mut dm = model(2, 2);
        let before = dm.state();
        let bad = DataUpdate {
            matrix: Some(vec![vec![1.0, 2.0, 3.0]]),
            ..DataUpdate::default()
        };
        assert!(dm.update(bad).is_err());
        assert_eq!(dm.state(), before);

        let good = DataUpdate {
            matrix: Some(vec![vec![9.0, 9.0], vec![9.0, 9.0]]),
            rows_label: Some("Samples".to_string()),
            ..DataUpdate::default()
        };
        dm.update(good).unwrap();
        assert_eq!(dm.value(1, 1), Some(9.0));
        assert_eq!(dm.title(Axis::Row), "Samples");
        assert_eq!(dm.title(Axis::Col), DEFAULT_COLS_LABEL);
    }

    #[test]
    fn misaligned_meta_disables_categories() {
        let rows = vec![
            AxisLabel::new("a").with_meta([Some("x")]),
            AxisLabel::new("b"),
        ];
        let cols = vec![AxisLabel::new("c")];
        let mut cfg = ChartConfig::new(rows, cols, vec![vec![1.0], vec![2.0]]);
        cfg.row_meta_labels = Some(vec!["Kind".to_string()]);
        let dm = DataModel::new(&cfg).unwrap();
        assert!(!dm.shows_categories(Axis::Row));
        assert_eq!(dm.warnings().len(), 1);
        assert!(dm.hover_info(0, 0).unwrap().row_categories.is_empty());
    }

    #[test]
    fn hover_info_includes_categories() {
        let dm = model(2, 2);
        let info = dm.hover_info(1, 0).unwrap();
        assert_eq!(info.row_label, "r1");
        assert_eq!(info.value, 2.0);
        assert_eq!(info.row_categories.len(), 1);
        assert_eq!(info.row_categories[0].value.as_deref(), Some("odd"));
        assert!(info.col_categories.is_empty());
    }

    #[test]
    fn entries_are_row_major() {
        let dm = model(3, 3);
        let entries = dm.entries(1..=2, 0..=1);
        let values: Vec<f64> = entries.iter().map(|e| e.value).collect();
        assert_eq!(values, vec![3.0, 4.0, 6.0, 7.0]);
        assert_eq!(dm.axis_entries(Axis::Col, 2).len(), 3);
    }

    #[test]
    fn label_count_must_match_matrix() {
        let cfg = ChartConfig::new(
            vec![AxisLabel::new("a")],
            vec![AxisLabel::new("c")],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(matches!(
            DataModel::new(&cfg),
            Err(HeatviewError::LabelMismatch { axis: "row", .. })
        ));
    }
}
