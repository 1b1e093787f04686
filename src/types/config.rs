//! Widget configuration as received from JavaScript (or JSON in the CLI).
//!
//! The DOM element and the JS callbacks are not part of these types; the
//! viewer reads them off the raw config object separately.

use serde::{Deserialize, Serialize};

use super::{AxisLabel, Matrix};
use crate::error::{HeatviewError, Result};

/// Default axis titles.
pub const DEFAULT_ROWS_LABEL: &str = "Rows";
pub const DEFAULT_COLS_LABEL: &str = "Columns";

/// Named color modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorPreset {
    /// Continuous white-to-endpoint interpolation over the matrix range.
    Gradient,
}

/// Discrete bin coloring: `bins[k]` (e.g. `"<=5"`) maps to `colors[k]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinColors {
    pub bins: Vec<String>,
    pub colors: Vec<String>,
}

/// Either the literal `"gradient"` or a bin/color table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorConfig {
    Preset(ColorPreset),
    Bins(BinColors),
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self::Preset(ColorPreset::Gradient)
    }
}

impl ColorConfig {
    pub fn bins<B, C>(bins: B, colors: C) -> Self
    where
        B: IntoIterator,
        B::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::Bins(BinColors {
            bins: bins.into_iter().map(Into::into).collect(),
            colors: colors.into_iter().map(Into::into).collect(),
        })
    }
}

/// Color theme for chrome (background, label text, decorations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

/// Where the ellipsis goes when a row label is shortened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EllipsisPos {
    Start,
    Middle,
    #[default]
    End,
}

/// Display options (`config.options`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartOptions {
    /// `"light"` selects the light theme; anything else is the default theme.
    pub theme: Option<String>,
    pub show_version: bool,
    pub options_label: Option<String>,
    pub hide_options: bool,
    /// Custom legend text/HTML. Implies `hide_legend`.
    pub legend: Option<String>,
    pub hide_legend: bool,
    pub use_margins: bool,
    pub wait_for_font: bool,
    /// Gap between labels and the grid, in pixels.
    pub text_padding: f32,
    pub max_font_size: f32,
    pub use_bounding_client: bool,
    pub row_label_ellipsis_pos: EllipsisPos,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            theme: None,
            show_version: false,
            options_label: None,
            hide_options: false,
            legend: None,
            hide_legend: false,
            use_margins: false,
            wait_for_font: false,
            text_padding: 5.0,
            max_font_size: 14.0,
            use_bounding_client: false,
            row_label_ellipsis_pos: EllipsisPos::End,
        }
    }
}

impl ChartOptions {
    pub fn theme(&self) -> Theme {
        match self.theme.as_deref() {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Whether the built-in legend is shown.
    pub fn shows_legend(&self) -> bool {
        !self.hide_legend && self.legend.is_none()
    }
}

/// Initial cell sizes overriding the computed defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CellDefaults {
    pub cell_width: Option<f32>,
    pub cell_height: Option<f32>,
}

/// Everything the widget needs from `new HeatView(config)` besides the element
/// and callbacks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartConfig {
    pub rows: Option<Vec<AxisLabel>>,
    pub cols: Option<Vec<AxisLabel>>,
    pub matrix: Option<Matrix>,
    pub rows_label: Option<String>,
    pub cols_label: Option<String>,
    pub row_meta_labels: Option<Vec<String>>,
    pub col_meta_labels: Option<Vec<String>>,
    pub hide_row_meta: bool,
    pub hide_col_meta: bool,
    pub color: ColorConfig,
    pub options: ChartOptions,
    pub newick: Option<String>,
    pub defaults: CellDefaults,
}

impl ChartConfig {
    pub fn new(rows: Vec<AxisLabel>, cols: Vec<AxisLabel>, matrix: Matrix) -> Self {
        Self {
            rows: Some(rows),
            cols: Some(cols),
            matrix: Some(matrix),
            ..Self::default()
        }
    }

    /// Parse a JSON chart description.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Take the required fields out, failing on the first one missing.
    pub(crate) fn required_parts(&self) -> Result<(&[AxisLabel], &[AxisLabel], &Matrix)> {
        let rows = self
            .rows
            .as_deref()
            .ok_or_else(|| HeatviewError::Config("`rows` is required".to_string()))?;
        let cols = self
            .cols
            .as_deref()
            .ok_or_else(|| HeatviewError::Config("`cols` is required".to_string()))?;
        let matrix = self
            .matrix
            .as_ref()
            .ok_or_else(|| HeatviewError::Config("`matrix` is required".to_string()))?;
        Ok((rows, cols, matrix))
    }
}

/// Payload of `update(...)`: every field replaces the current value wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataUpdate {
    pub rows: Option<Vec<AxisLabel>>,
    pub cols: Option<Vec<AxisLabel>>,
    pub matrix: Option<Matrix>,
    pub rows_label: Option<String>,
    pub cols_label: Option<String>,
}

/// Snapshot returned by `getState()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartState {
    pub rows: Vec<AxisLabel>,
    pub cols: Vec<AxisLabel>,
    pub matrix: Matrix,
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

    #[test]
    fn parses_gradient_literal() {
        let cfg: ChartConfig = serde_json::from_str(r#"{"color": "gradient"}"#).unwrap();
        assert_eq!(cfg.color, ColorConfig::Preset(ColorPreset::Gradient));
    }

    #[test]
    fn parses_bins_and_camel_case_options() {
        let cfg: ChartConfig = serde_json::from_str(
            r##"{
                "rows": [{"name": "r0", "meta": ["a", null]}],
                "cols": [{"name": "c0", "id": 42}],
                "matrix": [[1]],
                "rowMetaLabels": ["Genus", "Species"],
                "color": {"bins": ["<0", ">=0"], "colors": ["#000000", "#ffffff"]},
                "options": {"theme": "light", "maxFontSize": 10, "rowLabelEllipsisPos": "start"},
                "defaults": {"cellWidth": 12}
            }"##,
        )
        .unwrap();
        assert!(matches!(cfg.color, ColorConfig::Bins(ref b) if b.bins.len() == 2));
        assert_eq!(cfg.options.theme(), Theme::Light);
        assert_eq!(cfg.options.max_font_size, 10.0);
        assert_eq!(cfg.options.text_padding, 5.0);
        assert_eq!(cfg.options.row_label_ellipsis_pos, EllipsisPos::Start);
        assert_eq!(cfg.defaults.cell_width, Some(12.0));
        let rows = cfg.rows.unwrap();
        assert_eq!(rows[0].meta_value(0), Some("a"));
        assert_eq!(rows[0].meta_value(1), None);
    }

    #[test]
    fn unknown_theme_falls_back_to_default() {
        let opts = ChartOptions {
            theme: Some("solarized".to_string()),
            ..ChartOptions::default()
        };
        assert_eq!(opts.theme(), Theme::Dark);
    }

    #[test]
    fn custom_legend_hides_builtin_legend() {
        let opts = ChartOptions {
            legend: Some("<b>custom</b>".to_string()),
            ..ChartOptions::default()
        };
        assert!(!opts.shows_legend());
    }

    #[test]
    fn required_parts_report_missing_field() {
        let cfg = ChartConfig {
            rows: Some(vec![]),
            ..ChartConfig::default()
        };
        let err = cfg.required_parts().unwrap_err();
        assert!(err.to_string().contains("cols"));
    }
}
