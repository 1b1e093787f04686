//! Structured error types for heatview.
//!
//! Bad input data is always surfaced as one of these variants; nothing is
//! retried automatically and nothing is swallowed.

/// Failures raised while resolving matrix values to colors.
///
/// Always raised before any draw call, so a failed recolor leaves the previous
/// frame intact.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ColorMappingError {
    /// `bins` and `colors` have different lengths.
    #[error("color bins ({bins}) and colors ({colors}) must have the same length")]
    CountMismatch { bins: usize, colors: usize },

    /// A bin spec is not one operator followed by one number.
    #[error("invalid color bin {0:?}: expected one of =, <, <=, >, >= followed by a number")]
    InvalidBin(String),

    /// A configured color string could not be parsed.
    #[error("invalid color {0:?}")]
    InvalidColor(String),

    /// A matrix value matched none of the configured bins.
    #[error("value {value} at row {row}, column {col} matches none of the color bins {bins:?}")]
    UnmappedValue {
        value: f64,
        row: usize,
        col: usize,
        bins: Vec<String>,
    },
}

/// All errors that can occur in heatview.
#[derive(Debug, thiserror::Error)]
pub enum HeatviewError {
    /// Missing or malformed constructor input.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The matrix has no rows or a row has no entries.
    #[error("Matrix is empty: {0}")]
    EmptyMatrix(String),

    /// A row has a different length than the first row.
    #[error("Matrix is not rectangular: row {row} has {found} entries, expected {expected}")]
    NonRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Labels do not line up with the matrix shape.
    #[error("{axis} labels ({labels}) do not match matrix dimension ({dimension})")]
    LabelMismatch {
        axis: &'static str,
        labels: usize,
        dimension: usize,
    },

    /// A row or column index outside the current matrix.
    #[error("{axis} index {index} out of range (0..{len})")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        len: usize,
    },

    /// Color resolution failure.
    #[error("Color mapping: {0}")]
    ColorMapping(#[from] ColorMappingError),

    /// SVG serialization failure.
    #[error("SVG export: {0}")]
    Xml(#[from] quick_xml::Error),

    /// JSON (de)serialization failure.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for string errors coming from the DOM layer.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, HeatviewError>;

impl From<String> for HeatviewError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for HeatviewError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<HeatviewError> for wasm_bindgen::JsValue {
    fn from(e: HeatviewError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_value_message_names_position_and_bins() {
        let err = ColorMappingError::UnmappedValue {
            value: 7.5,
            row: 2,
            col: 3,
            bins: vec!["<0".to_string(), "=1".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("7.5"));
        assert!(msg.contains("row 2"));
        assert!(msg.contains("column 3"));
        assert!(msg.contains("\"<0\""));
    }

    #[test]
    fn color_errors_convert_into_crate_error() {
        let err: HeatviewError = ColorMappingError::CountMismatch { bins: 2, colors: 3 }.into();
        assert!(matches!(
            err,
            HeatviewError::ColorMapping(ColorMappingError::CountMismatch { .. })
        ));
    }
}
