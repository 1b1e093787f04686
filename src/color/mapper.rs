//! Matrix value → color resolution.

use super::bins::{parse_bins, Bin};
use crate::error::ColorMappingError;
use crate::render::colors::{palette, parse_color, Rgb};
use crate::types::{ColorConfig, ColorPreset};

/// Same shape as the matrix; one packed color per entry.
pub type ResolvedColorMatrix = Vec<Vec<Rgb>>;

/// A validated color configuration ready to map single values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColorScale {
    /// White at 0, `end` at `abs_max`. The weight is clamped to `[0, 1]`, so
    /// negative values render as the start color.
    Gradient { abs_max: f64, start: Rgb, end: Rgb },
    /// First matching bin wins.
    Bins {
        bins: Vec<Bin>,
        colors: Vec<Rgb>,
        specs: Vec<String>,
    },
}

impl ColorScale {
    /// Validate `config`. `abs_max` is only used by the gradient.
    pub fn from_config(config: &ColorConfig, abs_max: f64) -> Result<Self, ColorMappingError> {
        match config {
            ColorConfig::Preset(ColorPreset::Gradient) => Ok(Self::Gradient {
                abs_max,
                start: palette::GRADIENT_START,
                end: palette::GRADIENT_END,
            }),
            ColorConfig::Bins(table) => {
                if table.bins.len() != table.colors.len() {
                    return Err(ColorMappingError::CountMismatch {
                        bins: table.bins.len(),
                        colors: table.colors.len(),
                    });
                }
                let bins = parse_bins(&table.bins)?;
                let colors = table
                    .colors
                    .iter()
                    .map(|c| parse_color(c).ok_or_else(|| ColorMappingError::InvalidColor(c.clone())))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Bins {
                    bins,
                    colors,
                    specs: table.bins.clone(),
                })
            }
        }
    }

    /// Color for a single value; `None` when no bin matches.
    pub fn color_of(&self, value: f64) -> Option<Rgb> {
        match self {
            Self::Gradient {
                abs_max,
                start,
                end,
            } => {
                let t = if *abs_max > 0.0 { value / abs_max } else { 0.0 };
                Some(start.lerp(*end, t))
            }
            Self::Bins { bins, colors, .. } => bins
                .iter()
                .position(|bin| bin.matches(value))
                .and_then(|k| colors.get(k).copied()),
        }
    }

    /// Bin specs as configured (empty for the gradient).
    pub fn specs(&self) -> &[String] {
        match self {
            Self::Gradient { .. } => &[],
            Self::Bins { specs, .. } => specs,
        }
    }
}

/// Resolve every matrix value to a color.
///
/// Fails before producing any output when the configuration is invalid or a
/// value matches no bin; the error names the value, its position, and the bins.
pub fn resolve(
    matrix: &[Vec<f64>],
    config: &ColorConfig,
) -> Result<ResolvedColorMatrix, ColorMappingError> {
    let abs_max = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let scale = ColorScale::from_config(config, abs_max)?;
    resolve_with(matrix, &scale)
}

/// Resolve with an already validated scale.
pub(crate) fn resolve_with(
    matrix: &[Vec<f64>],
    scale: &ColorScale,
) -> Result<ResolvedColorMatrix, ColorMappingError> {
    matrix
        .iter()
        .enumerate()
        .map(|(row, values)| {
            values
                .iter()
                .enumerate()
                .map(|(col, &value)| {
                    scale
                        .color_of(value)
                        .ok_or_else(|| ColorMappingError::UnmappedValue {
                            value,
                            row,
                            col,
                            bins: scale.specs().to_vec(),
                        })
                })
                .collect()
        })
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

    const A: &str = "#FF0000";
    const B: &str = "#00FF00";
    const C: &str = "#0000FF";
    const D: &str = "#000000";

    #[test]
    fn exact_bins_map_each_value() {
        let m = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let cfg = ColorConfig::bins(["=1", "=2", "=3", "=4"], [A, B, C, D]);
        let resolved = resolve(&m, &cfg).unwrap();
        let hex: Vec<Vec<String>> = resolved
            .iter()
            .map(|r| r.iter().map(|c| c.to_hex()).collect())
            .collect();
        assert_eq!(hex, vec![vec![A, B], vec![C, D]]);
    }

    #[test]
    fn count_mismatch_fails_before_parsing() {
        let cfg = ColorConfig::bins(["garbage", "=2"], [A]);
        assert_eq!(
            resolve(&[vec![1.0]], &cfg),
            Err(ColorMappingError::CountMismatch { bins: 2, colors: 1 })
        );
    }

    #[test]
    fn unmapped_value_reports_position() {
        let m = vec![vec![1.0, 2.0], vec![3.0, 9.0]];
        let cfg = ColorConfig::bins(["<5"], [A]);
        match resolve(&m, &cfg) {
            Err(ColorMappingError::UnmappedValue {
                value,
                row,
                col,
                bins,
            }) => {
                assert_eq!((value, row, col), (9.0, 1, 1));
                assert_eq!(bins, vec!["<5".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn overlapping_bins_first_declared_wins() {
        let m = vec![vec![3.0]];
        let narrow_first = ColorConfig::bins(["=3", ">0"], [A, B]);
        let broad_first = ColorConfig::bins([">0", "=3"], [B, A]);
        assert_eq!(resolve(&m, &narrow_first).unwrap()[0][0].to_hex(), A);
        assert_eq!(resolve(&m, &broad_first).unwrap()[0][0].to_hex(), B);
        // Stable across calls.
        assert_eq!(
            resolve(&m, &narrow_first).unwrap(),
            resolve(&m, &narrow_first).unwrap()
        );
    }

    #[test]
    fn gradient_spans_white_to_endpoint() {
        let m = vec![vec![0.0, 5.0, 10.0]];
        let resolved = resolve(&m, &ColorConfig::default()).unwrap();
        assert_eq!(resolved[0][0], palette::GRADIENT_START);
        assert_eq!(resolved[0][2], palette::GRADIENT_END);
        assert_eq!(
            resolved[0][1],
            palette::GRADIENT_START.lerp(palette::GRADIENT_END, 0.5)
        );
    }

    #[test]
    fn gradient_clamps_negative_values_to_start() {
        let m = vec![vec![-10.0, 5.0]];
        let resolved = resolve(&m, &ColorConfig::default()).unwrap();
        assert_eq!(resolved[0][0], palette::GRADIENT_START);
    }

    #[test]
    fn gradient_handles_all_zero_matrix() {
        let resolved = resolve(&[vec![0.0, 0.0]], &ColorConfig::default()).unwrap();
        assert!(resolved[0].iter().all(|c| *c == palette::GRADIENT_START));
    }

    #[test]
    fn invalid_color_string_is_reported() {
        let cfg = ColorConfig::bins(["=1"], ["nope"]);
        assert_eq!(
            resolve(&[vec![1.0]], &cfg),
            Err(ColorMappingError::InvalidColor("nope".to_string()))
        );
    }
}
