use serde::Serialize;

use crate::error::{HeatviewError, Result};

/// Row-major numeric matrix.
pub type Matrix = Vec<Vec<f64>>;

/// Summary statistics over every matrix entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixStats {
    pub rows: usize,
    pub cols: usize,
    pub min: f64,
    pub max: f64,
    /// Largest absolute value; the gradient denominator.
    pub abs_max: f64,
}

/// Check that the matrix is non-empty and rectangular.
///
/// Returns `(rows, cols)`.
pub fn validate_matrix(matrix: &[Vec<f64>]) -> Result<(usize, usize)> {
    let Some(first) = matrix.first() else {
        return Err(HeatviewError::EmptyMatrix("matrix has no rows".to_string()));
    };
    let cols = first.len();
    if cols == 0 {
        return Err(HeatviewError::EmptyMatrix("row 0 has no entries".to_string()));
    }
    for (row, values) in matrix.iter().enumerate() {
        if values.len() != cols {
            return Err(HeatviewError::NonRectangular {
                row,
                expected: cols,
                found: values.len(),
            });
        }
    }
    Ok((matrix.len(), cols))
}

/// Compute min/max/abs-max over a validated matrix.
pub fn matrix_stats(matrix: &[Vec<f64>]) -> Result<MatrixStats> {
    let (rows, cols) = validate_matrix(matrix)?;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for value in matrix.iter().flatten().copied() {
        min = min.min(value);
        max = max.max(value);
    }
    Ok(MatrixStats {
        rows,
        cols,
        min,
        max,
        abs_max: min.abs().max(max.abs()),
    })
}

/// Transpose a rectangular matrix. An empty input yields an empty output.
pub fn transpose(matrix: &[Vec<f64>]) -> Matrix {
    let cols = matrix.first().map_or(0, Vec::len);
    (0..cols)
        .map(|j| {
            matrix
                .iter()
                .filter_map(|row| row.get(j).copied())
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

    #[test]
    fn validate_reports_shape() {
        let m = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        assert_eq!(validate_matrix(&m).unwrap(), (2, 3));
    }

    #[test]
    fn validate_rejects_empty() {
        assert!(matches!(
            validate_matrix(&[]),
            Err(HeatviewError::EmptyMatrix(_))
        ));
        assert!(matches!(
            validate_matrix(&[vec![]]),
            Err(HeatviewError::EmptyMatrix(_))
        ));
    }

    #[test]
    fn validate_rejects_ragged_rows() {
        let m = vec![vec![1.0, 2.0], vec![3.0]];
        match validate_matrix(&m) {
            Err(HeatviewError::NonRectangular {
                row,
                expected,
                found,
            }) => {
                assert_eq!((row, expected, found), (1, 2, 1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stats_track_absolute_max() {
        let m = vec![vec![-8.0, 2.0], vec![3.0, 4.0]];
        let stats = matrix_stats(&m).unwrap();
        assert_eq!(stats.min, -8.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.abs_max, 8.0);
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]];
        let t = transpose(&m);
        assert_eq!(t, vec![vec![1.0, 4.0], vec![2.0, 5.0], vec![3.0, 6.0]]);
        assert_eq!(transpose(&t), m);
    }
}
