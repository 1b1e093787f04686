//! Deterministic colors for categorical metadata values.

use crate::render::colors::{palette, Rgb};
use crate::types::AxisLabel;

pub const CATEGORY_PALETTE_SIZE: usize = palette::CATEGORY.len();

/// FNV-1a, 32-bit.
fn fnv1a(s: &str) -> u32 {
    s.bytes().fold(0x811C_9DC5_u32, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(0x0100_0193)
    })
}

/// Color for one category value. Missing values are gray.
pub fn category_color(value: Option<&str>) -> Rgb {
    let Some(value) = value else {
        return palette::CATEGORY_MISSING;
    };
    let slot = fnv1a(value) as usize % CATEGORY_PALETTE_SIZE;
    palette::CATEGORY
        .get(slot)
        .copied()
        .unwrap_or(palette::CATEGORY_MISSING)
}

/// One color per (item, category index).
pub fn colorize<S: AsRef<str>>(category_sets: &[Vec<Option<S>>]) -> Vec<Vec<Rgb>> {
    category_sets
        .iter()
        .map(|set| {
            set.iter()
                .map(|v| category_color(v.as_ref().map(AsRef::as_ref)))
                .collect()
        })
        .collect()
}

/// Colorize the metadata of an axis, padding short meta arrays with gray so
/// every item has exactly `meta_count` strips.
pub fn colorize_labels(labels: &[AxisLabel], meta_count: usize) -> Vec<Vec<Rgb>> {
    labels
        .iter()
        .map(|label| {
            (0..meta_count)
                .map(|k| category_color(label.meta_value(k)))
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
    fn identical_strings_share_a_color() {
        let colors = colorize(&[
            vec![Some("A")],
            vec![Some("A")],
            vec![Some("B")],
        ]);
        assert_eq!(colors[0][0], colors[1][0]);
        assert!(palette::CATEGORY.contains(&colors[2][0]));
    }

    #[test]
    fn color_is_independent_of_position() {
        let a = colorize(&[vec![Some("x"), Some("genus")]]);
        let b = colorize(&[vec![Some("genus"), Some("x")]]);
        assert_eq!(a[0][0], b[0][1]);
        assert_eq!(a[0][1], b[0][0]);
    }

    #[test]
    fn missing_values_are_gray() {
        assert_eq!(category_color(None), palette::CATEGORY_MISSING);
        let colors = colorize::<&str>(&[vec![None]]);
        assert_eq!(colors[0][0], palette::CATEGORY_MISSING);
    }

    #[test]
    fn labels_are_padded_to_meta_count() {
        let labels = vec![
            AxisLabel::new("r0").with_meta([Some("a"), Some("b")]),
            AxisLabel::new("r1").with_meta([Some("a")]),
            AxisLabel::new("r2"),
        ];
        let colors = colorize_labels(&labels, 2);
        assert_eq!(colors.len(), 3);
        assert!(colors.iter().all(|c| c.len() == 2));
        assert_eq!(colors[0][0], colors[1][0]);
        assert_eq!(colors[1][1], palette::CATEGORY_MISSING);
        assert_eq!(colors[2][0], palette::CATEGORY_MISSING);
    }

    #[test]
    fn hash_is_stable() {
        // Known FNV-1a vectors.
        assert_eq!(fnv1a(""), 0x811C_9DC5);
        assert_eq!(fnv1a("a"), 0xE40C_292C);
    }
}
