//! Case-insensitive label search.

use crate::model::DataModel;
use crate::types::Axis;

/// Lowercase one char at a time, keeping one char per input char so char
/// indices stay valid in the original string.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

/// Every row, then every column, whose name contains `query`.
pub fn find_matches(model: &DataModel, query: &str) -> Vec<(Axis, usize)> {
    let needle = fold_case(query);
    if needle.is_empty() {
        return Vec::new();
    }
    [Axis::Row, Axis::Col]
        .into_iter()
        .flat_map(|axis| {
            let needle = needle.as_str();
            model
                .labels(axis)
                .iter()
                .enumerate()
                .filter(move |(_, l)| fold_case(&l.name).contains(needle))
                .map(move |(i, _)| (axis, i))
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Current query, its matches, and the `nextMatch` cursor.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: String,
    matches: Vec<(Axis, usize)>,
    cursor: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        (!self.query.is_empty()).then_some(self.query.as_str())
    }

    pub fn matches(&self) -> &[(Axis, usize)] {
        &self.matches
    }

    /// Start a new search. Returns the number of matches.
    pub fn set_query(&mut self, model: &DataModel, query: &str) -> usize {
        self.query = query.trim().to_string();
        self.cursor = None;
        self.refresh(model);
        self.matches.len()
    }

    /// Recompute matches after the data changed; the cursor restarts.
    pub fn refresh(&mut self, model: &DataModel) {
        self.matches = find_matches(model, &self.query);
        self.cursor = None;
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Advance to the next match, wrapping around.
    pub fn next_match(&mut self) -> Option<(Axis, usize)> {
        if self.matches.is_empty() {
            return None;
        }
        let next = self.cursor.map_or(0, |c| (c + 1) % self.matches.len());
        self.cursor = Some(next);
        self.matches.get(next).copied()
    }
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
    use crate::types::{AxisLabel, ChartConfig};

    fn model() -> DataModel {
        let rows = ["Alpha", "beta", "Gamma"].map(AxisLabel::new).to_vec();
        let cols = ["ALPHA-2", "delta"].map(AxisLabel::new).to_vec();
        let matrix = vec![vec![0.0; 2]; 3];
        DataModel::new(&ChartConfig::new(rows, cols, matrix)).unwrap()
    }

    #[test]
    fn matches_rows_then_columns_ignoring_case() {
        let m = model();
        assert_eq!(
            find_matches(&m, "alpha"),
            vec![(Axis::Row, 0), (Axis::Col, 0)]
        );
        assert_eq!(find_matches(&m, "TA"), vec![(Axis::Row, 1), (Axis::Col, 1)]);
        assert!(find_matches(&m, "").is_empty());
    }

    #[test]
    fn folding_keeps_char_count() {
        assert_eq!(fold_case("\u{130}stanbul").chars().count(), 8);
        assert_eq!(fold_case("\u{130}stanbul"), "istanbul");
        assert_eq!(fold_case("ÄBC"), "äbc");
    }

    #[test]
    fn next_match_cycles() {
        let m = model();
        let mut search = SearchState::new();
        assert_eq!(search.set_query(&m, " alpha "), 2);
        assert_eq!(search.query(), Some("alpha"));
        assert_eq!(search.next_match(), Some((Axis::Row, 0)));
        assert_eq!(search.next_match(), Some((Axis::Col, 0)));
        assert_eq!(search.next_match(), Some((Axis::Row, 0)));
    }

    #[test]
    fn no_matches_yields_none() {
        let m = model();
        let mut search = SearchState::new();
        search.set_query(&m, "zzz");
        assert_eq!(search.next_match(), None);
        search.clear();
        assert_eq!(search.query(), None);
    }
}
