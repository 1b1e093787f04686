//! Sort-by-category state and permutation.
//!
//! At most one (axis, category) key is sorted at a time; setting a new key
//! clears the previous one.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::types::{Axis, AxisLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortDirection {
    /// Button cycle: none/descending -> ascending -> descending.
    pub fn toggled(self) -> Self {
        match self {
            Self::None | Self::Descending => Self::Ascending,
            Self::Ascending => Self::Descending,
        }
    }
}

/// The metadata column a sort applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub axis: Axis,
    /// Index into the axis' metadata labels.
    pub category: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortModel {
    active: Option<(SortKey, SortDirection)>,
}

impl SortModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direction currently applied to `key`.
    pub fn direction(&self, key: SortKey) -> SortDirection {
        match self.active {
            Some((k, dir)) if k == key => dir,
            _ => SortDirection::None,
        }
    }

    pub fn active(&self) -> Option<(SortKey, SortDirection)> {
        self.active
    }

    /// Make `key` the only sorted key. `SortDirection::None` clears it.
    pub fn set_sort(&mut self, key: SortKey, direction: SortDirection) {
        self.active = match direction {
            SortDirection::None => match self.active {
                Some((k, _)) if k != key => self.active,
                _ => None,
            },
            dir => Some((key, dir)),
        };
    }

    /// Advance `key` to its next direction and return it.
    pub fn toggle(&mut self, key: SortKey) -> SortDirection {
        let next = self.direction(key).toggled();
        self.set_sort(key, next);
        next
    }

    pub fn reset(&mut self) {
        self.active = None;
    }

    /// Follow an axis flip: a row sort becomes the matching column sort.
    pub fn flip(&mut self) {
        if let Some((key, _)) = self.active.as_mut() {
            key.axis = key.axis.other();
        }
    }
}

/// Stable permutation ordering `labels` by their metadata value at `category`.
///
/// Values compare byte-wise; missing values always go last. `None` returns the
/// identity.
pub fn sort_permutation(
    labels: &[AxisLabel],
    category: usize,
    direction: SortDirection,
) -> Vec<usize> {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    if direction == SortDirection::None {
        return order;
    }
    let key = |i: usize| labels.get(i).and_then(|l| l.meta_value(category));
    order.sort_by(|&a, &b| match (key(a), key(b)) {
        (Some(x), Some(y)) => {
            let ord = x.cmp(y);
            if direction == SortDirection::Descending {
                ord.reverse()
            } else {
                ord
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    order
}

/// Reorder `items` so that `result[i] == items[order[i]]`.
///
/// `order` must be a permutation of `0..items.len()`; entries outside that
/// range are skipped.
pub fn apply_permutation<T: Clone>(items: &[T], order: &[usize]) -> Vec<T> {
    order.iter().filter_map(|&i| items.get(i).cloned()).collect()
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

    const ROW0: SortKey = SortKey {
        axis: Axis::Row,
        category: 0,
    };
    const ROW1: SortKey = SortKey {
        axis: Axis::Row,
        category: 1,
    };
    const COL0: SortKey = SortKey {
        axis: Axis::Col,
        category: 0,
    };

    fn labels(values: &[Option<&str>]) -> Vec<AxisLabel> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| AxisLabel::new(format!("l{i}")).with_meta([*v]))
            .collect()
    }

    #[test]
    fn only_one_key_is_active() {
        let mut model = SortModel::new();
        model.set_sort(ROW0, SortDirection::Ascending);
        model.set_sort(COL0, SortDirection::Descending);
        assert_eq!(model.direction(ROW0), SortDirection::None);
        assert_eq!(model.direction(COL0), SortDirection::Descending);
    }

    #[test]
    fn clearing_another_key_keeps_active_sort() {
        let mut model = SortModel::new();
        model.set_sort(ROW0, SortDirection::Ascending);
        model.set_sort(ROW1, SortDirection::None);
        assert_eq!(model.direction(ROW0), SortDirection::Ascending);
        model.set_sort(ROW0, SortDirection::None);
        assert_eq!(model.active(), None);
    }

    #[test]
    fn toggle_cycles_between_directions() {
        let mut model = SortModel::new();
        assert_eq!(model.toggle(ROW1), SortDirection::Ascending);
        assert_eq!(model.toggle(ROW1), SortDirection::Descending);
        assert_eq!(model.toggle(ROW1), SortDirection::Ascending);
        model.reset();
        assert_eq!(model.direction(ROW1), SortDirection::None);
    }

    #[test]
    fn permutation_is_stable_with_missing_last() {
        let l = labels(&[Some("b"), None, Some("a"), Some("b"), Some("a")]);
        assert_eq!(
            sort_permutation(&l, 0, SortDirection::Ascending),
            vec![2, 4, 0, 3, 1]
        );
        assert_eq!(
            sort_permutation(&l, 0, SortDirection::Descending),
            vec![0, 3, 2, 4, 1]
        );
        assert_eq!(
            sort_permutation(&l, 0, SortDirection::None),
            vec![0, 1, 2, 3, 4]
        );
    }

    #[test]
    fn byte_wise_order_puts_uppercase_first() {
        let l = labels(&[Some("beta"), Some("Alpha"), Some("alpha")]);
        assert_eq!(
            sort_permutation(&l, 0, SortDirection::Ascending),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn apply_permutation_reorders() {
        let items = vec!["a", "b", "c"];
        assert_eq!(apply_permutation(&items, &[2, 0, 1]), vec!["c", "a", "b"]);
    }
}
