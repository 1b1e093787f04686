use serde::Serialize;

/// In-progress drag selection in viewbox-local cell coordinates.
///
/// `(x, y)` is the origin cell (column, row) and `(x2, y2)` the current
/// corner; the box may extend in any direction from the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionBox {
    pub x: usize,
    pub y: usize,
    pub x2: usize,
    pub y2: usize,
}

impl SelectionBox {
    pub fn at(x: usize, y: usize) -> Self {
        Self { x, y, x2: x, y2: y }
    }

    /// True when the box covers exactly one cell.
    pub fn is_point(&self) -> bool {
        self.x == self.x2 && self.y == self.y2
    }

    /// Normalized bounds `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self) -> (usize, usize, usize, usize) {
        (
            self.x.min(self.x2),
            self.y.min(self.y2),
            self.x.max(self.x2),
            self.y.max(self.y2),
        )
    }

    /// Extent in cells along x and y (absolute difference from the origin).
    pub fn extent(&self) -> (usize, usize) {
        (self.x.abs_diff(self.x2), self.y.abs_diff(self.y2))
    }
}

/// One cell as handed to `onSelection` / `onClick`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellEntry {
    pub value: f64,
    pub row_label: String,
    pub col_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_meta: Option<Vec<Option<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_meta: Option<Vec<Option<String>>>,
}

/// A named category value shown in the tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryField {
    pub label: String,
    pub value: Option<String>,
}

/// Payload handed to `onHover`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HoverInfo {
    pub row_index: usize,
    pub col_index: usize,
    pub value: f64,
    pub row_label: String,
    pub col_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col_id: Option<serde_json::Value>,
    /// Empty when the row metadata labels are missing or misaligned.
    pub row_categories: Vec<CategoryField>,
    /// Empty when the column metadata labels are missing or misaligned.
    pub col_categories: Vec<CategoryField>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn bounds_normalize_reverse_drags() {
        let b = SelectionBox {
            x: 5,
            y: 4,
            x2: 1,
            y2: 2,
        };
        assert_eq!(b.bounds(), (1, 2, 5, 4));
        assert_eq!(b.extent(), (4, 2));
        assert!(!b.is_point());
        assert!(SelectionBox::at(3, 3).is_point());
    }

    #[test]
    fn cell_entry_serializes_camel_case_without_empty_options() {
        let entry = CellEntry {
            value: 1.5,
            row_label: "r".to_string(),
            col_label: "c".to_string(),
            row_id: Some(serde_json::json!(7)),
            col_id: None,
            row_meta: None,
            col_meta: None,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["rowLabel"], "r");
        assert_eq!(json["rowId"], 7);
        assert!(json.get("colId").is_none());
    }
}
