use serde::{Deserialize, Serialize};

/// One of the two matrix axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Rows (vertical axis, labels on the left)
    Row,
    /// Columns (horizontal axis, labels on top)
    Col,
}

impl Axis {
    /// The perpendicular axis.
    pub fn other(self) -> Self {
        match self {
            Self::Row => Self::Col,
            Self::Col => Self::Row,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Row => "row",
            Self::Col => "column",
        }
    }
}

/// A row or column label with optional opaque id and category metadata.
///
/// `meta[k]` lines up with the k-th declared metadata label of its axis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisLabel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Vec<Option<String>>>,
}

impl AxisLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: None,
            meta: None,
        }
    }

    pub fn with_id(mut self, id: serde_json::Value) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_meta<I, S>(mut self, meta: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        self.meta = Some(meta.into_iter().map(|m| m.map(Into::into)).collect());
        self
    }

    /// Category value at metadata index `k`, if present and non-null.
    pub fn meta_value(&self, k: usize) -> Option<&str> {
        self.meta.as_ref()?.get(k)?.as_deref()
    }

    /// Number of metadata entries carried by this label.
    pub fn meta_len(&self) -> usize {
        self.meta.as_ref().map_or(0, Vec::len)
    }
}
