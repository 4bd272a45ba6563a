use serde::Serialize;

// ---------------------------------------------------------------------------
// Summary – populated result or the "no data" sentinel
// ---------------------------------------------------------------------------

/// Outcome of an aggregation. A zero-row table is never handed to the
/// presentation layer; it becomes [`Summary::Empty`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "rows", rename_all = "snake_case")]
pub enum Summary<T> {
    Data(T),
    Empty,
}

impl<T> Summary<Vec<T>> {
    /// Apply the empty-result rule to a finished table.
    pub fn from_rows(rows: Vec<T>) -> Self {
        if rows.is_empty() {
            Summary::Empty
        } else {
            Summary::Data(rows)
        }
    }

    /// Rows of the table, or an empty slice for the sentinel.
    pub fn rows(&self) -> &[T] {
        match self {
            Summary::Data(rows) => rows,
            Summary::Empty => &[],
        }
    }
}

impl<T> Summary<T> {
    pub fn is_empty(&self) -> bool {
        matches!(self, Summary::Empty)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Summary::Data(data) => Some(data),
            Summary::Empty => None,
        }
    }
}
