use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A rectangular block of text cells produced by a detection strategy.
///
/// Rows shorter than the widest row are padded with empty strings, so every
/// row holds exactly `n_cols()` cells.
///
/// Deserializes from an array of rows of JSON scalars: numbers and booleans
/// become their text, `null` an empty cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Vec<Value>>", into = "Vec<Vec<String>>")]
pub struct Grid {
    rows: Vec<Vec<String>>,
    n_cols: usize,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(n_cols, String::new());
                row
            })
            .collect();
        Grid { rows, n_cols }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    /// `(n_rows, n_cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().flatten().map(String::as_str)
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, col: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter_map(move |row| row.get(col).map(String::as_str))
    }
}

impl From<Vec<Vec<Value>>> for Grid {
    fn from(rows: Vec<Vec<Value>>) -> Self {
        Grid::from_rows(
            rows.into_iter()
                .map(|row| row.into_iter().map(cell_text).collect())
                .collect(),
        )
    }
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl From<Grid> for Vec<Vec<String>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

impl<S: AsRef<str>> FromIterator<Vec<S>> for Grid {
    fn from_iter<I: IntoIterator<Item = Vec<S>>>(iter: I) -> Self {
        Grid::from_rows(
            iter.into_iter()
                .map(|row| row.iter().map(|c| c.as_ref().to_string()).collect())
                .collect(),
        )
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} grid", self.n_rows(), self.n_cols)
    }
}
