use crate::detect::Strategy;
use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// A candidate grid that passed the validity filter, ready for output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTable {
    /// 1-based position in the result collection.
    pub index: usize,
    /// 1-based page the table was found on.
    pub page_number: usize,
    pub strategy: Strategy,
    pub grid: Grid,
    /// Plain-text rendering of `grid`.
    pub text: String,
}
