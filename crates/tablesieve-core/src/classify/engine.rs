use crate::classify::outcome::{Rejection, Verdict};
use crate::config::ClassifierConfig;
use crate::grid::Grid;
use rust_decimal::Decimal;

/// Rule-based filter separating real tables from detector false positives:
/// ruled borders around prose, sparse decorative grids, and paragraphs
/// reflowed into cells.
#[derive(Debug, Clone, Default)]
pub struct TableClassifier {
    config: ClassifierConfig,
}

impl TableClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        TableClassifier { config }
    }

    /// Accept or reject a candidate grid.
    pub fn classify(&self, grid: &Grid) -> bool {
        self.evaluate(grid).is_accepted()
    }

    /// Run the checks in order and report the first one that fails.
    ///
    /// The shape check runs first: every later check divides by the row or
    /// cell count, which it guarantees to be non-zero.
    pub fn evaluate(&self, grid: &Grid) -> Verdict {
        let c = &self.config;
        let (n_rows, n_cols) = grid.shape();

        if n_rows < c.min_rows || n_cols < c.min_cols || n_rows == 0 || n_cols == 0 {
            return Verdict::Rejected(Rejection::TooSmall { n_rows, n_cols });
        }

        let n_cells = Decimal::from(n_rows * n_cols);

        let filled = grid.cells().filter(|cell| !cell.trim().is_empty()).count();
        let density = Decimal::from(filled) / n_cells;
        if density < c.min_density {
            return Verdict::Rejected(Rejection::Sparse { density });
        }

        if n_cols == 1 {
            let total_len: usize = grid.column(0).map(|cell| cell.chars().count()).sum();
            let mean_len = Decimal::from(total_len) / Decimal::from(n_rows);
            if mean_len > c.max_single_column_mean_len {
                return Verdict::Rejected(Rejection::SingleColumnProse { mean_len });
            }
        }

        if n_cols > c.wide_table_min_cols && n_rows < c.wide_table_min_rows {
            return Verdict::Rejected(Rejection::ExtremeAspect { n_rows, n_cols });
        }

        if n_rows > c.max_rows {
            return Verdict::Rejected(Rejection::TooManyRows { n_rows });
        }

        let words: usize = grid.cells().map(|cell| cell.split_whitespace().count()).sum();
        let words_per_cell = Decimal::from(words) / n_cells.max(Decimal::ONE);
        if words_per_cell > c.max_words_per_cell {
            return Verdict::Rejected(Rejection::Wordy { words_per_cell });
        }

        Verdict::Accepted
    }
}

/// Classify a grid with the default thresholds.
pub fn is_valid_table(grid: &Grid) -> bool {
    TableClassifier::default().classify(grid)
}
