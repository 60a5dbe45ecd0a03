use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The check that turned a candidate grid down, with the measured value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum Rejection {
    /// Fewer rows or columns than a table needs.
    TooSmall { n_rows: usize, n_cols: usize },
    /// Too few cells with text.
    Sparse { density: Decimal },
    /// A single column of long cells, i.e. a paragraph.
    SingleColumnProse { mean_len: Decimal },
    /// Very wide and very short.
    ExtremeAspect { n_rows: usize, n_cols: usize },
    /// More rows than any plausible table.
    TooManyRows { n_rows: usize },
    /// Cells full of running text.
    Wordy { words_per_cell: Decimal },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooSmall { n_rows, n_cols } => {
                write!(f, "too small ({n_rows}x{n_cols})")
            }
            Rejection::Sparse { density } => {
                write!(f, "too sparse ({} of cells filled)", density.round_dp(3))
            }
            Rejection::SingleColumnProse { mean_len } => write!(
                f,
                "single column of prose (mean length {})",
                mean_len.round_dp(1)
            ),
            Rejection::ExtremeAspect { n_rows, n_cols } => {
                write!(f, "extreme aspect ratio ({n_rows}x{n_cols})")
            }
            Rejection::TooManyRows { n_rows } => write!(f, "too many rows ({n_rows})"),
            Rejection::Wordy { words_per_cell } => write!(
                f,
                "paragraph-like ({} words per cell)",
                words_per_cell.round_dp(2)
            ),
        }
    }
}

/// Outcome of classifying one candidate grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Accepted => None,
            Verdict::Rejected(r) => Some(r),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "accepted"),
            Verdict::Rejected(r) => write!(f, "rejected: {r}"),
        }
    }
}
