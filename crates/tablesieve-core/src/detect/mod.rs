pub mod lattice;
pub mod stream;

use crate::extraction::{PageContent, Word};
use crate::grid::Grid;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use lattice::LatticeDetector;
pub use stream::StreamDetector;

/// Which detection heuristic produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Tables outlined by ruled borders.
    Lattice,
    /// Tables laid out with whitespace gaps between columns.
    Stream,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Lattice => write!(f, "lattice"),
            Strategy::Stream => write!(f, "stream"),
        }
    }
}

/// A table-locating heuristic. Implementations must not depend on each
/// other: the pipeline runs them independently over the same pages.
pub trait TableDetector {
    fn strategy(&self) -> Strategy;

    /// Candidate grids found on one page, in reading order.
    fn detect(&self, page: &PageContent) -> Vec<Grid>;
}

/// Join words into cell text: a space between words on the same text line,
/// a newline between lines. `strip` characters are then removed.
pub(crate) fn words_to_text(mut words: Vec<&Word>, line_tol: f32, strip: &str) -> String {
    words.sort_by(|a, b| a.bbox.y_min.total_cmp(&b.bbox.y_min));

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    for word in words {
        match lines.last_mut() {
            Some(line) if (word.bbox.y_min - line[0].bbox.y_min).abs() <= line_tol => {
                line.push(word)
            }
            _ => lines.push(vec![word]),
        }
    }

    let text = lines
        .into_iter()
        .map(|mut line| {
            line.sort_by(|a, b| a.bbox.x_min.total_cmp(&b.bbox.x_min));
            line.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n");

    strip_text(&text, strip)
}

/// Remove every character of `strip` from `text`.
pub(crate) fn strip_text(text: &str, strip: &str) -> String {
    if strip.is_empty() {
        return text.to_string();
    }
    text.chars().filter(|c| !strip.contains(*c)).collect()
}

/// Sort values and merge those within `tol` of the running cluster mean.
pub(crate) fn cluster_positions(mut values: Vec<f32>, tol: f32) -> Vec<f32> {
    values.sort_by(f32::total_cmp);
    let mut clusters: Vec<(f32, usize)> = Vec::new();
    for v in values {
        match clusters.last_mut() {
            Some((sum, count)) if (v - *sum / *count as f32).abs() <= tol => {
                *sum += v;
                *count += 1;
            }
            _ => clusters.push((v, 1)),
        }
    }
    clusters
        .into_iter()
        .map(|(sum, count)| sum / count as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::BBox;

    fn word(text: &str, x: f32, y: f32) -> Word {
        Word {
            text: text.into(),
            bbox: BBox::new(x, y, x + 10.0, y + 8.0),
        }
    }

    #[test]
    fn test_words_to_text_orders_lines() {
        let a = word("world", 40.0, 10.0);
        let b = word("hello", 10.0, 10.5);
        let c = word("again", 10.0, 22.0);
        let words = vec![&c, &a, &b];
        assert_eq!(words_to_text(words, 2.0, ""), "hello world\nagain");
    }

    #[test]
    fn test_strip_text_removes_newlines() {
        assert_eq!(strip_text("Total\nrevenue", "\n"), "Totalrevenue");
        assert_eq!(strip_text("a-b c", "- "), "abc");
        assert_eq!(strip_text("keep", ""), "keep");
    }

    #[test]
    fn test_cluster_positions() {
        let clusters = cluster_positions(vec![100.0, 10.0, 11.0, 50.5, 50.0, 9.0], 2.0);
        assert_eq!(clusters, vec![10.0, 50.25, 100.0]);
    }
}
