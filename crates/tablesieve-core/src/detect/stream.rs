use crate::config::StreamConfig;
use crate::detect::{words_to_text, Strategy, TableDetector};
use crate::extraction::{PageContent, Word};
use crate::grid::Grid;

/// Finds tables laid out as aligned columns separated by whitespace.
#[derive(Debug, Clone, Default)]
pub struct StreamDetector {
    config: StreamConfig,
}

/// Words of one text row that sit closer together than `column_gap`.
#[derive(Debug)]
struct Segment<'a> {
    words: Vec<&'a Word>,
    x0: f32,
    x1: f32,
}

#[derive(Debug)]
struct TextRow<'a> {
    top: f32,
    bottom: f32,
    segments: Vec<Segment<'a>>,
}

impl TextRow<'_> {
    fn is_tabular(&self) -> bool {
        self.segments.len() >= 2
    }
}

impl StreamDetector {
    pub fn new(config: StreamConfig) -> Self {
        StreamDetector { config }
    }

    fn text_rows<'a>(&self, words: &'a [Word]) -> Vec<TextRow<'a>> {
        let mut sorted: Vec<&Word> = words.iter().collect();
        sorted.sort_by(|a, b| a.bbox.y_min.total_cmp(&b.bbox.y_min));

        let mut grouped: Vec<Vec<&Word>> = Vec::new();
        for word in sorted {
            match grouped.last_mut() {
                Some(row) if (word.bbox.y_min - row[0].bbox.y_min).abs() <= self.config.row_tol => {
                    row.push(word)
                }
                _ => grouped.push(vec![word]),
            }
        }

        grouped
            .into_iter()
            .map(|mut row| {
                row.sort_by(|a, b| a.bbox.x_min.total_cmp(&b.bbox.x_min));
                let top = row.iter().map(|w| w.bbox.y_min).fold(f32::INFINITY, f32::min);
                let bottom = row
                    .iter()
                    .map(|w| w.bbox.y_max)
                    .fold(f32::NEG_INFINITY, f32::max);

                let mut segments: Vec<Segment> = Vec::new();
                for word in row {
                    match segments.last_mut() {
                        Some(seg) if word.bbox.x_min - seg.x1 <= self.config.column_gap => {
                            seg.x1 = seg.x1.max(word.bbox.x_max);
                            seg.words.push(word);
                        }
                        _ => segments.push(Segment {
                            words: vec![word],
                            x0: word.bbox.x_min,
                            x1: word.bbox.x_max,
                        }),
                    }
                }

                TextRow {
                    top,
                    bottom,
                    segments,
                }
            })
            .collect()
    }

    /// Split text rows into runs of tabular rows no more than `edge_tol`
    /// apart. Non-tabular rows are kept only between two tabular rows.
    fn regions<'r, 'a>(&self, rows: &'r [TextRow<'a>]) -> Vec<Vec<&'r TextRow<'a>>> {
        let mut regions = Vec::new();
        let mut current: Vec<&TextRow> = Vec::new();
        let mut pending: Vec<&TextRow> = Vec::new();
        let mut last_bottom: Option<f32> = None;

        for row in rows {
            if row.is_tabular() {
                match last_bottom {
                    Some(bottom) if row.top - bottom <= self.config.edge_tol => {
                        current.append(&mut pending);
                    }
                    _ => {
                        if !current.is_empty() {
                            regions.push(std::mem::take(&mut current));
                        }
                        pending.clear();
                    }
                }
                current.push(row);
                last_bottom = Some(row.bottom);
            } else if !current.is_empty() {
                pending.push(row);
            }
        }

        if !current.is_empty() {
            regions.push(current);
        }
        regions
    }

    fn fill(&self, region: &[&TextRow]) -> Grid {
        let columns = column_spans(region);
        let rows = region
            .iter()
            .map(|row| {
                let mut cells: Vec<Vec<&Word>> = vec![Vec::new(); columns.len()];
                for seg in &row.segments {
                    if let Some(col) = best_column(&columns, seg.x0, seg.x1) {
                        cells[col].extend(seg.words.iter().copied());
                    }
                }
                cells
                    .into_iter()
                    .map(|words| words_to_text(words, self.config.row_tol, &self.config.strip_text))
                    .collect()
            })
            .collect();
        Grid::from_rows(rows)
    }
}

impl TableDetector for StreamDetector {
    fn strategy(&self) -> Strategy {
        Strategy::Stream
    }

    fn detect(&self, page: &PageContent) -> Vec<Grid> {
        let rows = self.text_rows(&page.words);
        self.regions(&rows)
            .iter()
            .map(|region| self.fill(region))
            .collect()
    }
}

/// Union of the segment extents of the region's tabular rows.
fn column_spans(region: &[&TextRow]) -> Vec<(f32, f32)> {
    let mut spans: Vec<(f32, f32)> = region
        .iter()
        .filter(|row| row.is_tabular())
        .flat_map(|row| row.segments.iter().map(|s| (s.x0, s.x1)))
        .collect();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut merged: Vec<(f32, f32)> = Vec::new();
    for (x0, x1) in spans {
        match merged.last_mut() {
            Some(last) if x0 <= last.1 => last.1 = last.1.max(x1),
            _ => merged.push((x0, x1)),
        }
    }
    merged
}

/// Column with the largest horizontal overlap, else the nearest center.
fn best_column(columns: &[(f32, f32)], x0: f32, x1: f32) -> Option<usize> {
    let overlap = |&(c0, c1): &(f32, f32)| x1.min(c1) - x0.max(c0);
    let best = columns
        .iter()
        .enumerate()
        .max_by(|a, b| overlap(a.1).total_cmp(&overlap(b.1)))?;
    if overlap(best.1) > 0.0 {
        return Some(best.0);
    }

    let center = (x0 + x1) / 2.0;
    columns
        .iter()
        .enumerate()
        .min_by(|a, b| {
            let da = (center - (a.1 .0 + a.1 .1) / 2.0).abs();
            let db = (center - (b.1 .0 + b.1 .1) / 2.0).abs();
            da.total_cmp(&db)
        })
        .map(|(i, _)| i)
}
