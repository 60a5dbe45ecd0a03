use crate::config::LatticeConfig;
use crate::detect::{cluster_positions, words_to_text, Strategy, TableDetector};
use crate::extraction::{Orientation, PageContent, Ruling, Word};
use crate::grid::Grid;

/// Finds tables whose cells are outlined by drawn lines.
#[derive(Debug, Clone, Default)]
pub struct LatticeDetector {
    config: LatticeConfig,
}

/// Cell boundaries of one ruled table, sorted ascending.
#[derive(Debug, Clone, PartialEq)]
struct Region {
    rows: Vec<f32>,
    cols: Vec<f32>,
}

impl LatticeDetector {
    pub fn new(config: LatticeConfig) -> Self {
        LatticeDetector { config }
    }

    /// Merged rulings long enough to count at this `line_scale`.
    fn significant_rulings(&self, page: &PageContent) -> Vec<Ruling> {
        let c = &self.config;
        let (horizontal, vertical): (Vec<Ruling>, Vec<Ruling>) =
            page.rulings.iter().copied().partition(|r| r.is_horizontal());

        let min_h = page.width / c.line_scale;
        let min_v = page.height / c.line_scale;

        let mut out: Vec<Ruling> = merge_collinear(horizontal, c.line_tol, c.joint_tol)
            .into_iter()
            .filter(|r| r.length() >= min_h)
            .collect();
        out.extend(
            merge_collinear(vertical, c.line_tol, c.joint_tol)
                .into_iter()
                .filter(|r| r.length() >= min_v),
        );
        out
    }

    fn regions(&self, rulings: &[Ruling]) -> Vec<Region> {
        let tol = self.config.joint_tol;
        let mut sets = DisjointSet::new(rulings.len());
        for (i, a) in rulings.iter().enumerate() {
            for (j, b) in rulings.iter().enumerate().skip(i + 1) {
                if intersects(a, b, tol) {
                    sets.union(i, j);
                }
            }
        }

        let mut groups: Vec<Vec<&Ruling>> = Vec::new();
        let mut group_of_root = std::collections::HashMap::new();
        for (i, ruling) in rulings.iter().enumerate() {
            let root = sets.find(i);
            let idx = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[idx].push(ruling);
        }

        let mut regions: Vec<Region> = groups
            .into_iter()
            .filter_map(|group| {
                let rows = cluster_positions(
                    group
                        .iter()
                        .filter(|r| r.is_horizontal())
                        .map(|r| r.position)
                        .collect(),
                    self.config.line_tol,
                );
                let cols = cluster_positions(
                    group
                        .iter()
                        .filter(|r| !r.is_horizontal())
                        .map(|r| r.position)
                        .collect(),
                    self.config.line_tol,
                );
                (rows.len() >= 2 && cols.len() >= 2).then_some(Region { rows, cols })
            })
            .collect();

        regions.sort_by(|a, b| {
            a.rows[0]
                .total_cmp(&b.rows[0])
                .then(a.cols[0].total_cmp(&b.cols[0]))
        });
        regions
    }

    fn fill(&self, region: &Region, words: &[Word]) -> Grid {
        let n_rows = region.rows.len() - 1;
        let n_cols = region.cols.len() - 1;
        let mut cells: Vec<Vec<Vec<&Word>>> = vec![vec![Vec::new(); n_cols]; n_rows];

        for word in words {
            let (cx, cy) = (word.bbox.center_x(), word.bbox.center_y());
            if let (Some(row), Some(col)) = (slot(&region.rows, cy), slot(&region.cols, cx)) {
                cells[row][col].push(word);
            }
        }

        Grid::from_rows(
            cells
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|cell| {
                            words_to_text(cell, self.config.line_tol, &self.config.strip_text)
                        })
                        .collect()
                })
                .collect(),
        )
    }
}

impl TableDetector for LatticeDetector {
    fn strategy(&self) -> Strategy {
        Strategy::Lattice
    }

    fn detect(&self, page: &PageContent) -> Vec<Grid> {
        let rulings = self.significant_rulings(page);
        self.regions(&rulings)
            .iter()
            .map(|region| self.fill(region, &page.words))
            .collect()
    }
}

/// Index of the interval of `bounds` holding `v`, if `v` is inside them.
fn slot(bounds: &[f32], v: f32) -> Option<usize> {
    let (first, last) = (*bounds.first()?, *bounds.last()?);
    if v < first || v > last {
        return None;
    }
    let idx = bounds.partition_point(|&b| b <= v);
    Some(idx.saturating_sub(1).min(bounds.len() - 2))
}

fn intersects(a: &Ruling, b: &Ruling, tol: f32) -> bool {
    let (h, v) = match (a.orientation, b.orientation) {
        (Orientation::Horizontal, Orientation::Vertical) => (a, b),
        (Orientation::Vertical, Orientation::Horizontal) => (b, a),
        _ => return false,
    };
    v.position >= h.start - tol
        && v.position <= h.end + tol
        && h.position >= v.start - tol
        && h.position <= v.end + tol
}

/// Merge rulings of one orientation that lie on the same line and touch.
fn merge_collinear(mut rulings: Vec<Ruling>, line_tol: f32, joint_tol: f32) -> Vec<Ruling> {
    rulings.sort_by(|a, b| a.position.total_cmp(&b.position));

    let mut lines: Vec<Vec<Ruling>> = Vec::new();
    for r in rulings {
        match lines.last_mut() {
            Some(line) if (r.position - line[0].position).abs() <= line_tol => line.push(r),
            _ => lines.push(vec![r]),
        }
    }

    let mut merged = Vec::new();
    for mut line in lines {
        let orientation = line[0].orientation;
        let position = line.iter().map(|r| r.position).sum::<f32>() / line.len() as f32;
        line.sort_by(|a, b| a.start.total_cmp(&b.start));

        let mut span: Option<(f32, f32)> = None;
        for r in line {
            span = match span {
                Some((start, end)) if r.start <= end + joint_tol => Some((start, end.max(r.end))),
                Some((start, end)) => {
                    merged.push(Ruling {
                        orientation,
                        position,
                        start,
                        end,
                    });
                    Some((r.start, r.end))
                }
                None => Some((r.start, r.end)),
            };
        }
        if let Some((start, end)) = span {
            merged.push(Ruling {
                orientation,
                position,
                start,
                end,
            });
        }
    }
    merged
}

struct DisjointSet {
    parent: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        DisjointSet {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            self.parent[rb] = ra;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::BBox;

    fn word(text: &str, x: f32, y: f32) -> Word {
        Word {
            text: text.into(),
            bbox: BBox::new(x, y, x + 20.0, y + 8.0),
        }
    }

    /// Full grid of rulings over the given boundaries.
    fn ruled(rows: &[f32], cols: &[f32]) -> Vec<Ruling> {
        let (x0, x1) = (cols[0], cols[cols.len() - 1]);
        let (y0, y1) = (rows[0], rows[rows.len() - 1]);
        rows.iter()
            .map(|&y| Ruling::horizontal(y, x0, x1))
            .chain(cols.iter().map(|&x| Ruling::vertical(x, y0, y1)))
            .collect()
    }

    fn page(rulings: Vec<Ruling>, words: Vec<Word>) -> PageContent {
        PageContent {
            page_number: 1,
            width: 612.0,
            height: 792.0,
            words,
            rulings,
        }
    }

    #[test]
    fn test_ruled_grid_is_filled() {
        let p = page(
            ruled(&[100.0, 120.0, 140.0, 160.0], &[50.0, 150.0, 250.0]),
            vec![
                word("Item", 60.0, 106.0),
                word("Cost", 160.0, 106.0),
                word("Bolts", 60.0, 126.0),
                word("12", 160.0, 126.0),
                word("Nuts", 60.0, 146.0),
                word("Outside", 400.0, 400.0),
            ],
        );
        let grids = LatticeDetector::default().detect(&p);
        assert_eq!(grids.len(), 1);
        let g = &grids[0];
        assert_eq!(g.shape(), (3, 2));
        assert_eq!(g.rows()[0], vec!["Item", "Cost"]);
        assert_eq!(g.rows()[1], vec!["Bolts", "12"]);
        assert_eq!(g.rows()[2], vec!["Nuts", ""]);
    }

    #[test]
    fn test_multiline_cell_is_stripped() {
        let p = page(
            ruled(&[100.0, 140.0, 160.0], &[50.0, 150.0, 250.0]),
            vec![
                word("Net", 60.0, 104.0),
                word("income", 60.0, 118.0),
                word("Q1", 160.0, 110.0),
                word("5", 60.0, 146.0),
                word("6", 160.0, 146.0),
            ],
        );
        let grids = LatticeDetector::default().detect(&p);
        assert_eq!(grids[0].rows()[0], vec!["Netincome", "Q1"]);

        let keep_newlines = LatticeDetector::new(LatticeConfig {
            strip_text: String::new(),
            ..LatticeConfig::default()
        });
        assert_eq!(keep_newlines.detect(&p)[0].rows()[0][0], "Net\nincome");
    }

    #[test]
    fn test_short_rulings_ignored() {
        // 612 / 40 = 15.3: a 10pt box is too small to be a table border
        let p = page(ruled(&[100.0, 110.0], &[50.0, 60.0]), vec![]);
        assert!(LatticeDetector::default().detect(&p).is_empty());

        let sensitive = LatticeDetector::new(LatticeConfig {
            line_scale: 100.0,
            ..LatticeConfig::default()
        });
        assert_eq!(sensitive.detect(&p).len(), 1);
    }

    #[test]
    fn test_segmented_borders_are_merged() {
        // every cell drawn as its own rectangle
        let mut rulings = Vec::new();
        for (y0, y1) in [(100.0, 120.0), (120.0, 140.0)] {
            for (x0, x1) in [(50.0, 150.0), (150.0, 250.0)] {
                rulings.push(Ruling::horizontal(y0, x0, x1));
                rulings.push(Ruling::horizontal(y1, x0, x1));
                rulings.push(Ruling::vertical(x0, y0, y1));
                rulings.push(Ruling::vertical(x1, y0, y1));
            }
        }
        let grids = LatticeDetector::default().detect(&page(rulings, vec![]));
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].shape(), (2, 2));
    }

    #[test]
    fn test_separate_tables_in_reading_order() {
        let mut rulings = ruled(&[500.0, 520.0, 540.0], &[50.0, 150.0, 250.0]);
        rulings.extend(ruled(&[100.0, 120.0, 140.0], &[50.0, 150.0, 250.0, 350.0]));
        let grids = LatticeDetector::default().detect(&page(rulings, vec![]));
        assert_eq!(grids.len(), 2);
        assert_eq!(grids[0].shape(), (2, 3));
        assert_eq!(grids[1].shape(), (2, 2));
    }

    #[test]
    fn test_lone_box_border_is_a_one_cell_candidate() {
        let p = page(ruled(&[100.0, 300.0], &[50.0, 550.0]), vec![word("Note", 60.0, 150.0)]);
        let grids = LatticeDetector::default().detect(&p);
        assert_eq!(grids.len(), 1);
        assert_eq!(grids[0].shape(), (1, 1));
    }

    #[test]
    fn test_slot() {
        let bounds = [10.0, 20.0, 30.0];
        assert_eq!(slot(&bounds, 5.0), None);
        assert_eq!(slot(&bounds, 15.0), Some(0));
        assert_eq!(slot(&bounds, 20.0), Some(1));
        assert_eq!(slot(&bounds, 30.0), Some(1));
        assert_eq!(slot(&bounds, 31.0), None);
    }
}
