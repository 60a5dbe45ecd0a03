use crate::grid::Grid;

/// Render a grid as a labelled text block: a header of column ordinals, then
/// one line per row prefixed by its ordinal, columns right-aligned and
/// separated by two spaces.
///
/// Newlines inside a cell are shown as `\n` so each row stays on one line.
pub fn render_grid(grid: &Grid) -> String {
    let cells: Vec<Vec<String>> = grid
        .rows()
        .iter()
        .map(|row| row.iter().map(|c| c.replace('\n', "\\n")).collect())
        .collect();

    let headers: Vec<String> = (0..grid.n_cols()).map(|i| i.to_string()).collect();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            cells
                .iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();
    let label_width = grid.n_rows().saturating_sub(1).to_string().len();

    let mut out = String::new();
    out.push_str(&" ".repeat(label_width));
    for (header, width) in headers.iter().zip(&widths) {
        out.push_str("  ");
        out.push_str(&pad_left(header, *width));
    }
    out.push('\n');

    for (i, row) in cells.iter().enumerate() {
        out.push_str(&format!("{:<label_width$}", i));
        for (cell, width) in row.iter().zip(&widths) {
            out.push_str("  ");
            out.push_str(&pad_left(cell, *width));
        }
        out.push('\n');
    }

    out
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_aligns_columns() {
        let grid: Grid = vec![vec!["Item", "Cost"], vec!["Bolts", "12"]]
            .into_iter()
            .collect();
        assert_eq!(
            render_grid(&grid),
            "       0     1\n0   Item  Cost\n1  Bolts    12\n"
        );
    }

    #[test]
    fn test_render_escapes_newlines_and_pads_labels() {
        let mut rows = vec![vec!["a".to_string(), "b".to_string()]; 11];
        rows[0][0] = "x\ny".into();
        let out = render_grid(&Grid::from_rows(rows));
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "       0  1");
        assert_eq!(lines[1], "0   x\\ny  b");
        assert_eq!(lines[11], "10     a  b");
    }
}
