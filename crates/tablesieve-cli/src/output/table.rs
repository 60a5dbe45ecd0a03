use tablesieve_core::classify::Verdict;
use tablesieve_core::Grid;

pub fn print_verdicts(grids: &[Grid], verdicts: &[Verdict]) {
    print!("{}", format_verdicts(grids, verdicts));
}

pub fn format_verdicts(grids: &[Grid], verdicts: &[Verdict]) -> String {
    let shapes: Vec<String> = grids
        .iter()
        .map(|g| format!("{}x{}", g.n_rows(), g.n_cols()))
        .collect();
    let shape_width = shapes.iter().map(String::len).max().unwrap_or(0);
    let index_width = grids.len().to_string().len();

    let mut out = String::new();
    for (i, (shape, verdict)) in shapes.iter().zip(verdicts).enumerate() {
        out.push_str(&format!(
            "  #{:<index_width$}  {:>shape_width$}  {}\n",
            i + 1,
            shape,
            verdict
        ));
    }

    let accepted = verdicts.iter().filter(|v| v.is_accepted()).count();
    out.push_str(&format!(
        "\n{} of {} grid(s) accepted\n",
        accepted,
        verdicts.len()
    ));
    out
}
