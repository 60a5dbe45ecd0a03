use serde_json::{json, Value};
use tablesieve_core::classify::Verdict;
use tablesieve_core::error::SieveError;
use tablesieve_core::model::ExtractedTable;
use tablesieve_core::Grid;

pub fn tables_to_string(source: &str, tables: &[ExtractedTable]) -> Result<String, SieveError> {
    let doc = json!({
        "source": source,
        "table_count": tables.len(),
        "tables": tables,
    });
    Ok(serde_json::to_string_pretty(&doc)?)
}

pub fn print_verdicts(grids: &[Grid], verdicts: &[Verdict]) -> Result<(), SieveError> {
    let json = serde_json::to_string_pretty(&verdicts_to_value(grids, verdicts))?;
    println!("{json}");
    Ok(())
}

fn verdicts_to_value(grids: &[Grid], verdicts: &[Verdict]) -> Value {
    grids
        .iter()
        .zip(verdicts)
        .enumerate()
        .map(|(i, (grid, verdict))| {
            json!({
                "index": i + 1,
                "n_rows": grid.n_rows(),
                "n_cols": grid.n_cols(),
                "accepted": verdict.is_accepted(),
                "reason": verdict.rejection().map(ToString::to_string),
                "verdict": verdict,
            })
        })
        .collect()
}
