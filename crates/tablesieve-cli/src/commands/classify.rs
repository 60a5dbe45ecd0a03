use std::path::PathBuf;
use tablesieve_core::classify::{TableClassifier, Verdict};
use tablesieve_core::error::SieveError;
use tablesieve_core::Grid;

use crate::commands::resolve_config;
use crate::output;

pub fn run(
    input_file: PathBuf,
    config_file: Option<PathBuf>,
    output_format: &str,
) -> Result<(), SieveError> {
    let config = resolve_config(config_file.as_deref())?;
    let classifier = TableClassifier::new(config.classifier);

    let json_bytes = std::fs::read(&input_file)?;
    let grids: Vec<Grid> = serde_json::from_slice(&json_bytes)?;
    let verdicts: Vec<Verdict> = grids.iter().map(|g| classifier.evaluate(g)).collect();

    match output_format {
        "json" => output::json::print_verdicts(&grids, &verdicts)?,
        _ => output::table::print_verdicts(&grids, &verdicts),
    }

    Ok(())
}
