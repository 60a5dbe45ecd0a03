use std::path::Path;
use tablesieve_core::config::{load_config, PipelineConfig};
use tablesieve_core::error::SieveError;

pub fn show() -> Result<(), SieveError> {
    let json = serde_json::to_string_pretty(&PipelineConfig::default())?;
    println!("{json}");
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), SieveError> {
    let config = load_config(file)?;
    let c = &config.classifier;

    println!("Configuration '{}' is valid.", file.display());
    println!(
        "  Classifier: at least {}x{} cells, density >= {}, at most {} rows, <= {} words per cell",
        c.min_rows, c.min_cols, c.min_density, c.max_rows, c.max_words_per_cell
    );
    println!(
        "  Lattice: line_scale {}, line_tol {}, joint_tol {}",
        config.lattice.line_scale, config.lattice.line_tol, config.lattice.joint_tol
    );
    println!(
        "  Stream: edge_tol {}, row_tol {}, column_gap {}",
        config.stream.edge_tol, config.stream.row_tol, config.stream.column_gap
    );

    // Settings that load fine but make the filter behave oddly.
    let mut warnings = Vec::new();
    if c.max_rows < c.min_rows {
        warnings.push(format!(
            "max_rows ({}) is below min_rows ({}): every grid will be rejected",
            c.max_rows, c.min_rows
        ));
    }
    if c.min_cols > 1 {
        warnings.push(format!(
            "min_cols is {}: the single-column prose check never runs",
            c.min_cols
        ));
    }
    if c.wide_table_min_rows <= c.min_rows {
        warnings.push(format!(
            "wide_table_min_rows ({}) does not exceed min_rows ({}): the aspect check never rejects",
            c.wide_table_min_rows, c.min_rows
        ));
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
