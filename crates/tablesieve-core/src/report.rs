use crate::model::ExtractedTable;
use std::io::{self, Write};

/// Width of the line written after each table.
pub const SEPARATOR_WIDTH: usize = 80;

/// Write the plain-text report: a count header, then every table with its
/// label, rendered text and a separator line.
pub fn write_report<W: Write>(
    sink: &mut W,
    source_name: &str,
    tables: &[ExtractedTable],
) -> io::Result<()> {
    writeln!(
        sink,
        "Extracted {} filtered tables from {}\n",
        tables.len(),
        source_name
    )?;
    for table in tables {
        writeln!(sink, "Table {}:", table.index)?;
        writeln!(sink, "{}", table.text.trim_end())?;
        writeln!(sink, "{}", "-".repeat(SEPARATOR_WIDTH))?;
    }
    Ok(())
}
