use std::path::{Path, PathBuf};
use tablesieve_core::error::SieveError;
use tablesieve_core::extraction::pdftotext::PdftotextExtractor;
use tablesieve_core::pages::PageSelection;

use crate::commands::resolve_config;
use crate::output;

pub fn run(
    input_file: PathBuf,
    pages: &str,
    config_file: Option<PathBuf>,
    out_dir: PathBuf,
    output_format: &str,
) -> Result<(), SieveError> {
    let selection: PageSelection = pages.parse()?;
    let config = resolve_config(config_file.as_deref())?;
    let extractor = PdftotextExtractor::new();

    eprintln!("Processing {} (pages: {})", input_file.display(), selection);

    // nothing is written until extraction succeeds
    let (extension, tables, contents) = match output_format {
        "json" => {
            let pdf_bytes = std::fs::read(&input_file)?;
            let tables =
                tablesieve_core::extract_tables(&pdf_bytes, &extractor, &selection, &config)?;
            let source = tablesieve_core::source_name(&input_file);
            let json = output::json::tables_to_string(&source, &tables)?;
            ("json", tables, json.into_bytes())
        }
        _ => {
            let mut buf = Vec::new();
            let tables = tablesieve_core::process_pdf(
                &input_file,
                &extractor,
                &selection,
                &config,
                &mut buf,
            )?;
            ("txt", tables, buf)
        }
    };

    std::fs::create_dir_all(&out_dir)?;
    let out_path = report_path(&input_file, &out_dir, extension);
    std::fs::write(&out_path, contents)?;

    eprintln!(
        "Extracted {} filtered table(s), written to {}",
        tables.len(),
        out_path.display()
    );
    Ok(())
}

/// `<out_dir>/<input stem>.<extension>`
fn report_path(input_file: &Path, out_dir: &Path, extension: &str) -> PathBuf {
    let stem = input_file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    out_dir.join(format!("{stem}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path_uses_input_stem() {
        assert_eq!(
            report_path(Path::new("docs/annual report.pdf"), Path::new("results"), "txt"),
            PathBuf::from("results/annual report.txt")
        );
        assert_eq!(
            report_path(Path::new("scan"), Path::new("out"), "json"),
            PathBuf::from("out/scan.json")
        );
    }
}
