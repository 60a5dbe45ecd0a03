pub mod classify;
pub mod config;
pub mod detect;
pub mod error;
pub mod extraction;
pub mod grid;
pub mod model;
pub mod pages;
pub mod render;
pub mod report;

use classify::{TableClassifier, Verdict};
use config::PipelineConfig;
use detect::{LatticeDetector, StreamDetector, TableDetector};
use error::SieveError;
use extraction::{PageContent, PdfExtractor};
use model::ExtractedTable;
use pages::PageSelection;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

pub use classify::is_valid_table;
pub use grid::Grid;

/// Main API entry point: find the tables of a PDF.
///
/// Runs the ruled-border strategy over every selected page, then the
/// whitespace-gap strategy, keeping only candidates the validity filter
/// accepts. Tables found by both strategies appear twice.
pub fn extract_tables(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    pages: &PageSelection,
    config: &PipelineConfig,
) -> Result<Vec<ExtractedTable>, SieveError> {
    let selected: Vec<PageContent> = extractor
        .extract_pages(pdf_bytes)?
        .into_iter()
        .filter(|p| pages.contains(p.page_number))
        .collect();

    if selected.is_empty() {
        return Err(SieveError::NoPagesSelected);
    }

    info!(
        backend = extractor.backend_name(),
        pages = selected.len(),
        selection = %pages,
        "extracted page geometry"
    );

    let lattice = LatticeDetector::new(config.lattice.clone());
    let stream = StreamDetector::new(config.stream.clone());
    let detectors: [&dyn TableDetector; 2] = [&lattice, &stream];
    let classifier = TableClassifier::new(config.classifier.clone());

    Ok(filter_candidates(&selected, &detectors, &classifier))
}

/// Run each detector over all pages in turn and keep the accepted grids,
/// numbered in the order they were found.
pub fn filter_candidates(
    pages: &[PageContent],
    detectors: &[&dyn TableDetector],
    classifier: &TableClassifier,
) -> Vec<ExtractedTable> {
    let mut tables = Vec::new();

    for detector in detectors {
        let strategy = detector.strategy();
        let before = tables.len();
        let mut candidates = 0;

        for page in pages {
            for grid in detector.detect(page) {
                candidates += 1;
                match classifier.evaluate(&grid) {
                    Verdict::Accepted => {
                        let text = render::render_grid(&grid);
                        tables.push(ExtractedTable {
                            index: tables.len() + 1,
                            page_number: page.page_number,
                            strategy,
                            grid,
                            text,
                        });
                    }
                    Verdict::Rejected(reason) => {
                        debug!(
                            %strategy,
                            page = page.page_number,
                            shape = %grid,
                            %reason,
                            "rejected candidate"
                        );
                    }
                }
            }
        }

        info!(
            %strategy,
            candidates,
            accepted = tables.len() - before,
            "detection pass finished"
        );
    }

    tables
}

/// Read a PDF from disk, extract its tables and write the text report to
/// `sink`. Nothing is written if extraction fails.
pub fn process_pdf<W: Write>(
    input: &Path,
    extractor: &dyn PdfExtractor,
    pages: &PageSelection,
    config: &PipelineConfig,
    sink: &mut W,
) -> Result<Vec<ExtractedTable>, SieveError> {
    let pdf_bytes = std::fs::read(input)?;
    let tables = extract_tables(&pdf_bytes, extractor, pages, config)?;
    report::write_report(sink, &source_name(input), &tables)?;
    Ok(tables)
}

/// File name of `path` for report headers.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
