//! Integration tests for the extract_tables() / process_pdf() pipeline.
//!
//! Uses a MockExtractor that returns pre-built PageContent without
//! invoking pdftotext, so these tests run without poppler-utils.

use std::io::Write;

use tablesieve_core::config::{ClassifierConfig, PipelineConfig};
use tablesieve_core::detect::Strategy;
use tablesieve_core::error::SieveError;
use tablesieve_core::extraction::{BBox, PageContent, PdfExtractor, Ruling, Word};
use tablesieve_core::pages::PageSelection;
use tablesieve_core::{extract_tables, process_pdf};

struct MockExtractor {
    pages: Vec<PageContent>,
}

impl PdfExtractor for MockExtractor {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SieveError> {
        Ok(self.pages.clone())
    }

    fn backend_name(&self) -> &str {
        "mock"
    }
}

struct MissingBackend;

impl PdfExtractor for MissingBackend {
    fn extract_pages(&self, _pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SieveError> {
        Err(SieveError::PdftotextNotFound)
    }

    fn backend_name(&self) -> &str {
        "missing"
    }
}

/// Words are 5pt per character and 8pt tall, one word per token.
fn text_line(y: f32, cells: &[(f32, &str)]) -> Vec<Word> {
    let mut words = Vec::new();
    for &(x, text) in cells {
        let mut cursor = x;
        for token in text.split_whitespace() {
            let width = 5.0 * token.chars().count() as f32;
            words.push(Word {
                text: token.into(),
                bbox: BBox::new(cursor, y, cursor + width, y + 8.0),
            });
            cursor += width + 3.0;
        }
    }
    words
}

fn ruled(rows: &[f32], cols: &[f32]) -> Vec<Ruling> {
    let (x0, x1) = (cols[0], cols[cols.len() - 1]);
    let (y0, y1) = (rows[0], rows[rows.len() - 1]);
    rows.iter()
        .map(|&y| Ruling::horizontal(y, x0, x1))
        .chain(cols.iter().map(|&x| Ruling::vertical(x, y0, y1)))
        .collect()
}

fn page(number: usize, lines: Vec<Vec<Word>>, rulings: Vec<Ruling>) -> PageContent {
    PageContent {
        page_number: number,
        width: 612.0,
        height: 792.0,
        words: lines.into_iter().flatten().collect(),
        rulings,
    }
}

/// A bordered 3x2 table. Its columns are also whitespace-separated, so the
/// stream strategy finds it too.
fn ruled_table_page(number: usize) -> PageContent {
    page(
        number,
        vec![
            text_line(106.0, &[(60.0, "Item"), (160.0, "Cost")]),
            text_line(126.0, &[(60.0, "Bolts"), (160.0, "12")]),
            text_line(146.0, &[(60.0, "Nuts"), (160.0, "7")]),
        ],
        ruled(&[100.0, 120.0, 140.0, 160.0], &[50.0, 150.0, 250.0]),
    )
}

/// Prose followed by an unruled 3x3 table.
fn whitespace_table_page(number: usize) -> PageContent {
    page(
        number,
        vec![
            text_line(50.0, &[(72.0, "Quarterly results were strong across regions")]),
            text_line(100.0, &[(72.0, "Region"), (200.0, "Sales"), (300.0, "Growth")]),
            text_line(112.0, &[(72.0, "North"), (200.0, "1,200"), (300.0, "4%")]),
            text_line(124.0, &[(72.0, "South"), (200.0, "950"), (300.0, "-2%")]),
        ],
        vec![],
    )
}

fn two_page_document() -> MockExtractor {
    MockExtractor {
        pages: vec![ruled_table_page(1), whitespace_table_page(2)],
    }
}

// ---------------------------------------------------------------------------
// Strategy ordering and numbering
// ---------------------------------------------------------------------------
#[test]
fn lattice_tables_come_before_stream_tables() {
    let tables = extract_tables(
        &[],
        &two_page_document(),
        &PageSelection::all(),
        &PipelineConfig::default(),
    )
    .unwrap();

    let summary: Vec<(usize, usize, Strategy)> = tables
        .iter()
        .map(|t| (t.index, t.page_number, t.strategy))
        .collect();
    assert_eq!(
        summary,
        vec![
            (1, 1, Strategy::Lattice),
            (2, 1, Strategy::Stream),
            (3, 2, Strategy::Stream),
        ]
    );
    assert_eq!(tables[2].grid.rows()[1], vec!["North", "1,200", "4%"]);
}

#[test]
fn table_found_by_both_strategies_is_kept_twice() {
    let extractor = MockExtractor {
        pages: vec![ruled_table_page(1)],
    };
    let tables = extract_tables(
        &[],
        &extractor,
        &PageSelection::all(),
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0].grid, tables[1].grid);
    assert_eq!(tables[0].text, tables[1].text);
    assert_ne!(tables[0].strategy, tables[1].strategy);
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------
#[test]
fn prose_only_document_yields_no_tables() {
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            vec![
                text_line(100.0, &[(72.0, "This is a paragraph of ordinary text")]),
                text_line(112.0, &[(72.0, "that continues on a second line")]),
            ],
            vec![],
        )],
    };
    let tables = extract_tables(
        &[],
        &extractor,
        &PageSelection::all(),
        &PipelineConfig::default(),
    )
    .unwrap();
    assert!(tables.is_empty());
}

#[test]
fn sparse_candidates_are_dropped() {
    // every row uses its own pair of columns: a 3x6 grid with 6 filled cells
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            vec![
                text_line(100.0, &[(72.0, "a"), (150.0, "b")]),
                text_line(112.0, &[(230.0, "c"), (310.0, "d")]),
                text_line(124.0, &[(390.0, "e"), (470.0, "f")]),
            ],
            vec![],
        )],
    };
    let config = PipelineConfig::default();
    assert!(extract_tables(&[], &extractor, &PageSelection::all(), &config)
        .unwrap()
        .is_empty());

    let lenient = PipelineConfig {
        classifier: ClassifierConfig {
            min_density: "0.3".parse().unwrap(),
            ..ClassifierConfig::default()
        },
        ..PipelineConfig::default()
    };
    let tables = extract_tables(&[], &extractor, &PageSelection::all(), &lenient).unwrap();
    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].grid.shape(), (3, 6));
}

#[test]
fn wordy_ruled_box_is_rejected() {
    let sentence = "this box holds a long paragraph of running text that should not count";
    let extractor = MockExtractor {
        pages: vec![page(
            1,
            vec![
                text_line(103.0, &[(60.0, sentence)]),
                text_line(111.0, &[(60.0, sentence)]),
                text_line(123.0, &[(60.0, sentence)]),
                text_line(131.0, &[(60.0, sentence)]),
            ],
            ruled(&[100.0, 120.0, 140.0], &[50.0, 450.0, 560.0]),
        )],
    };
    let tables = extract_tables(
        &[],
        &extractor,
        &PageSelection::all(),
        &PipelineConfig::default(),
    )
    .unwrap();
    assert!(tables.is_empty());
}

// ---------------------------------------------------------------------------
// Page selection
// ---------------------------------------------------------------------------
#[test]
fn page_selection_limits_processed_pages() {
    let selection: PageSelection = "2-end".parse().unwrap();
    let tables = extract_tables(
        &[],
        &two_page_document(),
        &selection,
        &PipelineConfig::default(),
    )
    .unwrap();

    assert_eq!(tables.len(), 1);
    assert_eq!(tables[0].index, 1);
    assert_eq!(tables[0].page_number, 2);
}

#[test]
fn selection_outside_document_is_an_error() {
    let selection: PageSelection = "5-7".parse().unwrap();
    let err = extract_tables(
        &[],
        &two_page_document(),
        &selection,
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SieveError::NoPagesSelected));
}

#[test]
fn extractor_errors_propagate() {
    let err = extract_tables(
        &[],
        &MissingBackend,
        &PageSelection::all(),
        &PipelineConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, SieveError::PdftotextNotFound));
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------
#[test]
fn process_pdf_writes_report() {
    let mut pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    pdf.write_all(b"%PDF-1.4").unwrap();
    let name = pdf.path().file_name().unwrap().to_string_lossy().into_owned();

    let extractor = MockExtractor {
        pages: vec![ruled_table_page(1)],
    };
    let mut out = Vec::new();
    let tables = process_pdf(
        pdf.path(),
        &extractor,
        &PageSelection::all(),
        &PipelineConfig::default(),
        &mut out,
    )
    .unwrap();
    assert_eq!(tables.len(), 2);

    let report = String::from_utf8(out).unwrap();
    let separator = "-".repeat(80);
    let table_block = "       0     1\n0   Item  Cost\n1  Bolts    12\n2   Nuts     7\n";
    assert_eq!(
        report,
        format!(
            "Extracted 2 filtered tables from {name}\n\n\
             Table 1:\n{table_block}{separator}\n\
             Table 2:\n{table_block}{separator}\n"
        )
    );
}

#[test]
fn process_pdf_writes_nothing_on_failure() {
    let mut pdf = tempfile::NamedTempFile::new().unwrap();
    pdf.write_all(b"%PDF-1.4").unwrap();

    let mut out = Vec::new();
    let err = process_pdf(
        pdf.path(),
        &MissingBackend,
        &PageSelection::all(),
        &PipelineConfig::default(),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, SieveError::PdftotextNotFound));
    assert!(out.is_empty());
}

#[test]
fn missing_input_file_is_io_error() {
    let mut out = Vec::new();
    let err = process_pdf(
        std::path::Path::new("/nonexistent/input.pdf"),
        &two_page_document(),
        &PageSelection::all(),
        &PipelineConfig::default(),
        &mut out,
    )
    .unwrap_err();
    assert!(matches!(err, SieveError::Io(_)));
}
