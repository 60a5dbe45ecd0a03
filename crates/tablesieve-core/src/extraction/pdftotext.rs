use crate::error::SieveError;
use crate::extraction::{rulings, BBox, PageContent, PdfExtractor, Word};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Write;
use std::process::Command;
use tracing::debug;

/// PDF extraction backend using pdftotext (from poppler-utils) for words
/// and lopdf for the rulings drawn in the page content streams.
///
/// Uses `pdftotext -bbox-layout` to get every word with its bounding box.
pub struct PdftotextExtractor;

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SieveError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| SieveError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| SieveError::Extraction(e.to_string()))?;

        let output = Command::new("pdftotext")
            .arg("-bbox-layout")
            .arg(tmpfile.path())
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    SieveError::PdftotextNotFound
                } else {
                    SieveError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            return Err(SieveError::PdftotextFailed { code, stderr });
        }

        let xml = String::from_utf8_lossy(&output.stdout);
        let mut pages = parse_bbox_xml(&xml)?;

        let document = lopdf::Document::load_mem(pdf_bytes)?;
        let mut page_rulings = rulings::extract_rulings(&document);
        for page in &mut pages {
            if let Some(found) = page_rulings.remove(&page.page_number) {
                page.rulings = found;
            }
            debug!(
                page = page.page_number,
                words = page.words.len(),
                rulings = page.rulings.len(),
                "extracted page geometry"
            );
        }

        Ok(pages)
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

/// Parse `pdftotext -bbox-layout` XHTML into pages of positioned words.
///
/// Pages are numbered in document order starting at 1.
pub fn parse_bbox_xml(xml: &str) -> Result<Vec<PageContent>, SieveError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    reader.config_mut().check_end_names = false;

    let mut pages: Vec<PageContent> = Vec::new();
    let mut current_word: Option<BBox> = None;
    let mut word_text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"page" => pages.push(new_page(&e, pages.len() + 1)),
                b"word" => {
                    current_word = parse_bbox(&e);
                    word_text.clear();
                }
                _ => {}
            },
            Ok(Event::Empty(e)) if e.name().as_ref() == b"page" => {
                pages.push(new_page(&e, pages.len() + 1));
            }
            Ok(Event::Text(t)) if current_word.is_some() => {
                match t.unescape() {
                    Ok(text) => word_text.push_str(&text),
                    Err(_) => word_text.push_str(&String::from_utf8_lossy(&t)),
                }
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"word" => {
                if let (Some(bbox), Some(page)) = (current_word.take(), pages.last_mut()) {
                    let text = word_text.trim();
                    if !text.is_empty() {
                        page.words.push(Word {
                            text: text.to_string(),
                            bbox,
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(SieveError::Extraction(format!(
                    "invalid pdftotext output at byte {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Ok(pages)
}

fn new_page(tag: &BytesStart, page_number: usize) -> PageContent {
    PageContent {
        page_number,
        width: parse_attr_f32(tag, "width").unwrap_or(0.0),
        height: parse_attr_f32(tag, "height").unwrap_or(0.0),
        ..PageContent::default()
    }
}

fn parse_attr_f32(tag: &BytesStart, name: &str) -> Option<f32> {
    let attr = tag.try_get_attribute(name).ok()??;
    std::str::from_utf8(&attr.value).ok()?.trim().parse().ok()
}

fn parse_bbox(tag: &BytesStart) -> Option<BBox> {
    Some(BBox {
        x_min: parse_attr_f32(tag, "xMin")?,
        y_min: parse_attr_f32(tag, "yMin")?,
        x_max: parse_attr_f32(tag, "xMax")?,
        y_max: parse_attr_f32(tag, "yMax")?,
    })
}
