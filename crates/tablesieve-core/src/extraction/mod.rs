pub mod pdftotext;
pub mod rulings;

use crate::error::SieveError;
use serde::{Deserialize, Serialize};

/// Axis-aligned box in page points, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    pub fn new(x_min: f32, y_min: f32, x_max: f32, y_max: f32) -> Self {
        BBox {
            x_min,
            y_min,
            x_max,
            y_max,
        }
    }

    pub fn center_x(&self) -> f32 {
        (self.x_min + self.x_max) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.y_min + self.y_max) / 2.0
    }
}

/// A word positioned on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A straight horizontal or vertical line drawn on the page.
///
/// `position` is the y coordinate of a horizontal ruling or the x coordinate
/// of a vertical one; `start..=end` is its extent along the other axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ruling {
    pub orientation: Orientation,
    pub position: f32,
    pub start: f32,
    pub end: f32,
}

impl Ruling {
    pub fn horizontal(y: f32, x0: f32, x1: f32) -> Self {
        Ruling {
            orientation: Orientation::Horizontal,
            position: y,
            start: x0.min(x1),
            end: x0.max(x1),
        }
    }

    pub fn vertical(x: f32, y0: f32, y1: f32) -> Self {
        Ruling {
            orientation: Orientation::Vertical,
            position: x,
            start: y0.min(y1),
            end: y0.max(y1),
        }
    }

    pub fn length(&self) -> f32 {
        self.end - self.start
    }

    pub fn is_horizontal(&self) -> bool {
        self.orientation == Orientation::Horizontal
    }
}

/// Geometry extracted from a single page of a PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    pub page_number: usize,
    pub width: f32,
    pub height: f32,
    pub words: Vec<Word>,
    pub rulings: Vec<Ruling>,
}

/// Trait for PDF geometry extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract words and rulings from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, SieveError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
