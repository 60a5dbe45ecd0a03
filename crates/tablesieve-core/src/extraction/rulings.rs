use crate::extraction::Ruling;
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::BTreeMap;
use tracing::warn;

/// Two endpoints closer than this along one axis make an axis-aligned segment.
const AXIS_TOL: f32 = 0.5;

/// Letter-size fallback when a page has no usable MediaBox.
const DEFAULT_MEDIA_BOX: [f32; 4] = [0.0, 0.0, 612.0, 792.0];

/// Form XObjects nested deeper than this are not drawn.
const MAX_FORM_DEPTH: usize = 8;

/// Placement of a page's user space on the displayed page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageFrame {
    /// `[llx, lly, urx, ury]` in PDF user space.
    pub media_box: [f32; 4],
    /// Clockwise display rotation: 0, 90, 180 or 270.
    pub rotation: u16,
}

impl PageFrame {
    /// `rotate` is the page's `/Rotate` value; anything that is not a
    /// multiple of 90 counts as 0.
    pub fn new(media_box: [f32; 4], rotate: i64) -> Self {
        let rotation = match rotate.rem_euclid(360) {
            90 => 90,
            180 => 180,
            270 => 270,
            _ => 0,
        };
        PageFrame {
            media_box,
            rotation,
        }
    }

    /// A user-space point in displayed coordinates, origin at the top-left.
    pub fn to_display(&self, x: f32, y: f32) -> (f32, f32) {
        let [left, bottom, right, top] = self.media_box;
        match self.rotation {
            90 => (y - bottom, x - left),
            180 => (right - x, y - bottom),
            270 => (top - y, right - x),
            _ => (x - left, top - y),
        }
    }
}

/// Collect the horizontal and vertical line segments painted on each page,
/// keyed by 1-based page number, in displayed top-left page coordinates
/// (the space `pdftotext` reports words in).
///
/// Pages whose content stream cannot be decoded get no rulings.
pub fn extract_rulings(document: &Document) -> BTreeMap<usize, Vec<Ruling>> {
    let mut out = BTreeMap::new();
    for (page_number, page_id) in document.get_pages() {
        let page_number = page_number as usize;
        let frame = PageFrame::new(
            media_box(document, page_id).unwrap_or(DEFAULT_MEDIA_BOX),
            rotation(document, page_id),
        );
        let resources = inherited(document, page_id, b"Resources").and_then(|r| r.as_dict().ok());
        let content = document
            .get_page_content(page_id)
            .and_then(|raw| Content::decode(&raw));
        match content {
            Ok(content) => {
                let mut painter = Painter::new(Some(document), frame);
                painter.run(&content.operations, Matrix::IDENTITY, resources, 0);
                out.insert(page_number, painter.rulings);
            }
            Err(e) => {
                warn!(page = page_number, error = %e, "could not decode page content, no rulings");
            }
        }
    }
    out
}

/// Walk a page's drawing operators and keep the axis-aligned segments of
/// every painted path. Form XObjects are not followed: there is no document
/// to look them up in.
pub fn rulings_from_operations(operations: &[Operation], frame: PageFrame) -> Vec<Ruling> {
    let mut painter = Painter::new(None, frame);
    painter.run(operations, Matrix::IDENTITY, None, 0);
    painter.rulings
}

struct Painter<'a> {
    document: Option<&'a Document>,
    frame: PageFrame,
    rulings: Vec<Ruling>,
}

impl<'a> Painter<'a> {
    fn new(document: Option<&'a Document>, frame: PageFrame) -> Self {
        Painter {
            document,
            frame,
            rulings: Vec::new(),
        }
    }

    fn run(
        &mut self,
        operations: &[Operation],
        mut ctm: Matrix,
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) {
        let mut saved: Vec<Matrix> = Vec::new();
        let mut path: Vec<Vec<(f32, f32)>> = Vec::new();

        for op in operations {
            match op.operator.as_str() {
                "q" => saved.push(ctm),
                "Q" => ctm = saved.pop().unwrap_or(Matrix::IDENTITY),
                "cm" => {
                    if let Some([a, b, c, d, e, f]) = numbers::<6>(&op.operands) {
                        ctm = Matrix([a, b, c, d, e, f]).concat(&ctm);
                    }
                }
                "m" => {
                    if let Some([x, y]) = numbers::<2>(&op.operands) {
                        path.push(vec![ctm.apply(x, y)]);
                    }
                }
                "l" => {
                    if let Some([x, y]) = numbers::<2>(&op.operands) {
                        let p = ctm.apply(x, y);
                        match path.last_mut() {
                            Some(subpath) => subpath.push(p),
                            None => path.push(vec![p]),
                        }
                    }
                }
                // Curves never yield rulings; restart the subpath at the end point.
                "c" | "v" | "y" => {
                    let n = op.operands.len();
                    if n >= 2 {
                        if let Some([x, y]) = numbers::<2>(&op.operands[n - 2..]) {
                            path.push(vec![ctm.apply(x, y)]);
                        }
                    }
                }
                "re" => {
                    if let Some([x, y, w, h]) = numbers::<4>(&op.operands) {
                        path.push(vec![
                            ctm.apply(x, y),
                            ctm.apply(x + w, y),
                            ctm.apply(x + w, y + h),
                            ctm.apply(x, y + h),
                            ctm.apply(x, y),
                        ]);
                    }
                }
                "h" => close_subpath(&mut path),
                "s" | "b" | "b*" => {
                    close_subpath(&mut path);
                    self.paint(&mut path);
                }
                "S" | "f" | "F" | "f*" | "B" | "B*" => self.paint(&mut path),
                "n" => path.clear(),
                "Do" => self.draw_form(&op.operands, ctm, resources, depth),
                _ => {}
            }
        }
    }

    /// Run the operators of the form XObject named by a `Do` operand.
    /// Image XObjects and unknown names are skipped.
    fn draw_form(
        &mut self,
        operands: &[Object],
        ctm: Matrix,
        resources: Option<&'a Dictionary>,
        depth: usize,
    ) {
        if depth >= MAX_FORM_DEPTH {
            return;
        }
        let Some(document) = self.document else {
            return;
        };
        let Some(form) = resources.and_then(|r| form_xobject(document, r, operands)) else {
            return;
        };

        let matrix = form
            .dict
            .get(b"Matrix")
            .ok()
            .and_then(|m| resolve(document, m))
            .and_then(|m| m.as_array().ok())
            .and_then(|values| numbers::<6>(values))
            .map(Matrix)
            .unwrap_or(Matrix::IDENTITY);
        // a form without its own resources uses those of the page drawing it
        let form_resources = form
            .dict
            .get(b"Resources")
            .ok()
            .and_then(|r| resolve(document, r))
            .and_then(|r| r.as_dict().ok())
            .or(resources);

        let raw = form
            .decompressed_content()
            .unwrap_or_else(|_| form.content.clone());
        match Content::decode(&raw) {
            Ok(content) => {
                self.run(&content.operations, matrix.concat(&ctm), form_resources, depth + 1)
            }
            Err(e) => warn!(error = %e, "could not decode form XObject, no rulings"),
        }
    }

    fn paint(&mut self, path: &mut Vec<Vec<(f32, f32)>>) {
        for subpath in path.drain(..) {
            for pair in subpath.windows(2) {
                let (x0, y0) = self.frame.to_display(pair[0].0, pair[0].1);
                let (x1, y1) = self.frame.to_display(pair[1].0, pair[1].1);

                if (y0 - y1).abs() <= AXIS_TOL && (x0 - x1).abs() > AXIS_TOL {
                    self.rulings.push(Ruling::horizontal((y0 + y1) / 2.0, x0, x1));
                } else if (x0 - x1).abs() <= AXIS_TOL && (y0 - y1).abs() > AXIS_TOL {
                    self.rulings.push(Ruling::vertical((x0 + x1) / 2.0, y0, y1));
                }
            }
        }
    }
}

fn close_subpath(path: &mut [Vec<(f32, f32)>]) {
    if let Some(subpath) = path.last_mut() {
        if let (Some(&first), Some(&last)) = (subpath.first(), subpath.last()) {
            if subpath.len() > 1 && first != last {
                subpath.push(first);
            }
        }
    }
}

fn form_xobject<'a>(
    document: &'a Document,
    resources: &'a Dictionary,
    operands: &[Object],
) -> Option<&'a Stream> {
    let name = operands.first()?.as_name().ok()?;
    let xobjects = resolve(document, resources.get(b"XObject").ok()?)?
        .as_dict()
        .ok()?;
    let stream = resolve(document, xobjects.get(name).ok()?)?
        .as_stream()
        .ok()?;
    let subtype = stream.dict.get(b"Subtype").ok()?.as_name().ok()?;
    (subtype == b"Form").then_some(stream)
}

/// Affine transform `[a b c d e f]` as used by the PDF `cm` operator.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Matrix([f32; 6]);

impl Matrix {
    const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// `self` applied first, then `other`.
    fn concat(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, obj) in out.iter_mut().zip(operands) {
        *slot = number(obj)?;
    }
    Some(out)
}

/// A page attribute, inherited from the page tree when the page lacks it.
fn inherited<'a>(document: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut dict = document.get_dictionary(page_id).ok()?;
    for _ in 0..32 {
        if let Ok(obj) = dict.get(key) {
            return resolve(document, obj);
        }
        let parent = dict.get(b"Parent").ok()?.as_reference().ok()?;
        dict = document.get_dictionary(parent).ok()?;
    }
    None
}

fn media_box(document: &Document, page_id: ObjectId) -> Option<[f32; 4]> {
    let values = inherited(document, page_id, b"MediaBox")?.as_array().ok()?;
    let [x0, y0, x1, y1] = numbers::<4>(values)?;
    Some([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
}

fn rotation(document: &Document, page_id: ObjectId) -> i64 {
    inherited(document, page_id, b"Rotate")
        .and_then(|r| r.as_i64().ok())
        .unwrap_or(0)
}

fn resolve<'a>(document: &'a Document, obj: &'a Object) -> Option<&'a Object> {
    match obj {
        Object::Reference(id) => document.get_object(*id).ok(),
        other => Some(other),
    }
}
