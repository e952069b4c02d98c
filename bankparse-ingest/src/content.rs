//! Positioned text from PDF page content streams.
//!
//! Walks the text operators of a page and records where each shown string
//! starts, in user space. Glyph widths are not read from font programs; the
//! extent of a fragment is estimated from its character count and font size,
//! which is enough to tell table columns apart.

use std::collections::BTreeMap;

use lopdf::content::Operation;
use lopdf::{Document, Object, ObjectId};

/// Estimated advance of one character, in ems.
const GLYPH_WIDTH_EM: f32 = 0.5;
/// TJ adjustments below this (in thousandths of an em) read as a word break.
const TJ_SPACE_THRESHOLD: f32 = -100.0;

/// A run of text shown at one position on the page.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub x: f32,
    /// Baseline height; larger is higher on the page.
    pub y: f32,
    pub width: f32,
    /// Font size after the text and graphics transforms.
    pub size: f32,
    pub text: String,
}

impl Fragment {
    pub fn new(x: f32, y: f32, size: f32, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            x,
            y,
            width: estimate_width(&text, size),
            size,
            text,
        }
    }

    pub fn end(&self) -> f32 {
        self.x + self.width
    }

    /// Append a fragment that continues this one on the same line.
    pub fn absorb(&mut self, other: Fragment, separator: &str) {
        self.text.push_str(separator);
        self.text.push_str(&other.text);
        self.width = self.width.max(other.end() - self.x);
    }
}

fn estimate_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * GLYPH_WIDTH_EM
}

/// Affine transform `[a b c d e f]`, applied to row vectors.
type Matrix = [f32; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn translation(tx: f32, ty: f32) -> Matrix {
    [1.0, 0.0, 0.0, 1.0, tx, ty]
}

/// Every text fragment on one page, in content-stream order.
pub fn page_fragments(document: &Document, page_id: ObjectId) -> lopdf::Result<Vec<Fragment>> {
    let encodings: BTreeMap<Vec<u8>, &str> = document
        .get_page_fonts(page_id)
        .into_iter()
        .map(|(name, font)| (name, font.get_font_encoding()))
        .collect();
    let content = document.get_and_decode_page_content(page_id)?;
    Ok(fragments_from_operations(&content.operations, &encodings))
}

/// Text and graphics state needed to place shown strings.
struct TextState<'a> {
    ctm: Matrix,
    saved: Vec<Matrix>,
    matrix: Matrix,
    line_matrix: Matrix,
    leading: f32,
    font_size: f32,
    encoding: Option<&'a str>,
    /// Set while shown text continues the last fragment without repositioning.
    open: bool,
}

impl<'a> TextState<'a> {
    fn new() -> Self {
        Self {
            ctm: IDENTITY,
            saved: Vec::new(),
            matrix: IDENTITY,
            line_matrix: IDENTITY,
            leading: 0.0,
            font_size: 0.0,
            encoding: None,
            open: false,
        }
    }

    fn move_line(&mut self, tx: f32, ty: f32) {
        self.line_matrix = multiply(&translation(tx, ty), &self.line_matrix);
        self.matrix = self.line_matrix;
        self.open = false;
    }

    fn next_line(&mut self) {
        self.move_line(0.0, -self.leading);
    }

    fn show(&mut self, text: String, fragments: &mut Vec<Fragment>) {
        if text.is_empty() {
            return;
        }
        let placed = multiply(&self.matrix, &self.ctm);
        let size = self.font_size * placed[0].hypot(placed[1]);

        match fragments.last_mut() {
            Some(last) if self.open => {
                let next = Fragment::new(last.end(), last.y, size, text);
                last.absorb(next, "");
            }
            _ => fragments.push(Fragment::new(placed[4], placed[5], size, text)),
        }
        self.open = true;
    }
}

fn numbers<const N: usize>(operands: &[Object]) -> Option<[f32; N]> {
    if operands.len() < N {
        return None;
    }
    let mut out = [0.0; N];
    for (slot, operand) in out.iter_mut().zip(operands) {
        *slot = operand.as_float().ok()?;
    }
    Some(out)
}

fn decode_array(encoding: Option<&str>, items: &[Object]) -> String {
    let mut text = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => text.push_str(&Document::decode_text(encoding, bytes)),
            other => {
                if other.as_float().is_ok_and(|adjust| adjust < TJ_SPACE_THRESHOLD) {
                    text.push(' ');
                }
            }
        }
    }
    text
}

fn last_string(encoding: Option<&str>, operands: &[Object]) -> Option<String> {
    operands
        .last()
        .and_then(|o| o.as_str().ok())
        .map(|bytes| Document::decode_text(encoding, bytes))
}

/// Place the strings shown by `operations`. Operators with malformed operands
/// are skipped.
pub fn fragments_from_operations(
    operations: &[Operation],
    encodings: &BTreeMap<Vec<u8>, &str>,
) -> Vec<Fragment> {
    let mut state = TextState::new();
    let mut fragments = Vec::new();

    for op in operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => state.saved.push(state.ctm),
            "Q" => {
                if let Some(ctm) = state.saved.pop() {
                    state.ctm = ctm;
                }
                state.open = false;
            }
            "cm" => {
                if let Some(m) = numbers::<6>(operands) {
                    state.ctm = multiply(&m, &state.ctm);
                }
                state.open = false;
            }
            "BT" => {
                state.matrix = IDENTITY;
                state.line_matrix = IDENTITY;
                state.open = false;
            }
            "ET" => state.open = false,
            "Tf" => {
                if let Some(name) = operands.first().and_then(|o| o.as_name().ok()) {
                    state.encoding = encodings.get(name).copied();
                }
                if let Some(size) = operands.get(1).and_then(|o| o.as_float().ok()) {
                    state.font_size = size;
                }
            }
            "TL" => {
                if let Some([leading]) = numbers::<1>(operands) {
                    state.leading = leading;
                }
            }
            "Td" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.move_line(tx, ty);
                }
            }
            "TD" => {
                if let Some([tx, ty]) = numbers::<2>(operands) {
                    state.leading = -ty;
                    state.move_line(tx, ty);
                }
            }
            "Tm" => {
                if let Some(m) = numbers::<6>(operands) {
                    state.matrix = m;
                    state.line_matrix = m;
                    state.open = false;
                }
            }
            "T*" => state.next_line(),
            "Tj" => {
                if let Some(text) = last_string(state.encoding, operands) {
                    state.show(text, &mut fragments);
                }
            }
            "TJ" => {
                if let Some(items) = operands.first().and_then(|o| o.as_array().ok()) {
                    let text = decode_array(state.encoding, items);
                    state.show(text, &mut fragments);
                }
            }
            "'" | "\"" => {
                state.next_line();
                if let Some(text) = last_string(state.encoding, operands) {
                    state.show(text, &mut fragments);
                }
            }
            _ => {}
        }
    }

    fragments
}
