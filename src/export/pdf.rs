//! Paginated A4 PDF export using the built-in Helvetica font.
//!
//! Built-in PDF fonts only cover Latin-1, so any other character is written as
//! `?`. Rendering therefore never fails on content.

use anyhow::Result;
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

use super::entry_heading;
use crate::journal::types::Entry;

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 10.0;
const LINE_HEIGHT_MM: f32 = 10.0;
const FONT_SIZE_PT: f32 = 12.0;
/// Mean Helvetica advance width as a fraction of the font size.
const AVG_CHAR_EM: f32 = 0.55;
const PT_PER_MM: f32 = 72.0 / 25.4;
const LAYER: &str = "Layer 1";

/// Render the title and every entry (heading, wrapped text, spacer) to PDF bytes.
pub fn render_pdf(title: &str, entries: &[Entry]) -> Result<Vec<u8>> {
    let lines = layout(title, entries);
    let mut writer = PageWriter::new(title)?;
    for line in &lines {
        writer.write_line(line);
    }
    tracing::debug!(lines = lines.len(), pages = writer.pages, "pdf rendered");
    writer.finish()
}

/// The document as printable lines, in order.
pub(crate) fn layout(title: &str, entries: &[Entry]) -> Vec<String> {
    let width = chars_per_line();
    let mut lines = vec![latin1_lossy(title)];
    for entry in entries {
        lines.push(latin1_lossy(&entry_heading(entry)));
        for paragraph in entry.entry.lines() {
            lines.extend(wrap(&latin1_lossy(paragraph), width));
        }
        lines.push(String::new());
    }
    lines
}

fn chars_per_line() -> usize {
    let usable_pt = (PAGE_WIDTH_MM - 2.0 * MARGIN_MM) * PT_PER_MM;
    (usable_pt / (FONT_SIZE_PT * AVG_CHAR_EM)) as usize
}

/// Replace every character outside printable Latin-1 with `?`. The C1
/// controls (U+0080..U+009F) have no WinAnsi glyph and would be dropped.
pub fn latin1_lossy(text: &str) -> String {
    text.chars()
        .map(|c| match c as u32 {
            0x80..=0x9F => '?',
            0..=0xFF => c,
            _ => '?',
        })
        .collect()
}

/// Greedy word wrap to `width` characters. Words longer than a line are split.
/// An empty paragraph yields one empty line.
fn wrap(paragraph: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            lines.push(chars.drain(..width).collect());
        }
        let len = chars.len();
        if len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// Writes lines top to bottom, starting a new page when the bottom margin is hit.
struct PageWriter {
    doc: PdfDocumentReference,
    font: IndirectFontRef,
    layer: PdfLayerReference,
    y: f32,
    pages: usize,
}

impl PageWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
        let font = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| anyhow::anyhow!("failed to add Helvetica font: {e:?}"))?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            font,
            layer,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
            pages: 1,
        })
    }

    fn write_line(&mut self, text: &str) {
        if self.y - LINE_HEIGHT_MM < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER);
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
            self.pages += 1;
        }
        self.y -= LINE_HEIGHT_MM;
        if !text.is_empty() {
            // Baseline sits a little above the bottom of the line box.
            let baseline = self.y + LINE_HEIGHT_MM * 0.3;
            self.layer
                .use_text(text, FONT_SIZE_PT, Mm(MARGIN_MM), Mm(baseline), &self.font);
        }
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc
            .save_to_bytes()
            .map_err(|e| anyhow::anyhow!("failed to serialize PDF: {e:?}"))
    }
}
