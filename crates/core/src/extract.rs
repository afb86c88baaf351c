//! Slide text extraction.
//!
//! Walks each slide's shape tree (text boxes, tables, nested groups) and
//! keeps every run that carries at least one ASCII letter or digit. Bullets,
//! spacing artifacts and symbol-only runs are dropped.

use crate::types::{Document, ExtractionRecord, Shape, Slide, Table, TextFrame};
use regex::Regex;
use std::sync::LazyLock;

/// Regex matching any ASCII letter or digit.
static MEANINGFUL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z0-9]").unwrap());

/// Check whether a text fragment contains any ASCII letter or digit.
pub fn is_meaningful(text: &str) -> bool {
    MEANINGFUL_REGEX.is_match(text)
}

/// Append a run's raw text plus a trailing space if the run qualifies.
fn push_run(out: &mut String, text: &str) {
    if !text.trim().is_empty() && is_meaningful(text) {
        out.push_str(text);
        out.push(' ');
    }
}

fn push_frame(out: &mut String, frame: &TextFrame) {
    for paragraph in &frame.paragraphs {
        for run in &paragraph.runs {
            push_run(out, &run.text);
        }
    }
}

/// Join the meaningful runs of a text frame, in paragraph then run order.
///
/// Runs keep their original inner whitespace; only the ends of the joined
/// result are trimmed.
pub fn text_frame_text(frame: &TextFrame) -> String {
    let mut out = String::new();
    push_frame(&mut out, frame);
    out.trim().to_string()
}

/// Join the meaningful runs of a table, row by row and cell by cell.
///
/// Cell boundaries are not marked: the whole table becomes one flat string.
pub fn table_text(table: &Table) -> String {
    let mut out = String::new();
    for row in &table.rows {
        for cell in &row.cells {
            push_frame(&mut out, &cell.text_frame);
        }
    }
    out.trim().to_string()
}

/// Collect the text of a shape sequence, one line per text-bearing shape.
///
/// Groups are walked recursively. Text shapes, tables and groups each add a
/// newline even when they produce no text, so an empty text box between two
/// filled ones leaves a blank line. Shapes without text add nothing.
pub fn shapes_text(shapes: &[Shape]) -> String {
    let mut out = String::new();
    for shape in shapes {
        match shape {
            Shape::Text(frame) => out.push_str(&text_frame_text(frame)),
            Shape::Table(table) => out.push_str(&table_text(table)),
            Shape::Group(children) => out.push_str(&shapes_text(children)),
            Shape::Other => continue,
        }
        out.push('\n');
    }
    out.trim().to_string()
}

/// Extract the text of a single slide, or `None` if it has none.
pub fn slide_text(slide: &Slide) -> Option<String> {
    let text = shapes_text(&slide.shapes);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Turns parsed documents into report records.
#[derive(Debug, Clone, Default)]
pub struct SlideTextExtractor;

impl SlideTextExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract one record per slide that has text, in slide order.
    pub fn extract_document(&self, document: &Document) -> Vec<ExtractionRecord> {
        self.extract_document_with_progress(document, |_| {})
    }

    /// Like [`extract_document`](Self::extract_document), calling `on_slide`
    /// after every slide (including slides that produce no record).
    ///
    /// Record identifiers use the slide's position in the document, so
    /// skipped slides leave gaps in the numbering.
    pub fn extract_document_with_progress<F>(
        &self,
        document: &Document,
        mut on_slide: F,
    ) -> Vec<ExtractionRecord>
    where
        F: FnMut(&Slide),
    {
        let mut records = Vec::new();

        for slide in &document.slides {
            match slide_text(slide) {
                Some(text) => records.push(ExtractionRecord::new(&document.name, slide.number, text)),
                None => log::debug!("{}: slide {} has no text", document.name, slide.number),
            }
            on_slide(slide);
        }

        records
    }
}
