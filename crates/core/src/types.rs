//! Domain types for representing a parsed presentation and its extracted text.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A parsed presentation, read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Base name of the source file, without directory or extension.
    pub name: String,

    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Document {
    /// Create an empty document with the given base name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slides: Vec::new(),
        }
    }

    /// Derive the document name from a file path ("decks/Deck.pptx" -> "Deck").
    pub fn name_from_path(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Append a slide. Its number is its 1-based position in the document.
    pub fn add_slide(&mut self, shapes: Vec<Shape>) {
        let number = self.slides.len() + 1;
        self.slides.push(Slide { number, shapes });
    }
}

/// A single slide.
#[derive(Debug, Clone, Default)]
pub struct Slide {
    /// 1-based slide number.
    pub number: usize,

    /// Top-level shapes in z-order.
    pub shapes: Vec<Shape>,
}

/// A visual object on a slide, classified by the only capability that
/// matters for text extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A shape with a text frame.
    Text(TextFrame),
    /// A graphic frame holding a table.
    Table(Table),
    /// A group of child shapes.
    Group(Vec<Shape>),
    /// Pictures, connectors, charts and anything else without text.
    Other,
}

/// Raw capabilities observed on a shape element before classification.
///
/// A well-formed slide only ever fills in one of these, but when several
/// are present the text frame wins over the table, and the table over the
/// children.
#[derive(Debug, Clone, Default)]
pub struct ShapeParts {
    pub text_frame: Option<TextFrame>,
    pub table: Option<Table>,
    pub children: Option<Vec<Shape>>,
}

impl ShapeParts {
    /// Classify into exactly one [`Shape`] variant.
    pub fn classify(self) -> Shape {
        if let Some(frame) = self.text_frame {
            Shape::Text(frame)
        } else if let Some(table) = self.table {
            Shape::Table(table)
        } else if let Some(children) = self.children {
            Shape::Group(children)
        } else {
            Shape::Other
        }
    }
}

/// Paragraphs of a text body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
}

impl TextFrame {
    /// Build a frame from paragraphs given as lists of run texts.
    pub fn from_runs<P, R>(paragraphs: P) -> Self
    where
        P: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            paragraphs: paragraphs
                .into_iter()
                .map(|runs| Paragraph {
                    runs: runs.into_iter().map(Run::new).collect(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

/// A run of uniformly formatted text. Only the raw string is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    pub text: String,
}

impl Run {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// A table: rows of cells, each cell owning its own text frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Cell>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text_frame: TextFrame,
}

/// One row of the output report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// `{file base name}_Slide{number}`.
    #[serde(rename = "FileName_SlideNumber")]
    pub id: String,

    /// All meaningful text found on the slide.
    #[serde(rename = "Slide Text")]
    pub text: String,
}

impl ExtractionRecord {
    /// Create a record for the given document name and 1-based slide number.
    pub fn new(document_name: &str, slide_number: usize, text: impl Into<String>) -> Self {
        Self {
            id: format!("{}_Slide{}", document_name, slide_number),
            text: text.into(),
        }
    }
}
