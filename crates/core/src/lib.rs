//! Core document model, slide text extraction, and CSV report output
//! for PowerPoint text extraction.

pub mod error;
pub mod extract;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use extract::SlideTextExtractor;
pub use report::{CsvReport, ReportConfig, DEFAULT_REPORT_FILENAME};
pub use types::{
    Cell, Document, ExtractionRecord, Paragraph, Row, Run, Shape, ShapeParts, Slide, Table,
    TextFrame,
};
