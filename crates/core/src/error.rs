//! Error types for slide text extraction.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening presentations or writing the report.
///
/// Text extraction itself never fails once a [`Document`](crate::Document)
/// has been parsed; everything here belongs to opening a file or writing
/// the CSV output.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing error (for PPTX).
    #[error("XML parsing error: {0}")]
    XmlError(String),

    /// A package part the presentation refers to is absent.
    #[error("Missing package part: {0}")]
    MissingPart(String),

    /// Failed to write the CSV report.
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}
