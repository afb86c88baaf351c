//! CSV report output.
//!
//! Writes one row per extracted slide with the fixed header
//! `FileName_SlideNumber,Slide Text`.

use crate::error::Result;
use crate::types::ExtractionRecord;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the report when no explicit path is configured.
pub const DEFAULT_REPORT_FILENAME: &str = "extracted_slide_texts.csv";

/// Where the report is written.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub output_path: PathBuf,
}

impl ReportConfig {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    /// Report next to the given program path ("bin/tool" -> "bin/extracted_slide_texts.csv").
    pub fn beside_program(program: &Path) -> Self {
        let dir = program.parent().unwrap_or_else(|| Path::new(""));
        Self::new(dir.join(DEFAULT_REPORT_FILENAME))
    }
}

/// Writer for the slide text report.
#[derive(Debug, Clone)]
pub struct CsvReport {
    config: ReportConfig,
}

impl CsvReport {
    pub fn new(config: ReportConfig) -> Self {
        Self { config }
    }

    /// Path the report will be written to.
    pub fn output_path(&self) -> &Path {
        &self.config.output_path
    }

    /// Write records to the configured path, replacing any previous report.
    ///
    /// Returns `Ok(false)` without touching the filesystem when there is
    /// nothing to write.
    pub fn write(&self, records: &[ExtractionRecord]) -> Result<bool> {
        if records.is_empty() {
            return Ok(false);
        }

        let file = File::create(&self.config.output_path)?;
        write_records(file, records)?;
        log::debug!(
            "Wrote {} rows to {}",
            records.len(),
            self.config.output_path.display()
        );
        Ok(true)
    }
}

/// Serialize records as CSV, header first, in the given order.
pub fn write_records<W: Write>(writer: W, records: &[ExtractionRecord]) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    Ok(())
}
