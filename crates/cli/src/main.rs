//! CLI tool for extracting slide text from PowerPoint files into a CSV report.

mod discover;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use slidetext_core::{CsvReport, ExtractionRecord, ReportConfig, SlideTextExtractor};
use slidetext_pptx::PptxParser;
use std::path::{Path, PathBuf};

/// Extract text from PowerPoint presentations into a CSV report.
#[derive(Parser, Debug)]
#[command(name = "pptx-text-extract")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input PowerPoint file or folder
    input_path: Option<PathBuf>,

    /// Output CSV file (default: extracted_slide_texts.csv next to this program)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hide progress bars
    #[arg(short, long)]
    quiet: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let Some(input_path) = args.input_path.as_deref() else {
        Args::command().print_help()?;
        return Ok(());
    };

    let config = match &args.output {
        Some(path) => ReportConfig::new(path),
        None => {
            let exe = std::env::current_exe().context("Failed to locate this program")?;
            ReportConfig::beside_program(&exe)
        }
    };

    let records = extract_path(input_path, !args.quiet)?;

    let report = CsvReport::new(config);
    let written = report
        .write(&records)
        .with_context(|| format!("Failed to write {}", report.output_path().display()))?;

    if written {
        println!("Extracted text saved to {}", report.output_path().display());
    } else {
        println!("No text extracted.");
    }

    Ok(())
}

/// Extract records from a file, or from every presentation in a directory.
///
/// Files that fail to open are logged and skipped.
fn extract_path(input_path: &Path, show_progress: bool) -> Result<Vec<ExtractionRecord>> {
    let parser = PptxParser::new();
    let extractor = SlideTextExtractor::new();

    let mut all_records = Vec::new();
    for file in discover::discover_inputs(input_path)? {
        if let Some(records) = process_presentation(&file, &parser, &extractor, show_progress) {
            all_records.extend(records);
        }
    }

    Ok(all_records)
}

/// Process a single presentation, returning `None` if it cannot be opened.
fn process_presentation(
    input_path: &Path,
    parser: &PptxParser,
    extractor: &SlideTextExtractor,
    show_progress: bool,
) -> Option<Vec<ExtractionRecord>> {
    log::info!("Opening {}", input_path.display());

    let document = match parser.parse_file(input_path) {
        Ok(document) => document,
        Err(e) => {
            log::error!("Error opening file {}: {}", input_path.display(), e);
            return None;
        }
    };

    log::debug!("  Found {} slides", document.slides.len());

    let pb = slide_progress(document.slides.len(), show_progress);
    pb.set_message(document.name.clone());
    let records = extractor.extract_document_with_progress(&document, |_| pb.inc(1));
    pb.finish_and_clear();

    log::debug!("  Extracted {} slide(s) with text", records.len());

    Some(records)
}

fn slide_progress(slide_count: usize, show_progress: bool) -> ProgressBar {
    if !show_progress {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(slide_count as u64);
    let style = ProgressStyle::with_template("{msg} [{bar:40.cyan/blue}] {pos}/{len} slides")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
