//! PPTX (Office Open XML) parser backend for slide text extraction.
//!
//! Parses .pptx files which are ZIP archives containing XML documents,
//! producing a [`slidetext_core::Document`] with one shape tree per slide.

pub mod parser;
pub mod shapes;

pub use parser::PptxParser;
pub use shapes::parse_slide_shapes;
