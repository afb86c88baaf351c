//! PPTX file parser implementation.

use crate::shapes::{local_name, parse_slide_shapes};
use quick_xml::events::Event;
use quick_xml::Reader;
use slidetext_core::{Document, Error, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Open and parse a PPTX file. The document is named after the file stem.
    pub fn parse_file(&self, path: &Path) -> Result<Document> {
        let file = File::open(path)?;
        self.parse(BufReader::new(file), &Document::name_from_path(path))
    }

    /// Parse a PPTX file from a reader.
    pub fn parse<R: Read + Seek>(&self, reader: R, name: &str) -> Result<Document> {
        let mut archive =
            ZipArchive::new(reader).map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let mut document = Document::new(name);

        let slide_order = self.get_slide_order(&mut archive)?;
        log::debug!("{}: {} slide(s) listed", name, slide_order.len());

        for slide_path in &slide_order {
            let content = self.read_file_from_archive(&mut archive, slide_path)?;
            let shapes = parse_slide_shapes(&content)?;
            document.add_slide(shapes);
        }

        Ok(document)
    }

    /// Get the ordered list of slide part paths.
    ///
    /// The order is that of `p:sldIdLst` in `presentation.xml`; each entry's
    /// relationship id is resolved to a part through the presentation rels.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let presentation = self.read_file_from_archive(archive, PRESENTATION_PATH)?;
        let slide_ids = parse_slide_id_list(&presentation)?;

        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let targets = parse_relationships(&rels_content)?;

        slide_ids
            .iter()
            .map(|id| {
                targets
                    .get(id)
                    .map(|target| resolve_target("ppt", target))
                    .ok_or_else(|| Error::MissingPart(format!("No relationship for slide id '{}'", id)))
            })
            .collect()
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            e => Error::ZipError(format!("Failed to open '{}': {}", path, e)),
        })?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect the `r:id` of every `p:sldId`, in list order.
fn parse_slide_id_list(xml_content: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if local_name(e.name().as_ref()) == b"sldId" => {
                // The plain `id` attribute is the numeric slide id; the
                // relationship id is the namespaced one.
                let rel_id = e.attributes().flatten().find_map(|attr| {
                    let key = attr.key.as_ref();
                    (key.contains(&b':') && local_name(key) == b"id")
                        .then(|| String::from_utf8_lossy(&attr.value).to_string())
                });
                match rel_id {
                    Some(id) => ids.push(id),
                    None => log::warn!("Skipping p:sldId without a relationship id"),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!("Error parsing presentation: {}", e)));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Map relationship `Id` to `Target`.
fn parse_relationships(xml_content: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml_content);
    reader.trim_text(true);

    let mut targets = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e)) if e.name().as_ref() == b"Relationship" => {
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Target" => {
                            target = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Id" => {
                            id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }

                if !id.is_empty() {
                    targets.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(targets)
}

/// Resolve a relationship target against the directory of its source part.
///
/// Absolute targets ("/ppt/slides/slide1.xml") are rooted at the package;
/// relative ones are joined to `base_dir`, with `.` and `..` collapsed.
fn resolve_target(base_dir: &str, target: &str) -> String {
    let joined = match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("{}/{}", base_dir, target),
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use slidetext_core::{Shape, SlideTextExtractor, TextFrame};
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    const SLIDE_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    fn slide_xml(texts: &[&str]) -> String {
        let shapes: String = texts
            .iter()
            .map(|t| {
                format!(
                    "<p:sp><p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>",
                    t
                )
            })
            .collect();
        format!(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            shapes
        )
    }

    /// Build a package whose slide list order is `order` (indexes into `slides`).
    fn build_pptx(slides: &[&[&str]], order: &[usize]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default();

        let ids: String = order
            .iter()
            .enumerate()
            .map(|(i, idx)| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 256 + i, idx + 2))
            .collect();
        zip.start_file(PRESENTATION_PATH, options).unwrap();
        write!(
            zip,
            r#"<p:presentation xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst></p:presentation>"#,
            ids
        )
        .unwrap();

        let rels: String = (0..slides.len())
            .map(|i| {
                format!(
                    r#"<Relationship Id="rId{}" Type="{}" Target="slides/slide{}.xml"/>"#,
                    i + 2,
                    SLIDE_REL,
                    i + 1
                )
            })
            .collect();
        zip.start_file(PRESENTATION_RELS_PATH, options).unwrap();
        write!(
            zip,
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="{}"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>{}</Relationships>"#,
            RELS_NS, rels
        )
        .unwrap();

        for (i, texts) in slides.iter().enumerate() {
            zip.start_file(format!("ppt/slides/slide{}.xml", i + 1), options)
                .unwrap();
            zip.write_all(slide_xml(texts).as_bytes()).unwrap();
        }

        zip.finish().unwrap().into_inner()
    }

    fn text_of(shape: &Shape) -> &str {
        match shape {
            Shape::Text(frame) => &frame.paragraphs[0].runs[0].text,
            other => panic!("expected text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_slides_in_order() {
        let bytes = build_pptx(&[&["Intro"], &[], &["Summary", "Thanks"]], &[0, 1, 2]);
        let doc = PptxParser::new().parse(Cursor::new(bytes), "Deck").unwrap();

        assert_eq!(doc.name, "Deck");
        assert_eq!(doc.slides.len(), 3);
        assert_eq!(doc.slides[0].number, 1);
        assert_eq!(text_of(&doc.slides[0].shapes[0]), "Intro");
        assert!(doc.slides[1].shapes.is_empty());
        assert_eq!(text_of(&doc.slides[2].shapes[1]), "Thanks");
    }

    #[test]
    fn test_slide_list_order_wins_over_part_names() {
        let bytes = build_pptx(&[&["first part"], &["second part"]], &[1, 0]);
        let doc = PptxParser::new().parse(Cursor::new(bytes), "Deck").unwrap();

        assert_eq!(text_of(&doc.slides[0].shapes[0]), "second part");
        assert_eq!(text_of(&doc.slides[1].shapes[0]), "first part");
    }

    #[test]
    fn test_parse_then_extract() {
        let bytes = build_pptx(&[&["Intro"], &["  "]], &[0, 1]);
        let doc = PptxParser::new().parse(Cursor::new(bytes), "A").unwrap();
        let records = SlideTextExtractor::new().extract_document(&doc);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "A_Slide1");
        assert_eq!(records[0].text, "Intro");
        assert_eq!(doc.slides[1].shapes, vec![Shape::Text(TextFrame::from_runs([["  "]]))]);
    }

    #[test]
    fn test_parse_file_uses_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Quarterly.pptx");
        std::fs::write(&path, build_pptx(&[&["Q3"]], &[0])).unwrap();

        let doc = PptxParser::new().parse_file(&path).unwrap();
        assert_eq!(doc.name, "Quarterly");
        assert_eq!(doc.slides.len(), 1);
    }

    #[test]
    fn test_not_a_zip() {
        let result = PptxParser::new().parse(Cursor::new(b"plain text".to_vec()), "x");
        assert!(matches!(result, Err(Error::ZipError(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = PptxParser::new().parse_file(Path::new("/nonexistent/deck.pptx"));
        assert!(matches!(result, Err(Error::IoError(_))));
    }

    #[test]
    fn test_zip_without_presentation() {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("word/document.xml", FileOptions::default())
            .unwrap();
        zip.write_all(b"<w:document/>").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let result = PptxParser::new().parse(Cursor::new(bytes), "x");
        assert!(matches!(result, Err(Error::MissingPart(ref p)) if p == PRESENTATION_PATH));
    }

    #[test]
    fn test_parse_slide_id_list() {
        let xml = r#"<p:presentation xmlns:p="p" xmlns:r="r"><p:sldIdLst><p:sldId id="256" r:id="rId7"/><p:sldId id="257" r:id="rId3"/></p:sldIdLst></p:presentation>"#;
        assert_eq!(parse_slide_id_list(xml).unwrap(), vec!["rId7", "rId3"]);
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(resolve_target("ppt", "slides/slide1.xml"), "ppt/slides/slide1.xml");
        assert_eq!(resolve_target("ppt", "/ppt/slides/slide2.xml"), "ppt/slides/slide2.xml");
        assert_eq!(resolve_target("ppt", "./slides/../slides/slide3.xml"), "ppt/slides/slide3.xml");
    }
}
