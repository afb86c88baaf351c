//! Slide XML to shape tree.
//!
//! Reads the `p:spTree` of a slide part and rebuilds its shapes as
//! [`Shape`] values: text boxes keep their paragraphs and runs, tables keep
//! their rows and cells, and group shapes keep their children.

use quick_xml::events::Event;
use quick_xml::Reader;
use slidetext_core::{Cell, Error, Paragraph, Result, Row, Run, Shape, ShapeParts, Table, TextFrame};

/// Parse the shapes of one slide, in document (z-) order.
pub fn parse_slide_shapes(xml_content: &str) -> Result<Vec<Shape>> {
    let mut reader = Reader::from_str(xml_content);
    reader.expand_empty_elements(true);

    let mut tree = ShapeTreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                tree.start(local_name(name.as_ref()));
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                tree.end(local_name(name.as_ref()));
            }
            Ok(Event::Text(ref e)) if tree.in_text => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::XmlError(format!("Bad text in slide: {}", e)))?;
                tree.text(&text);
            }
            Ok(Event::CData(ref e)) if tree.in_text => {
                tree.text(&String::from_utf8_lossy(e));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing slide at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(tree.finish())
}

/// Incremental builder fed with element starts, ends and text.
#[derive(Debug, Default)]
struct ShapeTreeBuilder {
    /// Finished top-level shapes.
    root: Vec<Shape>,
    /// Shapes whose end tag has not been seen yet, innermost last.
    open: Vec<ShapeParts>,
    in_tree: bool,
    /// Nesting depth of `mc:AlternateContent`; everything inside is ignored.
    skip_depth: usize,
    in_text_body: bool,
    in_cell: bool,
    in_run: bool,
    in_text: bool,
}

impl ShapeTreeBuilder {
    fn start(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            if name == b"AlternateContent" {
                self.skip_depth += 1;
            }
            return;
        }

        if name == b"spTree" {
            self.in_tree = true;
            return;
        }
        if !self.in_tree {
            return;
        }

        match name {
            b"AlternateContent" => {
                log::debug!("Skipping mc:AlternateContent block");
                self.skip_depth = 1;
            }
            b"sp" => self.open.push(ShapeParts {
                text_frame: Some(TextFrame::default()),
                ..Default::default()
            }),
            b"grpSp" => self.open.push(ShapeParts {
                children: Some(Vec::new()),
                ..Default::default()
            }),
            b"graphicFrame" | b"pic" | b"cxnSp" | b"contentPart" => {
                self.open.push(ShapeParts::default());
            }
            b"tbl" => {
                if let Some(shape) = self.open.last_mut() {
                    shape.table = Some(Table::default());
                }
            }
            b"tr" => {
                if let Some(table) = self.table_mut() {
                    table.rows.push(Row::default());
                }
            }
            b"tc" => {
                if let Some(row) = self.table_mut().and_then(|t| t.rows.last_mut()) {
                    row.cells.push(Cell::default());
                } else {
                    return;
                }
                self.in_cell = true;
            }
            b"txBody" => self.in_text_body = true,
            b"p" if self.in_text_body => {
                if let Some(frame) = self.frame_mut() {
                    frame.paragraphs.push(Paragraph::default());
                }
            }
            b"r" if self.in_text_body => {
                match self.frame_mut().and_then(|f| f.paragraphs.last_mut()) {
                    Some(paragraph) => paragraph.runs.push(Run::default()),
                    None => return,
                }
                self.in_run = true;
            }
            b"t" if self.in_run => self.in_text = true,
            _ => {}
        }
    }

    fn end(&mut self, name: &[u8]) {
        if self.skip_depth > 0 {
            if name == b"AlternateContent" {
                self.skip_depth -= 1;
            }
            return;
        }

        match name {
            b"spTree" => self.in_tree = false,
            b"sp" | b"grpSp" | b"graphicFrame" | b"pic" | b"cxnSp" | b"contentPart" => {
                if let Some(parts) = self.open.pop() {
                    self.attach(parts.classify());
                }
            }
            b"tc" => self.in_cell = false,
            b"txBody" => self.in_text_body = false,
            b"r" => {
                self.in_run = false;
                self.in_text = false;
            }
            b"t" => self.in_text = false,
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        let run = self
            .frame_mut()
            .and_then(|f| f.paragraphs.last_mut())
            .and_then(|p| p.runs.last_mut());
        if let Some(run) = run {
            run.text.push_str(text);
        }
    }

    fn finish(self) -> Vec<Shape> {
        if !self.open.is_empty() {
            log::warn!("{} shape(s) left unclosed in slide", self.open.len());
        }
        self.root
    }

    /// Hand a finished shape to its enclosing group, or to the slide.
    fn attach(&mut self, shape: Shape) {
        match self.open.last_mut() {
            None => self.root.push(shape),
            Some(parent) => match parent.children.as_mut() {
                Some(children) => children.push(shape),
                None => log::debug!("Ignoring shape nested in a non-group shape"),
            },
        }
    }

    fn table_mut(&mut self) -> Option<&mut Table> {
        self.open.last_mut()?.table.as_mut()
    }

    /// Text frame receiving paragraphs: the open table cell, or the shape's own body.
    fn frame_mut(&mut self) -> Option<&mut TextFrame> {
        if self.in_cell {
            self.table_mut()?
                .rows
                .last_mut()?
                .cells
                .last_mut()
                .map(|cell| &mut cell.text_frame)
        } else {
            self.open.last_mut()?.text_frame.as_mut()
        }
    }
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}
