//! DOCX (Microsoft Word) container decoding.
//!
//! Manual ZIP + XML parsing (docx-rs is writer-only). DOCX files are ZIP
//! archives containing:
//! - `word/document.xml`: main content (paragraphs, tables, section properties)
//! - `word/_rels/document.xml.rels`: relationships (header/footer part targets)
//! - `word/headerN.xml` / `word/footerN.xml`: per-section page furniture
//!
//! The walk collects body paragraphs and tables in document order, records the
//! header/footer part references of each `w:sectPr`, then resolves those
//! references through the relationships map and decodes each part's
//! paragraphs.

use crate::traits::DocumentBackend;
use birthday_core::{
    Block, BirthdayError, BoldState, DecodedDocument, Paragraph, Result, Run, Section, Table,
    TableCell, TableRow,
};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use zip::ZipArchive;

/// Extract an attribute value by key from an element
#[inline]
fn get_attr(e: &quick_xml::events::BytesStart, key: &[u8]) -> Option<String> {
    e.attributes()
        .find(|a| a.as_ref().ok().map(|x| x.key.as_ref()) == Some(key))
        .and_then(std::result::Result::ok)
        .map(|attr| String::from_utf8_lossy(&attr.value).to_string())
}

/// Check if w:val attribute is explicitly "0" or "false" (formatting off)
#[inline]
fn check_val_off(e: &quick_xml::events::BytesStart) -> bool {
    e.attributes().any(|a| {
        if let Ok(attr) = a {
            if attr.key.as_ref() == b"w:val" {
                let v = std::str::from_utf8(&attr.value).unwrap_or_default();
                return v == "0" || v == "false";
            }
        }
        false
    })
}

/// Header/footer part references collected from one `w:sectPr`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct SectionRefs {
    header_ids: Vec<String>,
    footer_ids: Vec<String>,
}

/// State container for walking a DOCX content part.
///
/// Location flags mirror the XML nesting so each event handler only fires in
/// a valid context. Header and footer parts have no `w:body` wrapper, so
/// furniture walks start with `in_body` already set.
struct WalkState {
    blocks: Vec<Block>,
    section_refs: Vec<SectionRefs>,

    in_body: bool,
    in_table: bool,
    in_table_row: bool,
    in_table_cell: bool,
    in_run: bool,
    in_run_props: bool,
    in_sect_props: bool,
    in_drawing: bool,
    in_instr_text: bool,

    current_paragraph: Option<Paragraph>,
    current_table: Option<Table>,
    current_row: Vec<TableCell>,
    current_cell: Option<TableCell>,
    run_text: String,
    run_bold: BoldState,
    pending_section: SectionRefs,
}

impl WalkState {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            section_refs: Vec::new(),
            in_body: false,
            in_table: false,
            in_table_row: false,
            in_table_cell: false,
            in_run: false,
            in_run_props: false,
            in_sect_props: false,
            in_drawing: false,
            in_instr_text: false,
            current_paragraph: None,
            current_table: None,
            current_row: Vec::new(),
            current_cell: None,
            run_text: String::new(),
            run_bold: BoldState::Inherited,
            pending_section: SectionRefs::default(),
        }
    }

    /// State for header/footer parts, whose paragraphs sit directly under the
    /// `w:hdr`/`w:ftr` root.
    fn new_furniture() -> Self {
        Self {
            in_body: true,
            ..Self::new()
        }
    }

    fn finish(self) -> (Vec<Block>, Vec<SectionRefs>) {
        (self.blocks, self.section_refs)
    }

    fn handle_paragraph_start(&mut self) {
        self.current_paragraph = Some(Paragraph::default());
    }

    fn handle_paragraph_end(&mut self) {
        if let Some(para) = self.current_paragraph.take() {
            if self.in_table_cell {
                if let Some(ref mut cell) = self.current_cell {
                    cell.paragraphs.push(para);
                }
            } else {
                self.blocks.push(Block::Paragraph(para));
            }
        }
    }

    fn handle_run_start(&mut self) {
        self.in_run = true;
        self.run_text.clear();
        self.run_bold = BoldState::Inherited;
    }

    fn handle_run_end(&mut self) {
        self.in_run = false;
        if let Some(ref mut para) = self.current_paragraph {
            // Empty runs are kept: a leading empty bold run still decides the
            // paragraph's bold state.
            para.runs.push(Run {
                text: std::mem::take(&mut self.run_text),
                bold: self.run_bold,
            });
        }
    }

    /// `w:b`/`w:bCs` inside `w:rPr`: explicit off wins, presence means on,
    /// absence leaves the run inheriting from the style.
    const fn handle_format_bold(&mut self, val_off: bool) {
        self.run_bold = if val_off {
            BoldState::NotBold
        } else {
            BoldState::Bold
        };
    }

    fn handle_table_end(&mut self) {
        self.in_table = false;
        if let Some(table) = self.current_table.take() {
            self.blocks.push(Block::Table(table));
        }
    }

    fn handle_table_row_end(&mut self) {
        self.in_table_row = false;
        if let Some(ref mut table) = self.current_table {
            table.rows.push(TableRow {
                cells: std::mem::take(&mut self.current_row),
            });
        }
    }

    fn handle_start(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:body" => {
                self.in_body = true;
            }
            b"w:tbl" if self.in_body && !self.in_table && !self.in_drawing => {
                self.in_table = true;
                self.current_table = Some(Table::default());
            }
            b"w:tr" if self.in_table && !self.in_table_row => {
                self.in_table_row = true;
                self.current_row.clear();
            }
            b"w:tc" if self.in_table_row && !self.in_table_cell => {
                self.in_table_cell = true;
                self.current_cell = Some(TableCell::default());
            }
            b"w:p" if !self.in_drawing
                && (self.in_table_cell || (self.in_body && !self.in_table)) =>
            {
                self.handle_paragraph_start();
            }
            b"w:r" if !self.in_drawing && self.current_paragraph.is_some() => {
                self.handle_run_start();
            }
            b"w:rPr" if self.in_run => {
                self.in_run_props = true;
            }
            b"w:drawing" => {
                self.in_drawing = true;
            }
            b"w:instrText" => {
                self.in_instr_text = true;
            }
            b"w:sectPr" => {
                self.in_sect_props = true;
                self.pending_section = SectionRefs::default();
            }
            b"w:b" | b"w:bCs" if self.in_run_props => {
                self.handle_format_bold(check_val_off(e));
            }
            b"w:headerReference" | b"w:footerReference" if self.in_sect_props => {
                self.handle_furniture_reference(e);
            }
            _ => {}
        }
    }

    fn handle_empty(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        match e.name().as_ref() {
            b"w:b" | b"w:bCs" if self.in_run_props => {
                self.handle_format_bold(check_val_off(e));
            }
            b"w:br" if self.in_run => {
                self.run_text.push('\n');
            }
            b"w:tab" if self.in_run => {
                self.run_text.push(' ');
            }
            b"w:p" if self.in_table_cell || (self.in_body && !self.in_table) => {
                // Self-closing empty paragraph
                self.handle_paragraph_start();
                self.handle_paragraph_end();
            }
            b"w:headerReference" | b"w:footerReference" if self.in_sect_props => {
                self.handle_furniture_reference(e);
            }
            _ => {}
        }
    }

    fn handle_end(&mut self, name: &[u8]) {
        match name {
            b"w:body" => {
                self.in_body = false;
            }
            b"w:tbl" if self.in_table => {
                self.handle_table_end();
            }
            b"w:tr" if self.in_table_row => {
                self.handle_table_row_end();
            }
            b"w:tc" if self.in_table_cell => {
                self.in_table_cell = false;
                if let Some(cell) = self.current_cell.take() {
                    self.current_row.push(cell);
                }
            }
            b"w:p" if !self.in_drawing => {
                self.handle_paragraph_end();
            }
            b"w:r" if self.in_run && !self.in_drawing => {
                self.handle_run_end();
            }
            b"w:rPr" if self.in_run_props => {
                self.in_run_props = false;
            }
            b"w:sectPr" if self.in_sect_props => {
                self.in_sect_props = false;
                self.section_refs
                    .push(std::mem::take(&mut self.pending_section));
            }
            b"w:drawing" => {
                self.in_drawing = false;
            }
            b"w:instrText" => {
                self.in_instr_text = false;
            }
            _ => {}
        }
    }

    fn handle_text(&mut self, text: &str) {
        // Field instruction text (e.g. PAGE codes in footers) and drawing
        // content are not document text.
        if self.in_run
            && !self.in_run_props
            && !self.in_instr_text
            && !self.in_drawing
            && self.current_paragraph.is_some()
        {
            self.run_text.push_str(text);
        }
    }

    fn handle_furniture_reference(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let Some(rel_id) = get_attr(e, b"r:id") else {
            return;
        };
        if e.name().as_ref() == b"w:headerReference" {
            self.pending_section.header_ids.push(rel_id);
        } else {
            self.pending_section.footer_ids.push(rel_id);
        }
    }
}

/// Walk one XML content part, feeding events into `state`.
fn walk_part(xml: &str, state: &mut WalkState) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.handle_start(&e),
            Ok(Event::Empty(e)) => state.handle_empty(&e),
            Ok(Event::End(e)) => state.handle_end(e.name().as_ref()),
            Ok(Event::Text(e)) => {
                let text = e.unescape().unwrap_or_default();
                state.handle_text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BirthdayError::MalformedInput(format!(
                    "Error parsing document XML: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }
    Ok(())
}

/// Read a named part from the archive, `None` when the part does not exist.
fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Option<String>> {
    let Ok(mut part) = archive.by_name(name) else {
        return Ok(None);
    };
    let mut content = String::new();
    part.read_to_string(&mut content)
        .map_err(BirthdayError::Io)?;
    Ok(Some(content))
}

/// Parse word/_rels/document.xml.rels into an Id → Target map.
fn parse_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<HashMap<String, String>> {
    let Some(xml_content) = read_part(archive, "word/_rels/document.xml.rels")? else {
        return Ok(HashMap::new()); // No relationships part - return empty map
    };

    let mut relationships = HashMap::new();
    let mut reader = Reader::from_str(&xml_content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e) | Event::Start(e)) if e.name().as_ref() == b"Relationship" => {
                let rel_id = get_attr(&e, b"Id");
                let target = get_attr(&e, b"Target");
                if let (Some(id), Some(tgt)) = (rel_id, target) {
                    relationships.insert(id, tgt);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(BirthdayError::MalformedInput(format!(
                    "Error parsing relationships: {e}"
                )));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(relationships)
}

/// Relationship targets are relative to `word/` unless they start with `/`.
fn resolve_part_path(target: &str) -> String {
    target
        .strip_prefix('/')
        .map_or_else(|| format!("word/{target}"), str::to_string)
}

/// Decode a header/footer part's paragraphs. Tables inside page furniture are
/// not descended into.
fn parse_furniture_paragraphs(xml: &str) -> Result<Vec<Paragraph>> {
    let mut state = WalkState::new_furniture();
    walk_part(xml, &mut state)?;
    let (blocks, _) = state.finish();
    Ok(blocks
        .into_iter()
        .filter_map(|block| match block {
            Block::Paragraph(para) => Some(para),
            Block::Table(_) => None,
        })
        .collect())
}

fn decode_archive<R: Read + Seek>(mut archive: ZipArchive<R>) -> Result<DecodedDocument> {
    let relationships = parse_relationships(&mut archive)?;

    let document_xml = read_part(&mut archive, "word/document.xml")?
        .ok_or_else(|| BirthdayError::MalformedInput("missing word/document.xml".to_string()))?;

    let mut state = WalkState::new();
    walk_part(&document_xml, &mut state)?;
    let (blocks, section_refs) = state.finish();

    let mut sections = Vec::new();
    for refs in section_refs {
        let mut section = Section::default();
        for (ids, target_paras) in [
            (&refs.header_ids, &mut section.headers),
            (&refs.footer_ids, &mut section.footers),
        ] {
            for rel_id in ids {
                let Some(target) = relationships.get(rel_id) else {
                    log::warn!("unresolved header/footer relationship {rel_id}");
                    continue;
                };
                let part_path = resolve_part_path(target);
                match read_part(&mut archive, &part_path)? {
                    Some(xml) => target_paras.extend(parse_furniture_paragraphs(&xml)?),
                    None => log::warn!("referenced part {part_path} missing from archive"),
                }
            }
        }
        sections.push(section);
    }

    Ok(DecodedDocument { blocks, sections })
}

/// DOCX backend decoding Microsoft Word documents into the structural model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DocxBackend;

impl DocumentBackend for DocxBackend {
    fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedDocument> {
        let archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| BirthdayError::Format(format!("Failed to open DOCX as ZIP: {e}")))?;
        decode_archive(archive)
    }

    fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<DecodedDocument> {
        let file = File::open(path.as_ref()).map_err(BirthdayError::Io)?;
        let archive = ZipArchive::new(file)
            .map_err(|e| BirthdayError::Format(format!("Failed to open DOCX as ZIP: {e}")))?;
        decode_archive(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_body_xml(body: &str) -> DecodedDocument {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:body>{body}</w:body>
</w:document>"#
        );
        let mut state = WalkState::new();
        walk_part(&xml, &mut state).expect("walk failed");
        let (blocks, _) = state.finish();
        DecodedDocument {
            blocks,
            sections: Vec::new(),
        }
    }

    fn first_paragraph(doc: &DecodedDocument) -> &Paragraph {
        match &doc.blocks[0] {
            Block::Paragraph(p) => p,
            Block::Table(_) => panic!("expected paragraph"),
        }
    }

    #[test]
    fn test_plain_paragraph_text_and_inherited_bold() {
        let doc = walk_body_xml("<w:p><w:r><w:t>Alice</w:t></w:r></w:p>");
        let para = first_paragraph(&doc);
        assert_eq!(para.text(), "Alice");
        assert_eq!(para.leading_bold(), BoldState::Inherited);
    }

    #[test]
    fn test_explicit_bold_run() {
        let doc = walk_body_xml(
            "<w:p><w:r><w:rPr><w:b/></w:rPr><w:t>September 8</w:t></w:r></w:p>",
        );
        assert_eq!(first_paragraph(&doc).leading_bold(), BoldState::Bold);
    }

    #[test]
    fn test_bold_val_off_is_not_bold() {
        let doc = walk_body_xml(
            r#"<w:p><w:r><w:rPr><w:b w:val="0"/></w:rPr><w:t>Alice</w:t></w:r></w:p>"#,
        );
        assert_eq!(first_paragraph(&doc).leading_bold(), BoldState::NotBold);

        let doc = walk_body_xml(
            r#"<w:p><w:r><w:rPr><w:b w:val="false"/></w:rPr><w:t>Bob</w:t></w:r></w:p>"#,
        );
        assert_eq!(first_paragraph(&doc).leading_bold(), BoldState::NotBold);
    }

    #[test]
    fn test_multiple_runs_concatenate() {
        let doc = walk_body_xml(
            "<w:p>\
             <w:r><w:rPr><w:b/></w:rPr><w:t>September </w:t></w:r>\
             <w:r><w:t>8</w:t></w:r>\
             </w:p>",
        );
        let para = first_paragraph(&doc);
        assert_eq!(para.text(), "September 8");
        assert_eq!(para.runs.len(), 2);
        assert_eq!(para.leading_bold(), BoldState::Bold);
    }

    #[test]
    fn test_break_decodes_to_newline() {
        let doc = walk_body_xml("<w:p><w:r><w:t>Alice</w:t><w:br/><w:t>Bob</w:t></w:r></w:p>");
        assert_eq!(first_paragraph(&doc).text(), "Alice\nBob");
    }

    #[test]
    fn test_table_rows_and_cells() {
        let doc = walk_body_xml(
            "<w:tbl><w:tr>\
             <w:tc><w:p><w:r><w:t>July 4</w:t></w:r></w:p></w:tc>\
             <w:tc><w:p><w:r><w:t>Gia</w:t></w:r></w:p></w:tc>\
             </w:tr></w:tbl>",
        );
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].cells[0].paragraphs[0].text(), "July 4");
        assert_eq!(table.rows[0].cells[1].paragraphs[0].text(), "Gia");
    }

    #[test]
    fn test_paragraph_after_table_lands_in_body() {
        let doc = walk_body_xml(
            "<w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
             <w:p><w:r><w:t>after</w:t></w:r></w:p>",
        );
        assert_eq!(doc.blocks.len(), 2);
        match &doc.blocks[1] {
            Block::Paragraph(p) => assert_eq!(p.text(), "after"),
            Block::Table(_) => panic!("expected paragraph after table"),
        }
    }

    #[test]
    fn test_section_refs_collected_in_order() {
        let xml = r#"<?xml version="1.0"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"
            xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<w:body>
  <w:p><w:r><w:t>body</w:t></w:r></w:p>
  <w:sectPr>
    <w:headerReference w:type="default" r:id="rId6"/>
    <w:footerReference w:type="default" r:id="rId7"/>
  </w:sectPr>
</w:body>
</w:document>"#;
        let mut state = WalkState::new();
        walk_part(xml, &mut state).unwrap();
        let (_, refs) = state.finish();
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].header_ids, ["rId6"]);
        assert_eq!(refs[0].footer_ids, ["rId7"]);
    }

    #[test]
    fn test_furniture_part_paragraphs() {
        let xml = r#"<w:hdr xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
<w:p><w:r><w:t>October 31</w:t></w:r></w:p>
<w:p><w:r><w:t>Pat</w:t></w:r></w:p>
</w:hdr>"#;
        let paras = parse_furniture_paragraphs(xml).unwrap();
        assert_eq!(paras.len(), 2);
        assert_eq!(paras[0].text(), "October 31");
        assert_eq!(paras[1].text(), "Pat");
    }

    #[test]
    fn test_resolve_part_path() {
        assert_eq!(resolve_part_path("header1.xml"), "word/header1.xml");
        assert_eq!(resolve_part_path("/word/header1.xml"), "word/header1.xml");
    }

    #[test]
    fn test_field_instruction_text_skipped() {
        // PAGE fields are common in footers; their instruction text is not
        // document text.
        let doc = walk_body_xml(
            "<w:p><w:r>\
             <w:instrText>PAGE \\* MERGEFORMAT</w:instrText>\
             <w:t>Pat</w:t>\
             </w:r></w:p>",
        );
        assert_eq!(first_paragraph(&doc).text(), "Pat");
    }

    #[test]
    fn test_escaped_entities_unescaped() {
        let doc = walk_body_xml("<w:p><w:r><w:t>Tom &amp; Jerry</w:t></w:r></w:p>");
        assert_eq!(first_paragraph(&doc).text(), "Tom & Jerry");
    }
}
