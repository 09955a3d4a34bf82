//! Line extraction: flatten a decoded document into an ordered line sequence.
//!
//! Traversal order is body blocks top-to-bottom (descending into tables
//! row-major, each cell's paragraphs in order), then every header paragraph
//! and every footer paragraph of each section, in section order. Blank lines
//! carry no information and are filtered out here so they never break the
//! current group downstream.

use crate::document::{Block, BoldState, DecodedDocument, Paragraph};
use crate::normalize::normalize_text;

/// One non-blank line of document text, ready for classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Text as stored in the document.
    pub raw_text: String,
    /// Whitespace-collapsed, invisible-character-free, trimmed text.
    pub normalized_text: String,
    /// Bold state of the paragraph's leading run.
    pub leading_run_bold: BoldState,
}

impl Line {
    /// Build a line from raw text and a leading-run bold state.
    #[must_use]
    pub fn new(raw: &str, leading_run_bold: BoldState) -> Self {
        Self {
            raw_text: raw.to_string(),
            normalized_text: normalize_text(raw),
            leading_run_bold,
        }
    }

    fn from_paragraph(para: &Paragraph) -> Self {
        let raw = para.text();
        Self {
            normalized_text: normalize_text(&raw),
            raw_text: raw,
            leading_run_bold: para.leading_bold(),
        }
    }
}

/// Paragraphs of one body block: the paragraph itself, or a table's cell
/// paragraphs row-major.
fn block_paragraphs(block: &Block) -> Box<dyn Iterator<Item = &Paragraph> + '_> {
    match block {
        Block::Paragraph(para) => Box::new(std::iter::once(para)),
        Block::Table(table) => Box::new(
            table
                .rows
                .iter()
                .flat_map(|row| row.cells.iter().flat_map(|cell| cell.paragraphs.iter())),
        ),
    }
}

/// Lazily walk the document in traversal order, yielding non-blank [`Line`]s.
///
/// The iterator is finite and restartable: calling `lines` again on the same
/// document yields an identical sequence.
pub fn lines(doc: &DecodedDocument) -> impl Iterator<Item = Line> + '_ {
    let body = doc.blocks.iter().flat_map(block_paragraphs);

    let furniture = doc
        .sections
        .iter()
        .flat_map(|section| section.headers.iter().chain(section.footers.iter()));

    body.chain(furniture)
        .map(Line::from_paragraph)
        .filter(|line| !line.normalized_text.is_empty())
}
