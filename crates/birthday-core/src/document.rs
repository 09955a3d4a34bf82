//! Decoded document model produced by a container backend.
//!
//! This is the input boundary of the parser: a backend (ZIP + XML for DOCX)
//! decodes the uploaded file into these types, and the core never touches the
//! container format itself.

/// Bold attribute of a formatting run.
///
/// OOXML allows the bold attribute to be unset on a run, in which case it
/// inherits from the paragraph or document style. Classification treats
/// [`BoldState::Inherited`] the same as [`BoldState::Bold`]: only an explicit
/// "off" disqualifies a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BoldState {
    /// Bold explicitly enabled on the run.
    Bold,
    /// Bold explicitly disabled on the run.
    NotBold,
    /// Attribute unset; the effective value comes from the style.
    #[default]
    Inherited,
}

impl BoldState {
    /// Whether the run counts as bold for date-heading classification.
    #[must_use]
    pub const fn counts_as_bold(self) -> bool {
        !matches!(self, Self::NotBold)
    }
}

/// A contiguous span of identically-formatted text within a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub bold: BoldState,
}

/// One paragraph: an ordered sequence of formatting runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    pub runs: Vec<Run>,
}

impl Paragraph {
    /// A single-run paragraph with bold explicitly off.
    #[must_use]
    pub fn plain(text: &str) -> Self {
        Self {
            runs: vec![Run {
                text: text.to_string(),
                bold: BoldState::NotBold,
            }],
        }
    }

    /// A single-run paragraph with bold explicitly on.
    #[must_use]
    pub fn bold(text: &str) -> Self {
        Self {
            runs: vec![Run {
                text: text.to_string(),
                bold: BoldState::Bold,
            }],
        }
    }

    /// Concatenated text of all runs, as stored in the document.
    #[must_use]
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Bold state of the leading run. Paragraphs without runs have no
    /// formatting to inherit and report [`BoldState::NotBold`].
    #[must_use]
    pub fn leading_bold(&self) -> BoldState {
        self.runs.first().map_or(BoldState::NotBold, |r| r.bold)
    }
}

/// One table cell: its own ordered paragraph sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableCell {
    pub paragraphs: Vec<Paragraph>,
}

/// One table row, cells left-to-right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
}

/// A table embedded in the document body, rows top-to-bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

/// A body-level block in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Paragraph(Paragraph),
    Table(Table),
}

/// Page furniture for one document section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Section {
    pub headers: Vec<Paragraph>,
    pub footers: Vec<Paragraph>,
}

/// A fully decoded document: body blocks in document order plus per-section
/// header and footer paragraphs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedDocument {
    pub blocks: Vec<Block>,
    pub sections: Vec<Section>,
}
