//! # Birthday Core - Roster Document Extraction
//!
//! Extracts ordered "date → list of names" groups from word-processing
//! documents where a date heading (bold or plain, full or abbreviated month
//! name) is followed by zero or more name lines, and renders the groups as a
//! grid of HTML cards.
//!
//! The crate is container-agnostic: a backend (see the `birthday-backend`
//! crate) decodes the document file into a [`DecodedDocument`], and this crate
//! does the rest:
//!
//! 1. [`extract::lines`] flattens the document into ordered [`Line`]s
//!    (body paragraphs, table cells, then section headers/footers).
//! 2. [`classify::classify_line`] tags each line as a date heading or a name
//!    using an ordered chain of heuristics.
//! 3. [`parse::parse_document`] groups names under the nearest preceding
//!    heading into a [`ParseResult`].
//! 4. [`render::render_cards`] expands the result into the Bootstrap card
//!    grid; [`render::page_title`] derives the page title.
//!
//! ## Quick Start
//!
//! ```rust
//! use birthday_core::{parse_document, render_cards, ParseOptions};
//! use birthday_core::document::{Block, DecodedDocument, Paragraph};
//!
//! let doc = DecodedDocument {
//!     blocks: vec![
//!         Block::Paragraph(Paragraph::bold("September 8")),
//!         Block::Paragraph(Paragraph::plain("Alice")),
//!     ],
//!     sections: vec![],
//! };
//!
//! let result = parse_document(&doc, &ParseOptions::default());
//! assert_eq!(result.get("September 8").unwrap().names, ["Alice"]);
//! let html = render_cards(&result);
//! assert!(html.contains("<h3>September 8<br/></h3>"));
//! ```

pub mod classify;
pub mod document;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod parse;
pub mod render;

pub use classify::{classify_line, LineClass};
pub use document::{
    Block, BoldState, DecodedDocument, Paragraph, Run, Section, Table, TableCell, TableRow,
};
pub use error::{BirthdayError, Result};
pub use extract::{lines, Line};
pub use normalize::normalize_text;
pub use parse::{parse_document, parse_lines, BirthdayGroup, Diagnostic, ParseOptions, ParseResult};
pub use render::{page_title, render_cards, UploadResponse};
