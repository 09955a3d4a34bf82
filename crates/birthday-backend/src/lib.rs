//! Container-format backends for birthday roster extraction.
//!
//! A backend decodes an uploaded document file into the structural
//! [`birthday_core::DecodedDocument`] model; the core crate never sees the
//! container format. Only DOCX is supported.

pub mod docx;
pub mod traits;

pub use docx::DocxBackend;
pub use traits::DocumentBackend;
