//! Error types for roster document extraction.

use thiserror::Error;

/// Error types that can occur while decoding and parsing a roster document.
///
/// Classification itself never fails: every non-blank line is either a date
/// heading or a name, so the only failure modes are structural (the container
/// cannot be opened or traversed).
#[derive(Error, Debug)]
pub enum BirthdayError {
    /// The document's structure could not be traversed (missing or broken
    /// structural members, invalid XML).
    #[error("Malformed document: {0}")]
    MalformedInput(String),

    /// File I/O error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a supported container format (e.g. not a ZIP archive).
    #[error("Format error: {0}")]
    Format(String),
}

/// Type alias for [`Result<T, BirthdayError>`].
pub type Result<T> = std::result::Result<T, BirthdayError>;
