//! Core trait definitions for document backends.

use birthday_core::{DecodedDocument, Result};
use std::path::Path;

/// A container-format decoder yielding the structural document model the
/// parser consumes.
///
/// Decoding is invoked once per uploaded file and holds no state across
/// invocations.
pub trait DocumentBackend {
    /// Decode a document from an in-memory buffer (e.g. an uploaded file).
    fn decode_bytes(&self, bytes: &[u8]) -> Result<DecodedDocument>;

    /// Decode a document from a file on disk.
    fn decode_file<P: AsRef<Path>>(&self, path: P) -> Result<DecodedDocument>;
}
