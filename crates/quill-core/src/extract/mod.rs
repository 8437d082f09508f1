//! Document text extraction.
//!
//! The upload manager depends on the [`TextExtractor`] trait rather than a
//! concrete parser, so the parsing capability is injected and its absence
//! is an explicit state (attachments disabled) instead of an implicit
//! global check.

pub mod pdf;

pub use pdf::PdfTextExtractor;

use crate::error::Result;

/// A capability that turns a binary document into a page-labeled text blob.
///
/// Extraction is all-or-nothing per file: if any page fails to decode, the
/// whole result is discarded and an error is returned. Extraction is
/// read-only; it has no side effects beyond CPU and memory use.
pub trait TextExtractor: Send + Sync {
    /// Extracts the full text of `bytes`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::QuillError::Parse`] when the byte stream is not a
    /// valid document or a page fails to decode.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;
}
