//! Pending attachment management.
//!
//! The upload manager validates user-selected documents, runs them through
//! the injected [`TextExtractor`], and tracks the resulting attachments
//! until the next send consumes them.

use super::model::UploadedFile;
use crate::error::{QuillError, Result};
use crate::extract::TextExtractor;
use std::sync::Arc;
use uuid::Uuid;

/// Only PDF documents are accepted.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Size ceiling for a single upload: 10 MB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Tracks the ordered set of extracted-text attachments pending submission.
pub struct UploadManager {
    pending: Vec<UploadedFile>,
    extractor: Option<Arc<dyn TextExtractor>>,
}

impl UploadManager {
    /// Creates a manager backed by the given extractor.
    pub fn new(extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            pending: Vec::new(),
            extractor: Some(extractor),
        }
    }

    /// Creates a manager with no extractor installed.
    ///
    /// The attachment feature is disabled in this state: `add_file`
    /// fails with a parse error and surfaces should hide or disable the
    /// upload affordance.
    pub fn disabled() -> Self {
        Self {
            pending: Vec::new(),
            extractor: None,
        }
    }

    /// Returns true when an extractor is installed and uploads are accepted.
    pub fn is_enabled(&self) -> bool {
        self.extractor.is_some()
    }

    /// Validates and parses a user-selected document, appending it to the
    /// pending set on success.
    ///
    /// Validation order: mime type, then size, then extraction. The
    /// extractor is never invoked for a file that fails validation.
    /// Insertion order is preserved and names are not de-duplicated.
    ///
    /// # Errors
    ///
    /// * [`QuillError::UnsupportedType`] for non-PDF mime types
    /// * [`QuillError::FileTooLarge`] above the 10 MB ceiling
    /// * [`QuillError::Parse`] when no extractor is installed or the
    ///   document fails to parse
    pub fn add_file(&mut self, bytes: &[u8], name: &str, mime_type: &str) -> Result<&UploadedFile> {
        if mime_type != PDF_MIME_TYPE {
            return Err(QuillError::unsupported_type(mime_type));
        }
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(QuillError::FileTooLarge {
                size,
                limit: MAX_UPLOAD_BYTES,
            });
        }

        let extractor = self
            .extractor
            .as_ref()
            .ok_or_else(|| QuillError::parse("document extractor is not initialized"))?;
        let extracted_text = extractor.extract_text(bytes)?;

        let file = UploadedFile {
            id: format!("file-{}", Uuid::new_v4()),
            name: name.to_string(),
            size,
            mime_type: mime_type.to_string(),
            extracted_text,
        };
        tracing::debug!(name, size, "attachment parsed and pending");
        self.pending.push(file);
        Ok(self.pending.last().expect("just pushed"))
    }

    /// Removes a pending file by id. Returns false when no such file
    /// exists (a no-op).
    pub fn remove_file(&mut self, id: &str) -> bool {
        let before = self.pending.len();
        self.pending.retain(|file| file.id != id);
        before != self.pending.len()
    }

    /// Empties the pending set.
    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    /// Returns the current pending set, in insertion order, without
    /// consuming it.
    pub fn list_pending(&self) -> &[UploadedFile] {
        &self.pending
    }

    /// Drains the pending set. Called exactly once per send, before the
    /// request is dispatched, so a failed send never re-submits stale
    /// attachments.
    pub fn take_pending(&mut self) -> Vec<UploadedFile> {
        std::mem::take(&mut self.pending)
    }
}
