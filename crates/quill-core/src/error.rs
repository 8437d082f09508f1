//! Error types for the Quill application.

use thiserror::Error;

/// A shared error type for the entire Quill application.
///
/// This provides typed, structured error variants with automatic conversion
/// from common error types via the `From` trait.
#[derive(Error, Debug, Clone)]
pub enum QuillError {
    /// Attachment rejected before any I/O: the mime type is not PDF.
    #[error("Unsupported file type '{mime_type}': only application/pdf is accepted")]
    UnsupportedType { mime_type: String },

    /// Attachment rejected before any I/O: over the size ceiling.
    #[error("File too large: {size} bytes (limit is {limit} bytes)")]
    FileTooLarge { size: u64, limit: u64 },

    /// Document extraction failure, including a missing extractor.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Transport-level failure talking to the generation API.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the generation API.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response arrived but did not match the expected envelope.
    #[error("Format error: {0}")]
    Format(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },
}

impl QuillError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an UnsupportedType error
    pub fn unsupported_type(mime_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            mime_type: mime_type.into(),
        }
    }

    /// Creates a Parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates a Network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates an Api error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Creates a Format error
    pub fn format(message: impl Into<String>) -> Self {
        Self::Format(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this error belongs to the attachment validation class,
    /// rejected before any extraction work was attempted.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedType { .. } | Self::FileTooLarge { .. }
        )
    }

    /// Check if this error belongs to the send-failure class, which is
    /// surfaced as an error-status entry in the transcript rather than
    /// as an immediate advisory.
    pub fn is_send_failure(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Api { .. } | Self::Format(_))
    }
}

impl From<std::io::Error> for QuillError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

/// A type alias for `Result<T, QuillError>`.
pub type Result<T> = std::result::Result<T, QuillError>;
