//! Quill core domain: conversation state, attachment handling, document
//! text extraction, and shared error/configuration types.

pub mod config;
pub mod error;
pub mod extract;
pub mod session;
pub mod upload;

// Re-export common error type
pub use error::{QuillError, Result};
