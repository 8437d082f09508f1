//! Attachment upload domain: the uploaded file model and the pending-set
//! manager.

pub mod manager;
pub mod model;

pub use manager::{UploadManager, MAX_UPLOAD_BYTES, PDF_MIME_TYPE};
pub use model::{format_size, UploadedFile};
