//! Uploaded file model.

use serde::{Deserialize, Serialize};

/// A successfully parsed document pending submission.
///
/// An `UploadedFile` only exists once extraction has completed, so
/// `extracted_text` is always populated; no partially parsed entry is
/// ever visible to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Unique identifier for the uploaded file
    pub id: String,
    /// Original filename
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// MIME type of the file
    pub mime_type: String,
    /// Text extracted from the document, labeled by page
    pub extracted_text: String,
}

/// Formats a byte count as a human-readable label for display.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    let exponent = ((bytes as f64).ln() / 1024_f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exponent as i32);
    // Two decimals, with trailing zeros dropped: 1.50 -> 1.5, 1.00 -> 1.
    let rounded = format!("{value:.2}");
    let rounded = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{rounded} {}", UNITS[exponent])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 Bytes");
        assert_eq!(format_size(512), "512 Bytes");
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1280), "1.25 KB");
        assert_eq!(format_size(10 * 1024 * 1024), "10 MB");
    }
}
