//! PDF text extraction backed by `lopdf`.

use super::TextExtractor;
use crate::error::{QuillError, Result};
use lopdf::Document;

/// Extracts text from PDF documents.
///
/// Pages are walked in ascending order starting at 1. Each page's text is
/// normalized to single-space-separated words and emitted under a
/// `Page N:` label, with a blank line between pages.
#[derive(Debug, Default, Clone)]
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| QuillError::parse(format!("not a valid PDF document: {e}")))?;

        let mut full_text = String::new();
        for &page_number in doc.get_pages().keys() {
            let raw = doc.extract_text(&[page_number]).map_err(|e| {
                QuillError::parse(format!("failed to decode page {page_number}: {e}"))
            })?;
            let page_text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
            full_text.push_str(&format!("Page {page_number}:\n{page_text}\n\n"));
        }

        tracing::debug!(bytes = bytes.len(), "extracted text from PDF");
        Ok(full_text)
    }
}

/// Test-only helpers shared with the upload manager tests.
#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Assembles a minimal one-page PDF containing the given text.
    pub(crate) fn small_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![100.into(), 700.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().expect("encode content stream"),
        ));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).expect("serialize PDF");
        buffer
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::small_pdf;
    use super::*;

    #[test]
    fn test_extracts_page_labeled_text() {
        let bytes = small_pdf("Hello from a test document");
        let text = PdfTextExtractor::new().extract_text(&bytes).unwrap();
        assert!(text.starts_with("Page 1:\n"), "got: {text}");
        assert!(text.contains("Hello"), "got: {text}");
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_rejects_garbage_bytes() {
        let err = PdfTextExtractor::new()
            .extract_text(b"this is not a pdf")
            .unwrap_err();
        assert!(matches!(err, QuillError::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_input() {
        let err = PdfTextExtractor::new().extract_text(&[]).unwrap_err();
        assert!(matches!(err, QuillError::Parse(_)));
    }
}
