//! Request shaping for the Gemini generateContent API.
//!
//! Projects the conversation transcript into the external request schema.
//! The synthetic welcome message is never sent to the model, and pending
//! attachment text is spliced into the final user turn.

use quill_core::session::{Message, Sender};
use serde::Serialize;

/// Label that separates the user's text from spliced attachment text.
pub const ATTACHMENT_DELIMITER: &str = "\n\n[Additional context from attached PDF]:\n";

/// Request body for `models/{model}:generateContent`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

/// A single conversation turn in the external schema.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// A text part of a turn.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

/// Builds the request payload from the transcript.
///
/// Welcome messages are excluded; the remaining messages keep their
/// relative order, mapped to `"user"` / `"model"` roles with one text
/// part each. When `attachment_text` is non-empty and the formatted
/// sequence ends in a user turn, the attachment text is appended to that
/// turn behind [`ATTACHMENT_DELIMITER`]. If the last entry is not a user
/// turn the attachment text is silently dropped; this does not occur in
/// the normal submit flow, where the final entry is always the new user
/// message. The input sequence is never mutated.
pub fn build_request(messages: &[Message], attachment_text: Option<&str>) -> GenerateContentRequest {
    let mut contents: Vec<Content> = messages
        .iter()
        .filter(|message| !message.is_welcome())
        .map(|message| Content {
            role: match message.sender {
                Sender::User => "user".to_string(),
                Sender::Assistant => "model".to_string(),
            },
            parts: vec![Part {
                text: message.content.clone(),
            }],
        })
        .collect();

    if let Some(context) = attachment_text.filter(|text| !text.is_empty()) {
        if let Some(last) = contents.last_mut() {
            if last.role == "user" {
                if let Some(part) = last.parts.first_mut() {
                    part.text = format!("{}{}{}", part.text, ATTACHMENT_DELIMITER, context);
                }
            } else {
                tracing::warn!("attachment text dropped: last turn is not a user turn");
            }
        }
    }

    GenerateContentRequest { contents }
}
