//! Conversation message types.
//!
//! This module contains types for representing messages in a conversation,
//! including senders, delivery status, and generation metadata.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed greeting seeded into every fresh session.
pub const WELCOME_TEXT: &str =
    "Hello! I'm your AI assistant powered by Google Gemini. How can I help you today?";

/// Id prefix that marks the synthetic welcome message. Welcome messages
/// are rendered like any other transcript entry but are never sent to
/// the generation API.
const WELCOME_ID_PREFIX: &str = "welcome";

/// Represents the sender of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sender {
    /// Message from the user.
    User,
    /// Message from the AI assistant.
    Assistant,
}

/// Delivery status of a message.
///
/// A message is immutable once created except for the status transition
/// `Sending -> Sent | Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageStatus {
    /// The message is being delivered.
    Sending,
    /// The message was delivered successfully.
    Sent,
    /// Delivery failed; the content describes the failure.
    Error,
}

/// Generation metadata attached to assistant replies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMeta {
    /// Model that produced the reply.
    pub model: String,
    /// Estimated token count. This is the content length divided by four,
    /// not a real tokenizer count.
    pub tokens: u32,
}

/// A single message in a conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: String,
    /// The content of the message.
    pub content: String,
    /// Who sent the message.
    pub sender: Sender,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
    /// Delivery status.
    pub status: MessageStatus,
    /// Generation metadata, present on successful assistant replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl Message {
    /// Creates the synthetic welcome message seeded at session start.
    ///
    /// Each call produces a new identity so a reset session does not
    /// reuse the previous welcome message's id.
    pub fn welcome() -> Self {
        Self {
            id: format!("{}-{}", WELCOME_ID_PREFIX, Uuid::new_v4()),
            content: WELCOME_TEXT.to_string(),
            sender: Sender::Assistant,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: MessageStatus::Sent,
            meta: None,
        }
    }

    /// Creates a user message with `Sent` status.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: format!("user-{}", Uuid::new_v4()),
            content: content.into(),
            sender: Sender::User,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: MessageStatus::Sent,
            meta: None,
        }
    }

    /// Creates a successful assistant reply with estimated token metadata.
    pub fn assistant(content: impl Into<String>, model: impl Into<String>) -> Self {
        let content = content.into();
        let tokens = estimate_tokens(&content);
        Self {
            id: format!("assistant-{}", Uuid::new_v4()),
            content,
            sender: Sender::Assistant,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: MessageStatus::Sent,
            meta: Some(MessageMeta {
                model: model.into(),
                tokens,
            }),
        }
    }

    /// Creates an assistant entry that records a failed turn.
    pub fn assistant_error(content: impl Into<String>) -> Self {
        Self {
            id: format!("error-{}", Uuid::new_v4()),
            content: content.into(),
            sender: Sender::Assistant,
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: MessageStatus::Error,
            meta: None,
        }
    }

    /// Returns true if this is the synthetic welcome message.
    pub fn is_welcome(&self) -> bool {
        self.id.starts_with(WELCOME_ID_PREFIX)
    }
}

/// Rough token estimate: one token per four bytes of content.
///
/// Documented heuristic, not a tokenizer.
pub fn estimate_tokens(text: &str) -> u32 {
    (text.len() / 4) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_identity() {
        let welcome = Message::welcome();
        assert!(welcome.is_welcome());
        assert_eq!(welcome.sender, Sender::Assistant);
        assert_eq!(welcome.status, MessageStatus::Sent);
        assert_eq!(welcome.content, WELCOME_TEXT);

        // A reset must not reuse the previous identity.
        assert_ne!(Message::welcome().id, welcome.id);
    }

    #[test]
    fn test_user_and_assistant_are_not_welcome() {
        assert!(!Message::user("hi").is_welcome());
        assert!(!Message::assistant("hello", "gemini-2.0-flash").is_welcome());
        assert!(!Message::assistant_error("boom").is_welcome());
    }

    #[test]
    fn test_token_estimate() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("Hi there"), 2);
        assert_eq!(estimate_tokens("abc"), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
    }

    #[test]
    fn test_assistant_meta_is_estimated() {
        let reply = Message::assistant("Hi there", "gemini-2.0-flash");
        let meta = reply.meta.unwrap();
        assert_eq!(meta.model, "gemini-2.0-flash");
        assert_eq!(meta.tokens, 2);
    }
}
