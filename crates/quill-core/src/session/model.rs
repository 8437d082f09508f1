//! Chat session domain model.
//!
//! This module contains the core ChatSession entity: the ordered message
//! transcript of the active conversation plus its display metadata.

use super::message::Message;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used until the first user message names the conversation.
pub const DEFAULT_TITLE: &str = "New Conversation";

/// A single chat session.
///
/// The message sequence is append-only in normal operation and always
/// contains at least one message: the welcome message seeded on creation
/// and on reset. Exactly one session is active at a time in this design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Human-readable session title, truncated for display
    pub title: String,
    /// Ordered message transcript, oldest first
    pub messages: Vec<Message>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the session was last updated (ISO 8601 format)
    pub updated_at: String,
}

impl ChatSession {
    /// Creates a fresh session seeded with a single welcome message.
    pub fn new() -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: vec![Message::welcome()],
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}
