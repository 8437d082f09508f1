//! In-memory conversation store.
//!
//! The store owns the active [`ChatSession`] and is the single source of
//! truth the surface renders. It supports appending messages and resetting
//! the session; past messages are never edited or deleted.

use super::message::Message;
use super::model::{ChatSession, DEFAULT_TITLE};

/// Maximum number of characters of the first user message used as the
/// session title.
const TITLE_MAX_CHARS: usize = 50;

/// Fallback title stem when the first user message has no text content.
const TITLE_FALLBACK: &str = "PDF Analysis";

/// Process-lifetime state for the active conversation.
///
/// The store itself is a plain value. It is mutated only by the turn
/// orchestrator in normal operation; callers that share it across tasks
/// must wrap it in a lock so appends stay serialized and the transcript
/// order equals insertion order.
#[derive(Debug)]
pub struct ConversationStore {
    session: ChatSession,
}

impl ConversationStore {
    /// Creates a store holding a fresh session with its welcome message.
    pub fn new() -> Self {
        Self {
            session: ChatSession::new(),
        }
    }

    /// Returns the active session.
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Returns the transcript, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.session.messages
    }

    /// Appends a message to the end of the transcript and refreshes
    /// `updated_at`.
    pub fn append_message(&mut self, message: Message) {
        self.session.messages.push(message);
        self.session.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Appends a user turn, naming the session if it is the first one.
    ///
    /// The title comes from the raw trimmed `input`, not from the message
    /// content: truncated to 50 characters with an ellipsis appended, or
    /// the fallback label when the input is empty. An attachment-only turn
    /// carries placeholder content but an empty input, so it titles the
    /// session with the fallback.
    pub fn append_user_turn(&mut self, message: Message, input: &str) {
        if !message.is_welcome() && self.session.messages.iter().all(|m| m.is_welcome()) {
            self.session.title = derive_title(input);
        }
        self.append_message(message);
    }

    /// Replaces the transcript with a fresh welcome message (new identity)
    /// and resets the title.
    ///
    /// Callers that also track pending uploads must clear them alongside
    /// this operation; the orchestrator's `clear` does both.
    pub fn reset(&mut self) {
        self.session.messages = vec![Message::welcome()];
        self.session.title = DEFAULT_TITLE.to_string();
        self.session.updated_at = chrono::Utc::now().to_rfc3339();
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the session title from the first user input.
fn derive_title(input: &str) -> String {
    let stem = if input.trim().is_empty() {
        TITLE_FALLBACK
    } else {
        input
    };
    let truncated: String = stem.chars().take(TITLE_MAX_CHARS).collect();
    format!("{truncated}...")
}
