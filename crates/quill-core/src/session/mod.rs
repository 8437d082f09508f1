//! Conversation session domain: messages, the session entity, and the
//! in-memory store the surface renders from.

pub mod message;
pub mod model;
pub mod store;

pub use message::{estimate_tokens, Message, MessageMeta, MessageStatus, Sender, WELCOME_TEXT};
pub use model::{ChatSession, DEFAULT_TITLE};
pub use store::ConversationStore;
