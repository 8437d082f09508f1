//! Quill interaction layer: Gemini request shaping, the HTTP client, and
//! the turn orchestrator that drives a conversation.

pub mod gemini;
pub mod orchestrator;
pub mod request;

pub use gemini::{GeminiClient, GenerationClient};
pub use orchestrator::{IgnoreReason, TurnOrchestrator, TurnResult};
pub use request::{build_request, GenerateContentRequest, ATTACHMENT_DELIMITER};
