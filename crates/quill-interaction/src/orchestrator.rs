//! Turn orchestration.
//!
//! On submit, appends the user turn, shapes the request over the history
//! plus that new turn, invokes the generation client, and appends the
//! assistant reply or a synthetic error entry. Exactly one send may be in
//! flight at a time; submissions while sending are ignored, not queued.

use crate::gemini::GenerationClient;
use crate::request::build_request;
use quill_core::session::{ChatSession, ConversationStore, Message};
use quill_core::upload::UploadManager;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Content of the user turn when only attachments were provided.
pub const ATTACHMENT_ONLY_PLACEHOLDER: &str = "Uploaded PDF file(s)";

/// Outcome of a submit action.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResult {
    /// The turn resolved; the reply (success or error entry) was appended
    /// to the transcript.
    Reply(Message),
    /// The submission was ignored and no state changed.
    Ignored(IgnoreReason),
}

/// Why a submission was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Trimmed input was empty and no attachments were pending.
    EmptyInput,
    /// A send is already in flight.
    Busy,
}

/// Drives the `Idle -> Sending -> Idle` turn state machine over the
/// conversation store and upload manager.
pub struct TurnOrchestrator<C: GenerationClient> {
    store: Arc<RwLock<ConversationStore>>,
    uploads: Arc<RwLock<UploadManager>>,
    client: C,
    in_flight: AtomicBool,
}

/// Clears the in-flight flag when a turn resolves, on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<C: GenerationClient> TurnOrchestrator<C> {
    /// Creates an orchestrator over a fresh conversation.
    pub fn new(client: C, uploads: Arc<RwLock<UploadManager>>) -> Self {
        Self {
            store: Arc::new(RwLock::new(ConversationStore::new())),
            uploads,
            client,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Returns a snapshot of the active session for rendering.
    pub async fn session(&self) -> ChatSession {
        self.store.read().await.session().clone()
    }

    /// True while a send is in flight.
    pub fn is_sending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Handles a submit action.
    ///
    /// The user message is appended strictly before the request is
    /// dispatched, and the reply strictly after it settles, so the
    /// transcript keeps chronological order. Send failures never
    /// propagate: they become an `Error`-status assistant entry.
    pub async fn submit(&self, input: &str) -> TurnResult {
        let trimmed = input.trim();
        let has_attachments = !self.uploads.read().await.list_pending().is_empty();
        if trimmed.is_empty() && !has_attachments {
            return TurnResult::Ignored(IgnoreReason::EmptyInput);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return TurnResult::Ignored(IgnoreReason::Busy);
        }
        let _guard = InFlightGuard(&self.in_flight);

        // Attachments are consumed now, before the send, so a failed turn
        // cannot re-submit them.
        let attachment_text = {
            let files = self.uploads.write().await.take_pending();
            let joined = files
                .iter()
                .map(|file| file.extracted_text.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            if joined.is_empty() {
                None
            } else {
                Some(joined)
            }
        };

        let content = if trimmed.is_empty() {
            ATTACHMENT_ONLY_PLACEHOLDER
        } else {
            trimmed
        };
        let user_message = Message::user(content);

        // The snapshot is taken after the append, so the request context
        // is exactly the history plus the new user turn. The title derives
        // from the trimmed input, not the placeholder content.
        let transcript = {
            let mut store = self.store.write().await;
            store.append_user_turn(user_message, trimmed);
            store.messages().to_vec()
        };

        let request = build_request(&transcript, attachment_text.as_deref());
        let reply = match self.client.generate(&request).await {
            Ok(text) => Message::assistant(text, self.client.model_name()),
            Err(err) => {
                tracing::warn!(error = %err, "generation request failed");
                Message::assistant_error(format!(
                    "I apologize, but I encountered an error while processing \
                     your request: {err}. Please try again."
                ))
            }
        };

        self.store.write().await.append_message(reply.clone());
        TurnResult::Reply(reply)
    }

    /// Clears the conversation: fresh welcome message, default title, and
    /// an empty pending-attachment set.
    pub async fn clear(&self) {
        self.store.write().await.reset();
        self.uploads.write().await.clear_all();
    }
}
