use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::Editor;
use rustyline::{Context, Helper};
use tokio::sync::RwLock;
use tracing_subscriber::EnvFilter;

use quill_core::extract::PdfTextExtractor;
use quill_core::session::{ChatSession, Message, MessageStatus};
use quill_core::upload::{format_size, UploadManager, PDF_MIME_TYPE};
use quill_core::QuillError;
use quill_interaction::{GeminiClient, IgnoreReason, TurnOrchestrator, TurnResult};

/// CLI helper for rustyline that provides completion, highlighting, and hints.
#[derive(Clone)]
struct CliHelper {
    commands: Vec<String>,
}

impl CliHelper {
    fn new() -> Self {
        Self {
            commands: vec![
                "/attach".to_string(),
                "/files".to_string(),
                "/remove".to_string(),
                "/clear".to_string(),
                "/copy".to_string(),
            ],
        }
    }
}

impl Helper for CliHelper {}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];

        if line.starts_with('/') {
            let candidates: Vec<Pair> = self
                .commands
                .iter()
                .filter(|cmd| cmd.starts_with(line))
                .map(|cmd| Pair {
                    display: cmd.clone(),
                    replacement: cmd.clone(),
                })
                .collect();
            Ok((0, candidates))
        } else {
            Ok((0, vec![]))
        }
    }
}

impl Highlighter for CliHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];

        if line.starts_with('/') && !line.contains(' ') {
            self.commands
                .iter()
                .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
                .map(|cmd| cmd[line.len()..].to_string())
        } else {
            None
        }
    }
}

impl Validator for CliHelper {}

/// Prints an assistant reply (or error entry) to the terminal.
fn render_reply(message: &Message) {
    match message.status {
        MessageStatus::Error => {
            for line in message.content.lines() {
                println!("{}", line.red());
            }
        }
        _ => {
            for line in message.content.lines() {
                println!("{}", line.bright_blue());
            }
            if let Some(meta) = &message.meta {
                println!(
                    "{}",
                    format!("{} • ~{} tokens", meta.model, meta.tokens).bright_black()
                );
            }
        }
    }
    println!();
}

/// Copies the n-th transcript message (1-based) to the system clipboard.
///
/// Best effort: failures are logged, never surfaced into conversation
/// state.
fn copy_message(session: &ChatSession, index: usize) {
    let Some(message) = index
        .checked_sub(1)
        .and_then(|i| session.messages.get(i))
    else {
        println!("{}", "No such message".bright_black());
        return;
    };

    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(message.content.clone())) {
        Ok(()) => println!("{}", format!("Copied message {index}").bright_black()),
        Err(err) => tracing::warn!(error = %err, "failed to copy message to clipboard"),
    }
}

/// The main entry point for the Quill chat REPL.
///
/// Sets up a rustyline editor with slash-command completion, then loops:
/// plain input is submitted as a conversation turn, `/attach`, `/files`,
/// `/remove`, `/clear`, and `/copy` manage attachments and the session.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let client = match GeminiClient::try_from_config() {
        Ok(client) => client,
        Err(err) => {
            eprintln!("{}", format!("{err}").red());
            eprintln!(
                "{}",
                "Add your key to ~/.config/quill/secret.json: \
                 { \"gemini\": { \"api_key\": \"...\" } }"
                    .bright_black()
            );
            std::process::exit(1);
        }
    };

    let uploads = Arc::new(RwLock::new(UploadManager::new(Arc::new(
        PdfTextExtractor::new(),
    ))));
    let orchestrator = TurnOrchestrator::new(client, uploads.clone());

    let helper = CliHelper::new();
    let mut rl = Editor::new()?;
    rl.set_helper(Some(helper));

    println!("{}", "=== Quill ===".bright_magenta().bold());
    println!(
        "{}",
        "Chat with Gemini. '/attach <file.pdf>' to add context, '/files' to list \
         attachments, '/clear' to start over, 'quit' to exit."
            .bright_black()
    );
    println!();

    // The seeded welcome message opens the transcript.
    for message in &orchestrator.session().await.messages {
        render_reply(message);
    }

    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }

                if trimmed.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(rest) = trimmed.strip_prefix('/') {
                    handle_command(rest, &orchestrator, &uploads).await;
                    continue;
                }

                println!("{}", format!("> {}", trimmed).green());

                match orchestrator.submit(trimmed).await {
                    TurnResult::Reply(message) => render_reply(&message),
                    TurnResult::Ignored(IgnoreReason::EmptyInput) => {}
                    TurnResult::Ignored(IgnoreReason::Busy) => {
                        println!("{}", "Still thinking, hold on...".yellow());
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

/// Dispatches a slash command (without its leading `/`).
async fn handle_command(
    input: &str,
    orchestrator: &TurnOrchestrator<GeminiClient>,
    uploads: &Arc<RwLock<UploadManager>>,
) {
    let mut words = input.splitn(2, ' ');
    let command = words.next().unwrap_or_default();
    let argument = words.next().unwrap_or_default().trim();

    match command {
        "attach" => {
            if argument.is_empty() {
                println!("{}", "Usage: /attach <file.pdf>".bright_black());
                return;
            }
            if !uploads.read().await.is_enabled() {
                println!("{}", "Attachments are disabled: no document extractor".yellow());
                return;
            }
            attach_file(argument, uploads).await;
        }
        "files" => {
            let uploads = uploads.read().await;
            let pending = uploads.list_pending();
            if pending.is_empty() {
                println!("{}", "No pending attachments".bright_black());
            }
            for file in pending {
                println!(
                    "{}",
                    format!("{}  {} ({})", file.id, file.name, format_size(file.size))
                        .bright_black()
                );
            }
        }
        "remove" => {
            if uploads.write().await.remove_file(argument) {
                println!("{}", "Attachment removed".bright_black());
            } else {
                println!("{}", "No such attachment".bright_black());
            }
        }
        "clear" => {
            orchestrator.clear().await;
            println!("{}", "Conversation cleared".bright_black());
            for message in &orchestrator.session().await.messages {
                render_reply(message);
            }
        }
        "copy" => match argument.parse::<usize>() {
            Ok(index) => copy_message(&orchestrator.session().await, index),
            Err(_) => println!("{}", "Usage: /copy <message number>".bright_black()),
        },
        _ => println!("{}", "Unknown command".bright_black()),
    }
}

/// Reads a file from disk and adds it to the pending attachments.
///
/// Validation and parse failures are immediate advisories; they never
/// touch the conversation state.
async fn attach_file(path: &str, uploads: &Arc<RwLock<UploadManager>>) {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("{}", format!("Could not read {path}: {err}").red());
            return;
        }
    };

    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let mime_type = if name.to_lowercase().ends_with(".pdf") {
        PDF_MIME_TYPE
    } else {
        "application/octet-stream"
    };

    let mut uploads = uploads.write().await;
    match uploads.add_file(&bytes, &name, mime_type) {
        Ok(file) => {
            println!(
                "{}",
                format!("Attached {} ({})", file.name, format_size(file.size)).green()
            );
        }
        Err(err @ QuillError::UnsupportedType { .. })
        | Err(err @ QuillError::FileTooLarge { .. })
        | Err(err @ QuillError::Parse(_)) => {
            println!("{}", format!("{err}").red());
        }
        Err(err) => {
            println!("{}", format!("Upload failed: {err}").red());
        }
    }
}
