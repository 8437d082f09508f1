//! Gemini REST API client.
//!
//! Calls the Gemini generateContent endpoint directly over HTTP.
//! Configuration is loaded from secret.json.

use crate::request::GenerateContentRequest;
use async_trait::async_trait;
use quill_core::config::{self, DEFAULT_GEMINI_MODEL};
use quill_core::error::{QuillError, Result};
use reqwest::Client;
use serde::Deserialize;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// The seam the turn orchestrator depends on: something that turns a
/// request payload into a reply text.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Performs a single generation call. No retries, no streaming.
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String>;

    /// Name of the model producing replies, recorded in message metadata.
    fn model_name(&self) -> &str;
}

/// Client for the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads configuration from secret.json
    ///
    /// Model name defaults to `gemini-2.0-flash` if not specified.
    pub fn try_from_config() -> Result<Self> {
        let secret_config = config::load_secret_config()?;
        let gemini_config = secret_config.gemini.ok_or_else(|| {
            QuillError::config("Gemini configuration not found in secret.json")
        })?;
        let model = gemini_config
            .model_name
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        Ok(Self::new(gemini_config.api_key, model))
    }

    /// Overrides the endpoint base URL. Intended for tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|err| QuillError::network(format!("Gemini API request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            return Err(QuillError::api(status.as_u16(), error_message(&body)));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|err| {
            QuillError::format(format!("Failed to parse Gemini response: {err}"))
        })?;

        extract_text_response(parsed)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Option<Vec<PartResponse>>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// Extracts the first candidate's first part's text from the envelope.
fn extract_text_response(response: GenerateContentResponse) -> Result<String> {
    response
        .candidates
        .and_then(|mut candidates| {
            if candidates.is_empty() {
                None
            } else {
                Some(candidates.swap_remove(0))
            }
        })
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .and_then(|mut parts| {
            if parts.is_empty() {
                None
            } else {
                parts.swap_remove(0).text
            }
        })
        .ok_or_else(|| QuillError::format("unexpected response shape"))
}

/// Pulls a readable message out of the Gemini error envelope, falling
/// back to the raw body when it does not parse.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Content, Part};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    fn hello_request() -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: "Hello".to_string(),
                }],
            }],
        }
    }

    /// Serves exactly one canned HTTP response on a local port.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            // The request body is a JSON object, so it ends in '}'.
            let mut received = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&chunk[..n]);
                if received.ends_with(b"}") {
                    break;
                }
            }
            let response = format!(
                "{status_line}\r\ncontent-type: application/json\r\n\
                 content-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_generate_parses_reply_over_http() {
        let base = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi there"}]}}]}"#,
        )
        .await;
        let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(base);

        let reply = client.generate(&hello_request()).await.unwrap();

        assert_eq!(reply, "Hi there");
    }

    #[tokio::test]
    async fn test_generate_surfaces_http_status_as_api_error() {
        let base = serve_once(
            "HTTP/1.1 500 Internal Server Error",
            r#"{"error":{"code":500,"message":"internal error","status":"INTERNAL"}}"#,
        )
        .await;
        let client = GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(base);

        let err = client.generate(&hello_request()).await.unwrap_err();

        match err {
            QuillError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "INTERNAL: internal error");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_maps_connection_failure_to_network_error() {
        // Bind to learn a free port, then close it before the request.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client =
            GeminiClient::new("test-key", "gemini-2.0-flash").with_base_url(format!("http://{addr}"));

        let err = client.generate(&hello_request()).await.unwrap_err();

        assert!(matches!(err, QuillError::Network(_)), "got {err:?}");
    }

    #[test]
    fn test_extracts_first_candidate_first_part() {
        let response = parse(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hi there"},{"text":"ignored"}]}},
                {"content":{"parts":[{"text":"also ignored"}]}}]}"#,
        );
        assert_eq!(extract_text_response(response).unwrap(), "Hi there");
    }

    #[test]
    fn test_missing_candidates_is_a_format_error() {
        for body in [
            "{}",
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{}]}"#,
            r#"{"candidates":[{"content":{}}]}"#,
            r#"{"candidates":[{"content":{"parts":[]}}]}"#,
            r#"{"candidates":[{"content":{"parts":[{}]}}]}"#,
        ] {
            let err = extract_text_response(parse(body)).unwrap_err();
            assert!(
                matches!(err, QuillError::Format(_)),
                "body {body} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_error_message_from_envelope() {
        let body = r#"{"error":{"code":429,"message":"quota exceeded","status":"RESOURCE_EXHAUSTED"}}"#;
        assert_eq!(error_message(body), "RESOURCE_EXHAUSTED: quota exceeded");
    }

    #[test]
    fn test_error_message_falls_back_to_raw_body() {
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }
}
