//! Completion provider client
//!
//! Owns the single request/response call to the model provider so the
//! workspace actor can stay focused on state transitions. Stateless per
//! invocation: identical inputs always produce independent network calls.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::completion::parse::REVISION_DELIMITER;

/// Returned in place of model output when the response carries no text block.
/// Soft failure: the pane stays responsive and the sentinel lands in the
/// transcript like any other answer.
pub const RESPONSE_SENTINEL: &str = "Unable to process response";

/// Fixed assistant persona prepended to every caller-supplied instruction
const PERSONA: &str = "You are an AI writing assistant.";

const PERSONA_SUFFIX: &str = "Please provide specific, constructive feedback and suggestions. \
     Focus on improving the writing while maintaining the author's voice and intent. \
     Be clear and concise in your responses.";

/// One completion call: the user-turn content plus the directive shaping it
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Sent as the single user-turn message
    pub content: String,

    /// Pane instruction (or caller-supplied system prompt on the proxy route)
    pub instruction: String,

    /// Anchor document for follow-up revision requests. The backend is told
    /// to keep revising this snapshot, not its latest draft.
    pub anchor: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum CompletionError {
    #[error("completion transport error: {0}")]
    Transport(String),

    #[error("completion backend error ({status}): {message}")]
    Backend { status: u16, message: String },
}

/// Boundary to the model provider. Object-safe so tests can inject a
/// scripted implementation through the workspace actor's arguments.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, req: CompletionRequest) -> Result<String, CompletionError>;
}

/// Build the system-level directive for a revision request: persona, the
/// caller's instruction, the revised-version emission contract, and the
/// anchor document when one is provided.
pub fn system_directive(instruction: &str, anchor: Option<&str>) -> String {
    let mut directive = format!("{PERSONA} {instruction} {PERSONA_SUFFIX}");
    directive.push_str(&format!(
        "\n\nFirst analyze the text, then provide a complete revised version of the document. \
         Put the revised version after a line containing exactly {REVISION_DELIMITER}"
    ));
    if let Some(anchor) = anchor {
        directive.push_str(&format!(
            "\n\nThe original document being revised is:\n{anchor}\n\nKeep revising this \
             original document rather than your own previous drafts."
        ));
    }
    directive
}

// ============================================================================
// Anthropic Messages API client
// ============================================================================

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Client for an Anthropic-compatible messages endpoint
pub struct AnthropicClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(base_url: String, api_key: String, model: String, max_tokens: u32) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
            max_tokens,
        }
    }

    /// Construct from the process environment. Only the API key is required;
    /// everything else has a default.
    pub fn from_env() -> Result<Self, CompletionError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| CompletionError::Transport("ANTHROPIC_API_KEY is not set".to_string()))?;
        let base_url = std::env::var("ANTHROPIC_BASE_URL")
            .unwrap_or_else(|_| "https://api.anthropic.com".to_string());
        let model = std::env::var("REDRAFT_MODEL")
            .unwrap_or_else(|_| "claude-3-sonnet-20240229".to_string());
        let max_tokens = std::env::var("REDRAFT_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1024);
        Ok(Self::new(base_url, api_key, model, max_tokens))
    }

    /// First text-typed content block, or the sentinel when none exists
    fn first_text_block(response: MessagesResponse) -> String {
        response
            .content
            .into_iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text)
            .unwrap_or_else(|| RESPONSE_SENTINEL.to_string())
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, req: CompletionRequest) -> Result<String, CompletionError> {
        let system = system_directive(&req.instruction, req.anchor.as_deref());

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "system": system,
                "messages": [{ "role": "user", "content": req.content }],
            }))
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .map(|detail| detail.message)
                .unwrap_or(body);
            return Err(CompletionError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        Ok(Self::first_text_block(body))
    }
}
