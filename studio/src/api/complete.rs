//! Completion proxy endpoint
//!
//! The raw boundary contract the frontend can call without going through a
//! pane: `{ content, systemPrompt, originalContent? }` in, `{ response }`
//! out, `{ error }` with a non-2xx status on failure. The sentinel string
//! for a response without a text block still answers 200.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::ApiState;
use crate::completion::{CompletionError, CompletionRequest};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub content: String,
    pub system_prompt: String,
    pub original_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CompleteResponse {
    pub response: String,
}

pub async fn complete(
    State(state): State<ApiState>,
    Json(req): Json<CompleteRequest>,
) -> impl IntoResponse {
    let client = state.app_state.completion();
    let result = client
        .complete(CompletionRequest {
            content: req.content,
            instruction: req.system_prompt,
            anchor: req.original_content,
        })
        .await;

    match result {
        Ok(response) => (StatusCode::OK, Json(CompleteResponse { response })).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "completion proxy call failed");
            let status = match &e {
                CompletionError::Backend { status, .. } => StatusCode::from_u16(*status)
                    .unwrap_or(StatusCode::BAD_GATEWAY),
                CompletionError::Transport(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}
