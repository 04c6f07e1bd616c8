//! Workspace and pane API endpoints
//!
//! Thin HTTP shims over the workspace actor. Field mutations keep the
//! actor's silent no-op semantics for unknown pane ids; state-machine
//! operations surface machine-readable error envelopes instead, since they
//! must address a real pane to mean anything.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use shared_types::Exchange;

use crate::api::ApiState;
use crate::workspace::{WorkspaceError, WorkspaceMsg};

/// Pane error codes for machine-readable error responses
#[derive(Debug, Clone)]
pub enum PaneErrorCode {
    PaneNotFound,
    InvalidPhase,
    ActorUnavailable,
}

impl PaneErrorCode {
    fn as_str(&self) -> &'static str {
        match self {
            PaneErrorCode::PaneNotFound => "PANE_NOT_FOUND",
            PaneErrorCode::InvalidPhase => "INVALID_PHASE",
            PaneErrorCode::ActorUnavailable => "ACTOR_UNAVAILABLE",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            PaneErrorCode::PaneNotFound => StatusCode::NOT_FOUND,
            PaneErrorCode::InvalidPhase => StatusCode::CONFLICT,
            PaneErrorCode::ActorUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response structures
#[derive(Debug, Serialize)]
pub struct PaneErrorDetail {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct PaneErrorResponse {
    error: PaneErrorDetail,
}

/// Create an error response
fn pane_error(code: PaneErrorCode, message: impl Into<String>) -> axum::response::Response {
    let status = code.status_code();
    let body = Json(PaneErrorResponse {
        error: PaneErrorDetail {
            code: code.as_str().to_string(),
            message: message.into(),
        },
    });
    (status, body).into_response()
}

fn workspace_error(e: WorkspaceError) -> axum::response::Response {
    match &e {
        WorkspaceError::PaneNotFound(_) => pane_error(PaneErrorCode::PaneNotFound, e.to_string()),
        WorkspaceError::Transition(_) => pane_error(PaneErrorCode::InvalidPhase, e.to_string()),
    }
}

fn rpc_error(e: impl std::fmt::Display) -> axum::response::Response {
    pane_error(
        PaneErrorCode::ActorUnavailable,
        format!("workspace actor unavailable: {e}"),
    )
}

// ============================================================================
// Snapshot routes
// ============================================================================

pub async fn get_workspace(State(state): State<ApiState>) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::GetWorkspace { reply }) {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(e) => rpc_error(e),
    }
}

pub async fn get_pane(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::GetPane {
        pane_id: id.clone(),
        reply,
    }) {
        Ok(Some(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(None) => pane_error(PaneErrorCode::PaneNotFound, format!("pane not found: {id}")),
        Err(e) => rpc_error(e),
    }
}

// ============================================================================
// Field mutation routes (silent no-op on unknown id)
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SetTitleRequest {
    pub title: String,
}

pub async fn set_title(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<SetTitleRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SetTitle {
        pane_id: id,
        title: req.title,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetDocumentRequest {
    pub document: String,
}

pub async fn set_document(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<SetDocumentRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SetDocument {
        pane_id: id,
        document: req.document,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetInstructionRequest {
    pub instruction: String,
}

pub async fn set_instruction(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<SetInstructionRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SetInstruction {
        pane_id: id,
        instruction: req.instruction,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetTranscriptRequest {
    pub transcript: Vec<Exchange>,
}

pub async fn set_transcript(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<SetTranscriptRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SetTranscript {
        pane_id: id,
        transcript: req.transcript,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectTemplateRequest {
    pub name: String,
}

pub async fn select_template(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<SelectTemplateRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SelectTemplate {
        pane_id: id,
        name: req.name,
        reply,
    }) {
        Ok(()) => (StatusCode::OK, Json(json!({ "ok": true }))).into_response(),
        Err(e) => rpc_error(e),
    }
}

// ============================================================================
// Review-cycle routes
// ============================================================================

pub async fn begin_processing(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
        pane_id: id,
        reply,
    }) {
        Ok(Ok(snapshot)) => (StatusCode::ACCEPTED, Json(snapshot)).into_response(),
        Ok(Err(e)) => workspace_error(e),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct FollowUpRequest {
    pub message: String,
}

pub async fn send_follow_up(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<FollowUpRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::SendFollowUp {
        pane_id: id,
        message: req.message,
        reply,
    }) {
        Ok(Ok(outcome)) => {
            // 202 when a request was issued, 200 for the whitespace no-op
            let status = if outcome.dispatched {
                StatusCode::ACCEPTED
            } else {
                StatusCode::OK
            };
            (status, Json(outcome.snapshot)).into_response()
        }
        Ok(Err(e)) => workspace_error(e),
        Err(e) => rpc_error(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct EditRevisionRequest {
    pub text: String,
}

pub async fn edit_revision(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    Json(req): Json<EditRevisionRequest>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::EditStagedRevision {
        pane_id: id,
        text: req.text,
        reply,
    }) {
        Ok(Ok(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(Err(e)) => workspace_error(e),
        Err(e) => rpc_error(e),
    }
}

pub async fn apply_revision(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::ApplyRevision {
        pane_id: id,
        reply,
    }) {
        Ok(Ok(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(Err(e)) => workspace_error(e),
        Err(e) => rpc_error(e),
    }
}

pub async fn discard_review(
    State(state): State<ApiState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let workspace = state.app_state.workspace();
    match ractor::call!(workspace, |reply| WorkspaceMsg::Discard {
        pane_id: id,
        reply,
    }) {
        Ok(Ok(snapshot)) => (StatusCode::OK, Json(snapshot)).into_response(),
        Ok(Err(e)) => workspace_error(e),
        Err(e) => rpc_error(e),
    }
}
