//! HTTP API routes for the Redraft studio backend

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde_json::json;

pub mod complete;
pub mod panes;

use crate::app_state::AppState;

#[derive(Clone)]
pub struct ApiState {
    pub app_state: AppState,
}

/// Configure all API routes
pub fn router() -> Router<ApiState> {
    Router::new()
        .route("/health", get(health_check))
        // Workspace routes
        .route("/workspace", get(panes::get_workspace))
        .route("/panes/{id}", get(panes::get_pane))
        .route("/panes/{id}/title", patch(panes::set_title))
        .route("/panes/{id}/document", patch(panes::set_document))
        .route("/panes/{id}/instruction", patch(panes::set_instruction))
        .route("/panes/{id}/transcript", patch(panes::set_transcript))
        .route("/panes/{id}/template", post(panes::select_template))
        // Review-cycle routes
        .route("/panes/{id}/process", post(panes::begin_processing))
        .route("/panes/{id}/follow-up", post(panes::send_follow_up))
        .route("/panes/{id}/revision", patch(panes::edit_revision))
        .route("/panes/{id}/revision/apply", post(panes::apply_revision))
        .route("/panes/{id}/revision/discard", post(panes::discard_review))
        // Completion proxy route
        .route("/complete", post(complete::complete))
}

/// Health check endpoint
pub async fn health_check(State(_state): State<ApiState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
        "status": "healthy",
        "service": "redraft-studio",
        "version": "0.1.0"
        })),
    )
}
