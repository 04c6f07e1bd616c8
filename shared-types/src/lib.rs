//! Shared types between frontend and backend
//!
//! These types are used by both:
//! - The studio backend (native Rust)
//! - The browser frontend (via generated TypeScript bindings)
//!
//! Serializable with serde for JSON over HTTP

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ============================================================================
// Core Types
// ============================================================================

/// Unique identifier for an editing pane. Panes are seeded at startup with
/// fixed identifiers; the workspace never creates or deletes panes at runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, TS)]
#[ts(export)]
pub struct PaneId(pub String);

impl PaneId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PaneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// ============================================================================
// Transcript
// ============================================================================

/// One (user message, assistant response) pair in a pane's transcript.
/// The transcript is append-only and ordered by completion, not send, order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct Exchange {
    /// The text sent as the user turn of the completion request
    pub user: String,

    /// Raw model output, delimiter and all
    pub assistant: String,

    /// When the response was recorded
    pub at: DateTime<Utc>,
}

// ============================================================================
// Pane State
// ============================================================================

/// Where a pane currently sits in its review cycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaneStatus {
    /// No staged revision, review view closed
    Idle,
    /// At least one completion request is outstanding
    Requesting,
    /// A response has returned; review view visible
    ReviewOpen,
}

/// Snapshot of one pane, as rendered by the frontend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[ts(export)]
pub struct PaneSnapshot {
    pub id: PaneId,

    /// User-editable display label, no uniqueness constraint
    pub title: String,

    /// Current text content; ground truth for saved state
    pub document: String,

    /// Directive sent to the completion backend alongside the document
    pub instruction: String,

    pub transcript: Vec<Exchange>,

    /// Model-proposed replacement for `document`, pending user approval
    pub staged_revision: Option<String>,

    /// Whether the transcript/revision review view is visible
    pub review_open: bool,

    pub status: PaneStatus,
}

/// All panes, in seed order
#[derive(Debug, Clone, Serialize, Deserialize, Default, TS)]
#[ts(export)]
pub struct WorkspaceSnapshot {
    pub panes: Vec<PaneSnapshot>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pane_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&PaneStatus::ReviewOpen).unwrap(),
            "\"review_open\""
        );
        assert_eq!(
            serde_json::to_string(&PaneStatus::Idle).unwrap(),
            "\"idle\""
        );
    }

    #[test]
    fn test_pane_snapshot_round_trip() {
        let snapshot = PaneSnapshot {
            id: PaneId::from("1"),
            title: "Style & Flow".to_string(),
            document: "The cat sat.".to_string(),
            instruction: "Focus on grammar.".to_string(),
            transcript: vec![Exchange {
                user: "The cat sat.".to_string(),
                assistant: "Looks fine.".to_string(),
                at: Utc::now(),
            }],
            staged_revision: Some("The cat sat quietly.".to_string()),
            review_open: true,
            status: PaneStatus::ReviewOpen,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PaneSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_staged_revision_absent_serializes_as_null() {
        let snapshot = PaneSnapshot {
            id: PaneId::from("2"),
            title: String::new(),
            document: String::new(),
            instruction: String::new(),
            transcript: Vec::new(),
            staged_revision: None,
            review_open: false,
            status: PaneStatus::Idle,
        };
        let value = serde_json::to_value(&snapshot).unwrap();
        assert!(value["staged_revision"].is_null());
    }
}
