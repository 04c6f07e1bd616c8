//! Pane review-cycle state machine
//!
//! Pure transition functions over one pane's state, driven by the workspace
//! actor. A pane moves Idle -> Requesting -> ReviewOpen and back to Idle on
//! apply-or-discard. Outstanding completion requests carry a monotonic
//! per-pane sequence number; a response whose sequence number is older than
//! one already applied is discarded, so the transcript reflects completion
//! order without ever appending out of order.

use std::collections::HashMap;

use chrono::Utc;
use shared_types::{Exchange, PaneId, PaneSnapshot, PaneStatus};

use crate::completion::parse;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanePhase {
    Idle,
    Requesting,
    ReviewOpen,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaneTransitionError {
    #[error("a review cycle is already open")]
    NotIdle,

    #[error("the review view is not open")]
    ReviewClosed,

    #[error("a completion request is still outstanding")]
    RequestOutstanding,
}

/// A completion request the caller must dispatch to the provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundRequest {
    pub seq: u64,
    pub content: String,
    pub instruction: String,
    pub anchor: Option<String>,
}

/// One editing context: document, instruction, transcript, and the staged
/// revision awaiting approval.
#[derive(Debug)]
pub struct Pane {
    pub id: PaneId,
    pub title: String,
    pub document: String,
    pub instruction: String,
    pub transcript: Vec<Exchange>,
    pub staged_revision: Option<String>,
    pub review_open: bool,

    /// Document snapshot captured when the review cycle began; follow-ups
    /// keep revising this anchor, not the latest staged draft
    anchor: Option<String>,

    /// Last allocated request sequence number
    next_seq: u64,

    /// Highest sequence number whose response has been applied
    applied_seq: u64,

    /// Sent message per outstanding request, keyed by sequence number
    pending: HashMap<u64, String>,

    /// Responses applied since the current cycle opened
    cycle_completed: u64,
}

impl Pane {
    pub fn new(id: impl Into<PaneId>, title: impl Into<String>, instruction: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            document: String::new(),
            instruction: instruction.into(),
            transcript: Vec::new(),
            staged_revision: None,
            review_open: false,
            anchor: None,
            next_seq: 0,
            applied_seq: 0,
            pending: HashMap::new(),
            cycle_completed: 0,
        }
    }

    pub fn phase(&self) -> PanePhase {
        if !self.pending.is_empty() {
            PanePhase::Requesting
        } else if self.review_open {
            PanePhase::ReviewOpen
        } else {
            PanePhase::Idle
        }
    }

    pub fn status(&self) -> PaneStatus {
        match self.phase() {
            PanePhase::Idle => PaneStatus::Idle,
            PanePhase::Requesting => PaneStatus::Requesting,
            PanePhase::ReviewOpen => PaneStatus::ReviewOpen,
        }
    }

    pub fn anchor(&self) -> Option<&str> {
        self.anchor.as_deref()
    }

    pub fn snapshot(&self) -> PaneSnapshot {
        PaneSnapshot {
            id: self.id.clone(),
            title: self.title.clone(),
            document: self.document.clone(),
            instruction: self.instruction.clone(),
            transcript: self.transcript.clone(),
            staged_revision: self.staged_revision.clone(),
            review_open: self.review_open,
            status: self.status(),
        }
    }

    fn issue(&mut self, content: String, anchor: Option<String>) -> OutboundRequest {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.pending.insert(seq, content.clone());
        OutboundRequest {
            seq,
            content,
            instruction: self.instruction.clone(),
            anchor,
        }
    }

    /// Open a review cycle: capture the current document as the anchor, open
    /// the review view, and issue a completion request for the document.
    pub fn begin_processing(&mut self) -> Result<OutboundRequest, PaneTransitionError> {
        if self.phase() != PanePhase::Idle {
            return Err(PaneTransitionError::NotIdle);
        }
        self.anchor = Some(self.document.clone());
        self.review_open = true;
        self.cycle_completed = 0;
        // The document itself is the user turn; no separate anchor needed
        Ok(self.issue(self.document.clone(), None))
    }

    /// Issue a follow-up request against the captured anchor. Whitespace-only
    /// input is a strict no-op. Allowed while an earlier request is still
    /// outstanding; whichever response completes last wins the staged draft.
    pub fn send_follow_up(
        &mut self,
        message: &str,
    ) -> Result<Option<OutboundRequest>, PaneTransitionError> {
        if !self.review_open {
            return Err(PaneTransitionError::ReviewClosed);
        }
        if message.trim().is_empty() {
            return Ok(None);
        }
        let anchor = self.anchor.clone();
        Ok(Some(self.issue(message.to_string(), anchor)))
    }

    /// Record a completed response. Returns false when the response was
    /// discarded: unknown sequence number, or stale because a newer response
    /// for this pane already landed.
    pub fn completion_arrived(&mut self, seq: u64, raw: &str) -> bool {
        let Some(sent) = self.pending.remove(&seq) else {
            return false;
        };
        if seq <= self.applied_seq {
            return false;
        }
        self.applied_seq = seq;
        self.cycle_completed += 1;

        let parsed = parse::parse(raw);
        self.transcript.push(Exchange {
            user: sent,
            assistant: raw.to_string(),
            at: Utc::now(),
        });
        // A clarifying answer with no revision must not erase a staged draft
        if let Some(revision) = parsed.revision {
            self.staged_revision = Some(revision);
        }
        true
    }

    /// A request failed in transport or at the backend: no transcript entry.
    /// If the cycle's first request failed with nothing else outstanding the
    /// review view falls back to Idle; otherwise the pane returns to
    /// ReviewOpen. Never leaves the pane stuck in Requesting.
    pub fn completion_failed(&mut self, seq: u64) {
        if self.pending.remove(&seq).is_none() {
            return;
        }
        if self.pending.is_empty() && self.cycle_completed == 0 {
            self.review_open = false;
            self.anchor = None;
        }
    }

    /// Overwrite the staged revision with user-typed text; no network call.
    pub fn edit_staged_revision(&mut self, text: String) -> Result<(), PaneTransitionError> {
        if !self.review_open {
            return Err(PaneTransitionError::ReviewClosed);
        }
        self.staged_revision = Some(text);
        Ok(())
    }

    /// Copy the staged revision into the document and close the review view.
    /// With no staged revision the document is unchanged but the view still
    /// closes.
    pub fn apply_revision(&mut self) -> Result<(), PaneTransitionError> {
        self.require_review_quiescent()?;
        if let Some(revision) = self.staged_revision.take() {
            self.document = revision;
        }
        self.close_review();
        Ok(())
    }

    /// Close the review view without touching the document. The staged
    /// revision and transcript are retained for the next review session.
    pub fn discard(&mut self) -> Result<(), PaneTransitionError> {
        self.require_review_quiescent()?;
        self.close_review();
        Ok(())
    }

    fn require_review_quiescent(&self) -> Result<(), PaneTransitionError> {
        match self.phase() {
            PanePhase::ReviewOpen => Ok(()),
            PanePhase::Requesting => Err(PaneTransitionError::RequestOutstanding),
            PanePhase::Idle => Err(PaneTransitionError::ReviewClosed),
        }
    }

    fn close_review(&mut self) {
        self.review_open = false;
        self.anchor = None;
        self.cycle_completed = 0;
    }
}
