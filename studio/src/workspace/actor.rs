//! WorkspaceActor - owns the pane collection and routes user actions
//!
//! One actor for the whole workspace: panes are plain records updated
//! atomically inside the actor's message loop, so fine-grained field updates
//! carry no shared-state hazard. Completion calls never block the loop; each
//! outbound request runs in a spawned task that casts the result back as a
//! `CompletionArrived` message.

use async_trait::async_trait;
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use std::sync::Arc;

use shared_types::{Exchange, PaneSnapshot, WorkspaceSnapshot};

use crate::completion::{CompletionClient, CompletionError, CompletionRequest};
use crate::workspace::pane::{OutboundRequest, Pane, PaneTransitionError};
use crate::workspace::templates::{instruction_for, InstructionTemplate};

/// Actor that manages workspace pane state
#[derive(Debug, Default)]
pub struct WorkspaceActor;

/// Arguments for spawning WorkspaceActor
pub struct WorkspaceArguments {
    pub completion: Arc<dyn CompletionClient>,
}

/// State for WorkspaceActor
pub struct WorkspaceState {
    panes: Vec<Pane>,
    completion: Arc<dyn CompletionClient>,
}

// ============================================================================
// Messages
// ============================================================================

/// Messages handled by WorkspaceActor
pub enum WorkspaceMsg {
    /// Update a pane's display label; unknown pane id is a silent no-op
    SetTitle {
        pane_id: String,
        title: String,
        reply: RpcReplyPort<()>,
    },
    /// Update a pane's document text; unknown pane id is a silent no-op
    SetDocument {
        pane_id: String,
        document: String,
        reply: RpcReplyPort<()>,
    },
    /// Update a pane's instruction text; unknown pane id is a silent no-op
    SetInstruction {
        pane_id: String,
        instruction: String,
        reply: RpcReplyPort<()>,
    },
    /// Replace a pane's transcript wholesale; unknown pane id is a silent no-op
    SetTranscript {
        pane_id: String,
        transcript: Vec<Exchange>,
        reply: RpcReplyPort<()>,
    },
    /// Set the instruction from a named template; unknown names clear it
    SelectTemplate {
        pane_id: String,
        name: String,
        reply: RpcReplyPort<()>,
    },
    /// Open a review cycle and request a revision of the pane's document
    BeginProcessing {
        pane_id: String,
        reply: RpcReplyPort<Result<PaneSnapshot, WorkspaceError>>,
    },
    /// Send a follow-up message anchored to the cycle's original document.
    /// The reply says whether a request was actually dispatched; whitespace
    /// input is a no-op and the snapshot alone cannot tell the two apart
    /// while an earlier request is still outstanding.
    SendFollowUp {
        pane_id: String,
        message: String,
        reply: RpcReplyPort<Result<FollowUpOutcome, WorkspaceError>>,
    },
    /// Overwrite the staged revision with user-typed text
    EditStagedRevision {
        pane_id: String,
        text: String,
        reply: RpcReplyPort<Result<PaneSnapshot, WorkspaceError>>,
    },
    /// Copy the staged revision into the document and close the review
    ApplyRevision {
        pane_id: String,
        reply: RpcReplyPort<Result<PaneSnapshot, WorkspaceError>>,
    },
    /// Close the review without touching the document
    Discard {
        pane_id: String,
        reply: RpcReplyPort<Result<PaneSnapshot, WorkspaceError>>,
    },
    /// All pane snapshots in seed order
    GetWorkspace {
        reply: RpcReplyPort<WorkspaceSnapshot>,
    },
    /// One pane snapshot
    GetPane {
        pane_id: String,
        reply: RpcReplyPort<Option<PaneSnapshot>>,
    },
    /// Internal: a spawned completion task resolved
    CompletionArrived {
        pane_id: String,
        seq: u64,
        result: Result<String, CompletionError>,
    },
}

// ============================================================================
// Error Types
// ============================================================================

/// Reply for `SendFollowUp`
#[derive(Debug, Clone)]
pub struct FollowUpOutcome {
    /// False when the message was whitespace-only and nothing was sent
    pub dispatched: bool,
    pub snapshot: PaneSnapshot,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum WorkspaceError {
    #[error("pane not found: {0}")]
    PaneNotFound(String),

    #[error(transparent)]
    Transition(#[from] PaneTransitionError),
}

// ============================================================================
// Actor Implementation
// ============================================================================

/// Fixed pane seeds: ids, titles, and default instructions
fn seed_panes() -> Vec<Pane> {
    vec![
        Pane::new(
            "1",
            "Style & Flow",
            InstructionTemplate::StyleEditor.instruction(),
        ),
        Pane::new(
            "2",
            "Grammar & Technical",
            InstructionTemplate::GrammarEditor.instruction(),
        ),
        Pane::new(
            "3",
            "Story Structure",
            InstructionTemplate::StoryEditor.instruction(),
        ),
        Pane::new(
            "4",
            "Custom Editor",
            "Customize this editor for your specific needs...",
        ),
    ]
}

fn find_pane<'a>(panes: &'a mut [Pane], pane_id: &str) -> Option<&'a mut Pane> {
    panes.iter_mut().find(|pane| pane.id.as_str() == pane_id)
}

/// Hand an outbound request to a spawned task; the result comes back as a
/// `CompletionArrived` cast.
fn dispatch_completion(
    myself: &ActorRef<WorkspaceMsg>,
    completion: Arc<dyn CompletionClient>,
    pane_id: String,
    request: OutboundRequest,
) {
    let myself = myself.clone();
    tokio::spawn(async move {
        let result = completion
            .complete(CompletionRequest {
                content: request.content,
                instruction: request.instruction,
                anchor: request.anchor,
            })
            .await;
        if let Err(e) = myself.cast(WorkspaceMsg::CompletionArrived {
            pane_id,
            seq: request.seq,
            result,
        }) {
            tracing::warn!(error = %e, "workspace actor gone before completion result delivery");
        }
    });
}

#[async_trait]
impl Actor for WorkspaceActor {
    type Msg = WorkspaceMsg;
    type State = WorkspaceState;
    type Arguments = WorkspaceArguments;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        let panes = seed_panes();
        tracing::info!(
            actor_id = %myself.get_id(),
            panes = panes.len(),
            "WorkspaceActor starting"
        );
        Ok(WorkspaceState {
            panes,
            completion: args.completion,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WorkspaceMsg::SetTitle {
                pane_id,
                title,
                reply,
            } => {
                match find_pane(&mut state.panes, &pane_id) {
                    Some(pane) => pane.title = title,
                    None => tracing::debug!(%pane_id, "ignoring title update for unknown pane"),
                }
                let _ = reply.send(());
            }
            WorkspaceMsg::SetDocument {
                pane_id,
                document,
                reply,
            } => {
                match find_pane(&mut state.panes, &pane_id) {
                    Some(pane) => pane.document = document,
                    None => tracing::debug!(%pane_id, "ignoring document update for unknown pane"),
                }
                let _ = reply.send(());
            }
            WorkspaceMsg::SetInstruction {
                pane_id,
                instruction,
                reply,
            } => {
                match find_pane(&mut state.panes, &pane_id) {
                    Some(pane) => pane.instruction = instruction,
                    None => {
                        tracing::debug!(%pane_id, "ignoring instruction update for unknown pane")
                    }
                }
                let _ = reply.send(());
            }
            WorkspaceMsg::SetTranscript {
                pane_id,
                transcript,
                reply,
            } => {
                match find_pane(&mut state.panes, &pane_id) {
                    Some(pane) => pane.transcript = transcript,
                    None => tracing::debug!(%pane_id, "ignoring transcript update for unknown pane"),
                }
                let _ = reply.send(());
            }
            WorkspaceMsg::SelectTemplate {
                pane_id,
                name,
                reply,
            } => {
                match find_pane(&mut state.panes, &pane_id) {
                    Some(pane) => pane.instruction = instruction_for(&name).to_string(),
                    None => tracing::debug!(%pane_id, "ignoring template select for unknown pane"),
                }
                let _ = reply.send(());
            }
            WorkspaceMsg::BeginProcessing { pane_id, reply } => {
                let result = match find_pane(&mut state.panes, &pane_id) {
                    None => Err(WorkspaceError::PaneNotFound(pane_id.clone())),
                    Some(pane) => match pane.begin_processing() {
                        Ok(request) => {
                            tracing::info!(%pane_id, seq = request.seq, "issuing revision request");
                            let snapshot = pane.snapshot();
                            dispatch_completion(
                                &myself,
                                state.completion.clone(),
                                pane_id,
                                request,
                            );
                            Ok(snapshot)
                        }
                        Err(e) => Err(e.into()),
                    },
                };
                let _ = reply.send(result);
            }
            WorkspaceMsg::SendFollowUp {
                pane_id,
                message,
                reply,
            } => {
                let result = match find_pane(&mut state.panes, &pane_id) {
                    None => Err(WorkspaceError::PaneNotFound(pane_id.clone())),
                    Some(pane) => match pane.send_follow_up(&message) {
                        Ok(Some(request)) => {
                            tracing::info!(%pane_id, seq = request.seq, "issuing follow-up request");
                            let snapshot = pane.snapshot();
                            dispatch_completion(
                                &myself,
                                state.completion.clone(),
                                pane_id,
                                request,
                            );
                            Ok(FollowUpOutcome {
                                dispatched: true,
                                snapshot,
                            })
                        }
                        // Whitespace-only input: strict no-op
                        Ok(None) => Ok(FollowUpOutcome {
                            dispatched: false,
                            snapshot: pane.snapshot(),
                        }),
                        Err(e) => Err(e.into()),
                    },
                };
                let _ = reply.send(result);
            }
            WorkspaceMsg::EditStagedRevision {
                pane_id,
                text,
                reply,
            } => {
                let result = match find_pane(&mut state.panes, &pane_id) {
                    None => Err(WorkspaceError::PaneNotFound(pane_id)),
                    Some(pane) => pane
                        .edit_staged_revision(text)
                        .map(|()| pane.snapshot())
                        .map_err(Into::into),
                };
                let _ = reply.send(result);
            }
            WorkspaceMsg::ApplyRevision { pane_id, reply } => {
                let result = match find_pane(&mut state.panes, &pane_id) {
                    None => Err(WorkspaceError::PaneNotFound(pane_id)),
                    Some(pane) => pane
                        .apply_revision()
                        .map(|()| pane.snapshot())
                        .map_err(Into::into),
                };
                let _ = reply.send(result);
            }
            WorkspaceMsg::Discard { pane_id, reply } => {
                let result = match find_pane(&mut state.panes, &pane_id) {
                    None => Err(WorkspaceError::PaneNotFound(pane_id)),
                    Some(pane) => pane
                        .discard()
                        .map(|()| pane.snapshot())
                        .map_err(Into::into),
                };
                let _ = reply.send(result);
            }
            WorkspaceMsg::GetWorkspace { reply } => {
                let snapshot = WorkspaceSnapshot {
                    panes: state.panes.iter().map(Pane::snapshot).collect(),
                };
                let _ = reply.send(snapshot);
            }
            WorkspaceMsg::GetPane { pane_id, reply } => {
                let snapshot = state
                    .panes
                    .iter()
                    .find(|pane| pane.id.as_str() == pane_id)
                    .map(Pane::snapshot);
                let _ = reply.send(snapshot);
            }
            WorkspaceMsg::CompletionArrived {
                pane_id,
                seq,
                result,
            } => match find_pane(&mut state.panes, &pane_id) {
                Some(pane) => match result {
                    Ok(raw) => {
                        if pane.completion_arrived(seq, &raw) {
                            tracing::info!(%pane_id, seq, "completion response applied");
                        } else {
                            tracing::debug!(%pane_id, seq, "discarded stale completion response");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(%pane_id, seq, error = %e, "completion request failed");
                        pane.completion_failed(seq);
                    }
                },
                None => tracing::debug!(%pane_id, seq, "completion result for unknown pane"),
            },
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::PaneStatus;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Completion client that replays a fixed script of results
    struct ScriptedClient {
        script: Mutex<VecDeque<Result<String, CompletionError>>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<String, CompletionError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(&self, _req: CompletionRequest) -> Result<String, CompletionError> {
            self.script
                .lock()
                .expect("script lock poisoned")
                .pop_front()
                .unwrap_or_else(|| Ok("unscripted".to_string()))
        }
    }

    async fn spawn_workspace(
        script: Vec<Result<String, CompletionError>>,
    ) -> ActorRef<WorkspaceMsg> {
        let (workspace, _handle) = Actor::spawn(
            None,
            WorkspaceActor,
            WorkspaceArguments {
                completion: ScriptedClient::new(script),
            },
        )
        .await
        .expect("failed to spawn workspace");
        workspace
    }

    async fn get_pane(workspace: &ActorRef<WorkspaceMsg>, pane_id: &str) -> PaneSnapshot {
        ractor::call!(workspace, |reply| WorkspaceMsg::GetPane {
            pane_id: pane_id.to_string(),
            reply,
        })
        .expect("rpc failed")
        .expect("pane missing")
    }

    /// Poll until the pane leaves Requesting; completion tasks are async
    async fn wait_until_quiescent(
        workspace: &ActorRef<WorkspaceMsg>,
        pane_id: &str,
    ) -> PaneSnapshot {
        for _ in 0..200 {
            let snapshot = get_pane(workspace, pane_id).await;
            if snapshot.status != PaneStatus::Requesting {
                return snapshot;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("pane {pane_id} stuck in Requesting");
    }

    #[tokio::test]
    async fn test_workspace_seeds_four_panes() {
        let workspace = spawn_workspace(vec![]).await;
        let snapshot =
            ractor::call!(workspace, |reply| WorkspaceMsg::GetWorkspace { reply }).unwrap();

        assert_eq!(snapshot.panes.len(), 4);
        assert_eq!(snapshot.panes[0].id.as_str(), "1");
        assert_eq!(snapshot.panes[0].title, "Style & Flow");
        assert_eq!(snapshot.panes[3].title, "Custom Editor");
        assert!(snapshot.panes[1]
            .instruction
            .starts_with("Focus on grammar"));
    }

    #[tokio::test]
    async fn test_cat_sat_scenario_end_to_end() {
        let workspace = spawn_workspace(vec![Ok(
            "Looks fine.\n---REVISED VERSION---\nThe cat sat quietly.".to_string(),
        )])
        .await;

        ractor::call!(workspace, |reply| WorkspaceMsg::SetDocument {
            pane_id: "1".to_string(),
            document: "The cat sat.".to_string(),
            reply,
        })
        .unwrap();
        ractor::call!(workspace, |reply| WorkspaceMsg::SetInstruction {
            pane_id: "1".to_string(),
            instruction: "Focus on grammar.".to_string(),
            reply,
        })
        .unwrap();

        let snapshot = ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "1".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();
        assert_eq!(snapshot.status, PaneStatus::Requesting);
        assert!(snapshot.review_open);

        let snapshot = wait_until_quiescent(&workspace, "1").await;
        assert_eq!(snapshot.status, PaneStatus::ReviewOpen);
        assert_eq!(
            snapshot.staged_revision.as_deref(),
            Some("The cat sat quietly.")
        );
        assert_eq!(snapshot.transcript.len(), 1);
        assert_eq!(snapshot.transcript[0].user, "The cat sat.");
        assert_eq!(snapshot.document, "The cat sat.");

        let snapshot = ractor::call!(workspace, |reply| WorkspaceMsg::ApplyRevision {
            pane_id: "1".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();
        assert_eq!(snapshot.document, "The cat sat quietly.");
        assert_eq!(snapshot.status, PaneStatus::Idle);
    }

    #[tokio::test]
    async fn test_completion_failure_reverts_first_request_to_idle() {
        let workspace = spawn_workspace(vec![Err(CompletionError::Backend {
            status: 500,
            message: "Failed to process request".to_string(),
        })])
        .await;

        ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "2".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();

        let snapshot = wait_until_quiescent(&workspace, "2").await;
        assert_eq!(snapshot.status, PaneStatus::Idle);
        assert!(snapshot.transcript.is_empty());
    }

    #[tokio::test]
    async fn test_follow_up_empty_message_is_noop() {
        let workspace = spawn_workspace(vec![Ok("ok".to_string())]).await;

        ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "3".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();
        let before = wait_until_quiescent(&workspace, "3").await;

        let after = ractor::call!(workspace, |reply| WorkspaceMsg::SendFollowUp {
            pane_id: "3".to_string(),
            message: "   ".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();

        assert!(!after.dispatched);
        assert_eq!(after.snapshot.status, PaneStatus::ReviewOpen);
        assert_eq!(after.snapshot.transcript, before.transcript);
    }

    #[tokio::test]
    async fn test_unknown_pane_mutations_are_silent_noops() {
        let workspace = spawn_workspace(vec![]).await;

        ractor::call!(workspace, |reply| WorkspaceMsg::SetTitle {
            pane_id: "99".to_string(),
            title: "ghost".to_string(),
            reply,
        })
        .unwrap();
        ractor::call!(workspace, |reply| WorkspaceMsg::SetDocument {
            pane_id: "99".to_string(),
            document: "ghost".to_string(),
            reply,
        })
        .unwrap();

        let snapshot =
            ractor::call!(workspace, |reply| WorkspaceMsg::GetWorkspace { reply }).unwrap();
        assert_eq!(snapshot.panes.len(), 4);
        assert!(snapshot.panes.iter().all(|pane| pane.document.is_empty()));
    }

    #[tokio::test]
    async fn test_select_template_known_and_unknown() {
        let workspace = spawn_workspace(vec![]).await;

        ractor::call!(workspace, |reply| WorkspaceMsg::SelectTemplate {
            pane_id: "4".to_string(),
            name: "dialogueEditor".to_string(),
            reply,
        })
        .unwrap();
        let snapshot = get_pane(&workspace, "4").await;
        assert!(snapshot.instruction.starts_with("Focus on making dialogue"));

        ractor::call!(workspace, |reply| WorkspaceMsg::SelectTemplate {
            pane_id: "4".to_string(),
            name: "notATemplate".to_string(),
            reply,
        })
        .unwrap();
        let snapshot = get_pane(&workspace, "4").await;
        assert_eq!(snapshot.instruction, "");
    }

    #[tokio::test]
    async fn test_begin_processing_unknown_pane_errors() {
        let workspace = spawn_workspace(vec![]).await;
        let result = ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "99".to_string(),
            reply,
        })
        .unwrap();
        assert!(matches!(result, Err(WorkspaceError::PaneNotFound(_))));
    }

    #[tokio::test]
    async fn test_begin_processing_twice_rejected() {
        let workspace = spawn_workspace(vec![Ok("ok".to_string()), Ok("ok".to_string())]).await;

        ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "1".to_string(),
            reply,
        })
        .unwrap()
        .unwrap();

        let second = ractor::call!(workspace, |reply| WorkspaceMsg::BeginProcessing {
            pane_id: "1".to_string(),
            reply,
        })
        .unwrap();
        assert!(matches!(
            second,
            Err(WorkspaceError::Transition(PaneTransitionError::NotIdle))
        ));
    }
}
