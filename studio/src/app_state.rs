use ractor::ActorRef;
use std::sync::Arc;

use crate::completion::CompletionClient;
use crate::workspace::WorkspaceMsg;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    workspace: ActorRef<WorkspaceMsg>,
    completion: Arc<dyn CompletionClient>,
}

impl AppState {
    pub fn new(workspace: ActorRef<WorkspaceMsg>, completion: Arc<dyn CompletionClient>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                workspace,
                completion,
            }),
        }
    }

    pub fn workspace(&self) -> ActorRef<WorkspaceMsg> {
        self.inner.workspace.clone()
    }

    /// Direct client handle for the completion proxy route
    pub fn completion(&self) -> Arc<dyn CompletionClient> {
        self.inner.completion.clone()
    }
}
