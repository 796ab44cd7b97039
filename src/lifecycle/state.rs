//! Process lifecycle state.
//!
//! ```text
//! Starting ──bind ok──▶ Running ──signal / stop──▶ ShutDown
//!     └────────────startup failure────────────────────▲
//! ```

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Starting,
    Running,
    ShutDown,
}

impl ServerState {
    /// Whether `self → next` is an edge of the lifecycle graph.
    pub fn can_transition_to(self, next: ServerState) -> bool {
        matches!(
            (self, next),
            (ServerState::Starting, ServerState::Running)
                | (ServerState::Starting | ServerState::Running, ServerState::ShutDown)
        )
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerState::Starting => f.write_str("STARTING"),
            ServerState::Running => f.write_str("RUNNING"),
            ServerState::ShutDown => f.write_str("SHUT_DOWN"),
        }
    }
}

/// Shared, observable lifecycle state.
#[derive(Debug, Clone)]
pub struct LifecycleState {
    tx: Arc<watch::Sender<ServerState>>,
}

impl LifecycleState {
    /// Starts in [`ServerState::Starting`].
    pub fn new() -> Self {
        let (tx, _) = watch::channel(ServerState::Starting);
        Self { tx: Arc::new(tx) }
    }

    pub fn current(&self) -> ServerState {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ServerState> {
        self.tx.subscribe()
    }

    /// Move to `next` if the lifecycle allows it. Returns whether it moved.
    pub fn transition(&self, next: ServerState) -> bool {
        self.tx.send_if_modified(|state| {
            if !state.can_transition_to(next) {
                return false;
            }
            tracing::info!(from = %state, to = %next, "Lifecycle transition");
            *state = next;
            true
        })
    }
}

impl Default for LifecycleState {
    fn default() -> Self {
        Self::new()
    }
}
