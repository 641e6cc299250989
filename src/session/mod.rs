//! Session lifecycle for greet calls.
//!
//! A [`Session`] is the live association between one call and one handler
//! invocation. It carries the termination state, which only ever moves
//! forward:
//!
//! ```text
//! Open ──► Closing ──► Closed
//!   │         │
//!   └────┬────┘
//!        ▼
//!      Failed
//! ```
//!
//! `Closing` is entered by the handler once its work is done (end of input, or
//! the last name sent). `Closed` is entered by the dispatcher after it has
//! released the stream handle.

pub mod deadline;
pub mod registry;
pub mod stream;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{InvalidTransition, SessionError};

pub use self::deadline::Deadline;
pub use self::registry::SessionRegistry;
pub use self::stream::{DuplexStream, SendHandle, SendStream, StreamHandle};

#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({})", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closing,
    Closed,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Closed | SessionState::Failed)
    }

    pub fn can_transition_to(self, next: SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, next),
            (Open, Closing) | (Open, Failed) | (Closing, Closed) | (Closing, Failed)
        )
    }
}

/// One handler invocation bound to one call.
///
/// A session opened through a [`SessionRegistry`] stays registered until it is
/// dropped.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    method: &'static str,
    state: SessionState,
    registry: Option<Arc<SessionRegistry>>,
}

impl Session {
    /// Create a session that is not tracked by any registry.
    pub fn new(method: &'static str) -> Self {
        Self {
            id: SessionId::generate(),
            method,
            state: SessionState::Open,
            registry: None,
        }
    }

    pub(crate) fn registered(
        id: SessionId,
        method: &'static str,
        registry: Arc<SessionRegistry>,
    ) -> Self {
        Self {
            id,
            method,
            state: SessionState::Open,
            registry: Some(registry),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transition(&mut self, next: SessionState) -> Result<(), InvalidTransition> {
        if !self.state.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        debug!(
            session_id = %self.id,
            method = self.method,
            from = ?self.state,
            to = ?next,
            "Session transition"
        );
        self.state = next;
        Ok(())
    }

    /// The handler has finished its work without error.
    pub fn mark_closing(&mut self) {
        if let Err(e) = self.transition(SessionState::Closing) {
            debug!(session_id = %self.id, error = %e, "Ignoring close request");
        }
    }

    /// Record `err` as the reason this session failed and hand it back.
    pub fn fail(&mut self, err: SessionError) -> SessionError {
        warn!(session_id = %self.id, method = self.method, error = %err, "Session failed");
        if let Err(e) = self.transition(SessionState::Failed) {
            debug!(session_id = %self.id, error = %e, "Session already terminated");
        }
        err
    }

    /// Called by the dispatcher once the stream handle has been released.
    pub fn finish(&mut self) {
        if self.state == SessionState::Closing {
            self.state = SessionState::Closed;
            info!(session_id = %self.id, method = self.method, "Session closed");
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.state.is_terminal() {
            debug!(session_id = %self.id, state = ?self.state, "Session dropped before termination");
        }

        if let Some(registry) = self.registry.take() {
            registry.remove(&self.id);
        }
    }
}
