use std::sync::Arc;
use std::time::Instant;

use dashmap::DashMap;
use tracing::{debug, info};

use super::{Session, SessionId};

#[derive(Debug)]
pub struct SessionEntry {
    pub method: &'static str,
    pub opened_at: Instant,
}

/// Tracks the sessions that are currently live.
///
/// Entries are inserted by [`open`](SessionRegistry::open) and removed when the
/// returned [`Session`] is dropped, so a session can't outlive its call.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SessionEntry, ahash::RandomState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::default(),
        }
    }

    pub fn open(self: &Arc<Self>, method: &'static str) -> Session {
        let id = SessionId::generate();
        self.sessions.insert(
            id,
            SessionEntry {
                method,
                opened_at: Instant::now(),
            },
        );

        info!(session_id = %id, method, "Session opened");
        Session::registered(id, method, Arc::clone(self))
    }

    pub(crate) fn remove(&self, id: &SessionId) {
        if let Some((_, entry)) = self.sessions.remove(id) {
            debug!(
                session_id = %id,
                method = entry.method,
                lifetime_ms = entry.opened_at.elapsed().as_millis() as u64,
                "Session released"
            );
        }
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
