//! Registry of in-flight streaming sessions.
//!
//! A streaming session has to outlive the call that started it: its task is
//! still delivering frames after the caller has returned. [`Sessions`] holds
//! a strong reference to every running session and drops it exactly once,
//! from the session's own completion callback.

use crate::Status;
use parking_lot::Mutex;
use std::{
    collections::BTreeMap,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

/// Opaque identity of a streaming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionId(u64);

impl SessionId {
    /// Allocate a fresh identifier, unique for the life of the process.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// What the registry needs to know about a session.
pub trait Session: Send + Sync {
    /// The session identity.
    fn id(&self) -> SessionId;

    /// The session lifecycle state.
    fn status(&self) -> Status;
}

/// Thread-safe set of live sessions keyed by [`SessionId`].
///
/// Every read-modify-write happens under one mutex, so appends and removals
/// from different threads never lose an update.
#[derive(Default)]
pub struct Sessions {
    sessions: Mutex<BTreeMap<SessionId, Arc<dyn Session>>>,
}

impl Sessions {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of a session.
    ///
    /// Returns `false` if a session with the same id is already registered;
    /// the registered one is kept.
    pub fn append(&self, session: Arc<dyn Session>) -> bool {
        let id = session.id();
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&id) {
            tracing::warn!("{id} is already registered");
            return false;
        }
        sessions.insert(id, session);
        tracing::trace!(live = sessions.len(), "registered {id}");
        true
    }

    /// Remove every session matching `predicate`, returning how many were
    /// removed. Each session is visited at most once.
    pub fn remove_all(&self, mut predicate: impl FnMut(&dyn Session) -> bool) -> usize {
        let mut sessions = self.sessions.lock();
        let before = sessions.len();
        sessions.retain(|_, session| !predicate(session.as_ref()));
        before - sessions.len()
    }

    /// Remove one session by identity.
    pub fn remove(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        let removed = self.sessions.lock().remove(&id);
        if removed.is_some() {
            tracing::trace!("released {id}");
        }
        removed
    }

    /// Get a session by identity.
    pub fn get(&self, id: SessionId) -> Option<Arc<dyn Session>> {
        self.sessions.lock().get(&id).cloned()
    }

    /// Whether a session is registered.
    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().contains_key(&id)
    }

    /// Identifiers of every registered session, in creation order.
    pub fn ids(&self) -> Vec<SessionId> {
        self.sessions.lock().keys().copied().collect()
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
