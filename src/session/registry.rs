use dashmap::{mapref::entry::Entry, DashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::ClientRequest;

/// At most one undelivered request is buffered per session.
pub const SESSION_CHANNEL_CAPACITY: usize = 1;

/// Opaque correlation key of one open event stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Maps live session ids to the sending half of their delivery channel.
///
/// Constructed once at startup and shared as `Arc<SessionRegistry>` through
/// `AppState`. The map is the only shared mutable state of the bridge.
pub struct SessionRegistry {
    sessions: DashMap<SessionId, mpsc::Sender<ClientRequest>>,
}

/// A freshly registered session, owned by the stream that drains it.
pub struct SessionHandle {
    pub id: SessionId,
    pub receiver: mpsc::Receiver<ClientRequest>,
    pub guard: SessionGuard,
}

/// Deregisters its session when dropped.
pub struct SessionGuard {
    registry: Arc<SessionRegistry>,
    id: SessionId,
}

impl SessionGuard {
    pub fn id(&self) -> SessionId {
        self.id
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.registry.remove_session(&self.id) {
            info!("🔌 Session closed: {}", self.id);
        }
    }
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Register a new session and hand back the receiving half of its channel.
    pub fn create_session(&self) -> (SessionId, mpsc::Receiver<ClientRequest>) {
        let (sender, receiver) = mpsc::channel(SESSION_CHANNEL_CAPACITY);

        loop {
            let id = SessionId::new();
            match self.sessions.entry(id) {
                Entry::Occupied(_) => {
                    warn!("⚠️  Session id collision on {}, regenerating", id);
                }
                Entry::Vacant(slot) => {
                    slot.insert(sender);
                    debug!("Registered session {} ({} active)", id, self.sessions.len());
                    return (id, receiver);
                }
            }
        }
    }

    /// Like [`create_session`](Self::create_session), with a guard that
    /// removes the entry once the owner goes away.
    pub fn open_session(self: &Arc<Self>) -> SessionHandle {
        let (id, receiver) = self.create_session();
        SessionHandle {
            id,
            receiver,
            guard: SessionGuard {
                registry: Arc::clone(self),
                id,
            },
        }
    }

    pub fn lookup(&self, id: &SessionId) -> Option<mpsc::Sender<ClientRequest>> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    /// Returns whether an entry was removed. Safe to call more than once.
    ///
    /// Removing a live session drops the registry's sender, so its stream
    /// runs to completion once in-flight dispatches finish.
    pub fn remove_session(&self, id: &SessionId) -> bool {
        let removed = self.sessions.remove(id).is_some();
        if removed {
            debug!("Deregistered session {} ({} active)", id, self.sessions.len());
        }
        removed
    }

    /// Close every session; used on shutdown.
    pub fn close_all(&self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        if count > 0 {
            info!("🛑 Closed {} active session(s)", count);
        }
        count
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
