//! Per-visitor listing state.
//!
//! Each visitor who asks for more posts gets their own [`ListingController`],
//! addressed by a random session id carried in the page URL. Sessions live in
//! memory only and are dropped after sitting idle.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::debug;

use super::{ListingController, PaginationState};

const SESSION_ID_LEN: usize = 22;

/// Default cap on concurrently held sessions.
const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// Opaque listing session identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    fn generate() -> Self {
        let id = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LEN)
            .map(char::from)
            .collect();
        Self(id)
    }

    /// Parse an id received from a client. Rejects anything we could not have issued.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.len() == SESSION_ID_LEN && raw.chars().all(|c| c.is_ascii_alphanumeric()))
            .then(|| Self(raw.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

struct Entry {
    controller: Arc<ListingController>,
    last_used: Instant,
}

/// In-memory map of listing sessions with idle expiry.
pub struct ListingSessions {
    sessions: RwLock<HashMap<SessionId, Entry>>,
    idle: Duration,
    max_sessions: usize,
}

impl ListingSessions {
    #[must_use]
    pub fn new(idle: Duration) -> Self {
        Self::with_capacity(idle, DEFAULT_MAX_SESSIONS)
    }

    #[must_use]
    pub fn with_capacity(idle: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle,
            max_sessions: max_sessions.max(1),
        }
    }

    /// Start a new session from `state`.
    pub fn create(&self, state: PaginationState) -> (SessionId, Arc<ListingController>) {
        let id = SessionId::generate();
        let controller = Arc::new(ListingController::new(state));

        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let idle = self.idle;
        sessions.retain(|_, entry| entry.last_used.elapsed() < idle);

        if sessions.len() >= self.max_sessions {
            if let Some(oldest) = sessions
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(id, _)| id.clone())
            {
                debug!(session = %oldest, "Evicting least recently used listing session");
                sessions.remove(&oldest);
            }
        }

        sessions.insert(
            id.clone(),
            Entry {
                controller: controller.clone(),
                last_used: Instant::now(),
            },
        );
        debug!(session = %id, active = sessions.len(), "Created listing session");

        (id, controller)
    }

    /// Look up a live session and mark it as used.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<Arc<ListingController>> {
        let mut sessions = self
            .sessions
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let expired = sessions
            .get(id)
            .is_some_and(|entry| entry.last_used.elapsed() >= self.idle);
        if expired {
            sessions.remove(id);
            return None;
        }

        sessions.get_mut(id).map(|entry| {
            entry.last_used = Instant::now();
            entry.controller.clone()
        })
    }

    /// Number of sessions currently held, including expired ones not yet swept.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
