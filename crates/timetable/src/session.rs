//! Per-user planning sessions held by the server.

use crate::planner::{Grid, GridCache, SearchTicket, SessionState};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A session key derived from the client's session token.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a session key from a raw token.
    ///
    /// The token is hashed so it is never stored or logged.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        // Use first 16 bytes as hex string
        let hash = result[..16].iter().map(|b| format!("{:02x}", b)).collect();
        Self(hash)
    }

    /// Returns the internal hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show first 8 chars for privacy
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

struct SessionEntry {
    state: SessionState,
    grid: Arc<GridCache>,
    last_seen: Instant,
}

impl SessionEntry {
    fn new() -> Self {
        Self {
            state: SessionState::default(),
            grid: Arc::new(GridCache::new()),
            last_seen: Instant::now(),
        }
    }
}

/// Thread-safe map of session snapshots.
///
/// Each update runs under the entry's shard lock and replaces the snapshot
/// wholesale, so concurrent requests of one session are serialised. Sessions
/// idle for longer than the configured TTL are dropped by
/// [`Self::cleanup_expired`].
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<SessionKey, SessionEntry>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of the session, empty if it does not exist yet.
    pub fn snapshot(&self, key: &SessionKey) -> SessionState {
        match self.sessions.get_mut(key) {
            Some(mut entry) => {
                entry.last_seen = Instant::now();
                entry.state.clone()
            }
            None => SessionState::default(),
        }
    }

    /// Replaces the session's snapshot with the one computed by `f`.
    pub fn update<T>(&self, key: &SessionKey, f: impl FnOnce(&SessionState) -> (SessionState, T)) -> T {
        let mut entry = self.sessions.entry(key.clone()).or_insert_with(SessionEntry::new);
        entry.last_seen = Instant::now();
        let (next, output) = f(&entry.state);
        entry.state = next;
        output
    }

    /// Like [`Self::update`], but leaves the snapshot untouched when `f` fails.
    pub fn try_update<T, E>(
        &self,
        key: &SessionKey,
        f: impl FnOnce(&SessionState) -> Result<(SessionState, T), E>,
    ) -> Result<T, E> {
        let mut entry = self.sessions.entry(key.clone()).or_insert_with(SessionEntry::new);
        entry.last_seen = Instant::now();
        let (next, output) = f(&entry.state)?;
        entry.state = next;
        Ok(output)
    }

    /// Issues a search ticket, invalidating any search still in flight.
    pub fn begin_search(&self, key: &SessionKey) -> SearchTicket {
        self.update(key, SessionState::begin_search)
    }

    /// Projects the session's current grid, reusing the last projection when
    /// the committed and secondary sets are unchanged.
    pub fn grid(&self, key: &SessionKey, days: &[String], slots: &[String]) -> Arc<Grid> {
        let (state, cache) = match self.sessions.get_mut(key) {
            Some(mut entry) => {
                entry.last_seen = Instant::now();
                (entry.state.clone(), entry.grid.clone())
            }
            None => (SessionState::default(), Arc::new(GridCache::new())),
        };
        cache.get_or_project(state.committed(), state.secondary(), days, slots)
    }

    /// Projects `state` through the session's grid cache.
    ///
    /// Used when a response must show the grid of the exact snapshot an
    /// update produced, even if a later request has replaced it since.
    pub fn grid_for(
        &self,
        key: &SessionKey,
        state: &SessionState,
        days: &[String],
        slots: &[String],
    ) -> Arc<Grid> {
        let cache = self
            .sessions
            .get(key)
            .map(|entry| entry.grid.clone())
            .unwrap_or_default();
        cache.get_or_project(state.committed(), state.secondary(), days, slots)
    }

    /// Drops sessions not touched within `idle_ttl`. Returns how many were
    /// removed.
    pub fn cleanup_expired(&self, idle_ttl: Duration) -> usize {
        self.cleanup_idle_at(Instant::now(), idle_ttl)
    }

    fn cleanup_idle_at(&self, now: Instant, idle_ttl: Duration) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, entry| {
            let keep = now.saturating_duration_since(entry.last_seen) < idle_ttl;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
