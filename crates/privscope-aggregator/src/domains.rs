//! Per-session third-party domain sets

use dashmap::DashMap;
use privscope_core::{DomainQuery, SessionKey};

/// Session → distinct third-party hostnames, kept in first-seen order.
///
/// Entries are created on first insert and only removed by `remove`. A set
/// never shrinks while its session lives.
///
/// Each session also carries an epoch that `remove` bumps. Writers that
/// captured an older epoch before awaiting are rejected by `insert_at`, so a
/// closed tab cannot be resurrected by a handler that was still in flight.
/// Lock order is always `epochs` then `sessions`.
#[derive(Default)]
pub struct DomainTable {
    sessions: DashMap<SessionKey, Vec<String>>,
    epochs: DashMap<SessionKey, u64>,
}

impl DomainTable {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            epochs: DashMap::new(),
        }
    }

    /// Current teardown epoch for `session`. Starts at 0.
    pub fn epoch(&self, session: &SessionKey) -> u64 {
        self.epochs.get(session).map(|e| *e).unwrap_or(0)
    }

    /// Like `insert`, but only if `session` has not been removed since
    /// `epoch` was read. Returns `false` for a stale writer.
    pub fn insert_at(&self, session: SessionKey, host: &str, epoch: u64) -> bool {
        // Held across the insert so a concurrent `remove` waits for us.
        let current = self.epochs.get(&session);
        if current.as_deref().copied().unwrap_or(0) != epoch {
            return false;
        }
        self.insert(session, host)
    }

    /// Insert `host` for `session`. Returns `true` if it was not already
    /// present. The entry lock is held for the check-and-push, so concurrent
    /// writers to the same session cannot duplicate a host.
    pub fn insert(&self, session: SessionKey, host: &str) -> bool {
        let mut hosts = self.sessions.entry(session).or_default();
        if hosts.iter().any(|h| h == host) {
            return false;
        }
        hosts.push(host.to_string());
        true
    }

    pub fn snapshot(&self, session: &SessionKey) -> Vec<String> {
        self.sessions
            .get(session)
            .map(|hosts| hosts.clone())
            .unwrap_or_default()
    }

    /// Drop the session's set and fence out writers from before this call.
    pub fn remove(&self, session: &SessionKey) -> Option<Vec<String>> {
        let mut epoch = self.epochs.entry(*session).or_insert(0);
        *epoch += 1;
        self.sessions.remove(session).map(|(_, hosts)| hosts)
    }

    /// Number of sessions with at least one recorded host.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl DomainQuery for DomainTable {
    fn third_party_domains(&self, session: &SessionKey) -> Vec<String> {
        self.snapshot(session)
    }
}
