//! Host platform seams
//!
//! Everything the browser provides is reached through one of these traits:
//! tab lookup, the toolbar badge, cookie enumeration, the active tab, and the
//! durable key-value store. `DomainQuery` is the aggregator's read surface,
//! defined here so readers never depend on the aggregator itself.

use crate::error::Result;
use crate::types::{Badge, Cookie, SessionKey};
use serde_json::Value;

/// Resolves a tab's current top-level document URL.
#[async_trait::async_trait]
pub trait TabLookup: Send + Sync {
    /// Fails when the tab was closed or is otherwise unavailable.
    async fn tab_url(&self, session: SessionKey) -> Result<String>;
}

/// Per-tab toolbar indicator.
#[async_trait::async_trait]
pub trait BadgeSink: Send + Sync {
    async fn set_badge(&self, session: SessionKey, badge: &Badge) -> Result<()>;
}

/// Live cookie enumeration by exact URL.
#[async_trait::async_trait]
pub trait CookieJar: Send + Sync {
    async fn cookies_for_url(&self, url: &str) -> Result<Vec<Cookie>>;
}

/// The tab the user is currently looking at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActiveTabInfo {
    pub session: SessionKey,
    pub url: String,
}

#[async_trait::async_trait]
pub trait ActiveTab: Send + Sync {
    async fn active_tab(&self) -> Result<ActiveTabInfo>;
}

/// Persistent key-value store shared across contexts.
///
/// Last write wins per key. No transactions.
#[async_trait::async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    async fn set(&self, key: &str, value: Value) -> Result<()>;

    /// Remove the given keys. Missing keys are not an error.
    async fn remove(&self, keys: &[String]) -> Result<()>;

    /// Whether the store survives process restart.
    fn is_durable(&self) -> bool {
        false
    }
}

/// Snapshot read of the third-party domains observed for a session.
pub trait DomainQuery: Send + Sync {
    /// Snapshot copy in first-seen order; empty for unknown sessions.
    fn third_party_domains(&self, session: &SessionKey) -> Vec<String>;
}
