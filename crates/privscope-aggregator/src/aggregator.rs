//! Event handlers and query surface
//!
//! Three independent feeds arrive here: request completions, sensor
//! messages, and tab closure. Every failure is contained at the handler
//! boundary: a handler logs and returns, it never propagates.

use crate::domains::DomainTable;
use privscope_core::{
    host_of, is_third_party, Badge, BadgeSink, DomainQuery, DurableStore, PrivscopeConfig,
    RecordKind, RequestCompleted, SensorMessage, SessionKey, TabLookup,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Aggregator settings.
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    pub badge: Badge,
    pub purge_records_on_close: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self::from(&PrivscopeConfig::default())
    }
}

impl From<&PrivscopeConfig> for AggregatorConfig {
    fn from(config: &PrivscopeConfig) -> Self {
        Self {
            badge: config.badge(),
            purge_records_on_close: config.teardown.purge_records_on_close,
        }
    }
}

pub struct Aggregator {
    domains: DomainTable,
    tabs: Arc<dyn TabLookup>,
    badge: Arc<dyn BadgeSink>,
    store: Arc<dyn DurableStore>,
    config: AggregatorConfig,
}

impl Aggregator {
    pub fn new(
        tabs: Arc<dyn TabLookup>,
        badge: Arc<dyn BadgeSink>,
        store: Arc<dyn DurableStore>,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            domains: DomainTable::new(),
            tabs,
            badge,
            store,
            config,
        }
    }

    pub fn store(&self) -> &Arc<dyn DurableStore> {
        &self.store
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Network feed
    // -----------------------------------------------------------------------

    /// A request completed somewhere in the browser. Records its host if it
    /// is third-party relative to the owning tab's current document.
    pub async fn handle_request_completed(&self, request: RequestCompleted) {
        let Some(session) = SessionKey::from_tab_id(request.tab_id) else {
            return;
        };
        let Some(host) = host_of(&request.url) else {
            debug!("Ignoring request without host on tab {}: {}", session, request.url);
            return;
        };
        debug!("Request made to: {} on tab {}", host, session);

        // The tab may navigate or close while this lookup is pending.
        let epoch = self.domains.epoch(&session);
        let tab_url = match self.tabs.tab_url(session).await {
            Ok(url) => url,
            Err(e) => {
                warn!("Error getting tab information for tab {}: {}", session, e);
                return;
            }
        };
        let Some(main_host) = host_of(&tab_url) else {
            debug!("Tab {} has no main host ({}), dropping request", session, tab_url);
            return;
        };
        debug!("Main domain for tab {}: {}", session, main_host);

        if !is_third_party(&host, &main_host) {
            return;
        }
        if self.domains.insert_at(session, &host, epoch) {
            info!("Third-party domain detected on tab {}: {}", session, host);
        } else if self.domains.epoch(&session) != epoch {
            debug!("Tab {} closed during lookup, dropping {}", session, host);
        }
    }

    // -----------------------------------------------------------------------
    // Message feed
    // -----------------------------------------------------------------------

    /// A sensor message arrived. `sender` is `None` for messages that did not
    /// originate in a tab.
    pub async fn handle_message(&self, sender: Option<SessionKey>, payload: Value) {
        let Some(session) = sender else {
            return;
        };
        debug!("Message received from tab {}: {}", session, payload);

        let message = match SensorMessage::decode(&payload) {
            Ok(message) => message,
            Err(e) => {
                warn!("Dropping malformed message from tab {}: {}", session, e);
                return;
            }
        };
        let Some(kind) = message.record_kind() else {
            debug!("Ignoring unknown message type from tab {}", session);
            return;
        };

        if kind == RecordKind::StorageData {
            if let Err(e) = self.badge.set_badge(session, &self.config.badge).await {
                warn!("Failed to set badge for tab {}: {}", session, e);
            }
        }

        let key = kind.store_key(&session);
        match self.store.set(&key, payload).await {
            Ok(()) => match &message {
                SensorMessage::StorageData(snapshot) => info!(
                    "Storage data saved for tab {}: {} local, {} session",
                    session,
                    snapshot.local_storage.len(),
                    snapshot.session_storage.len()
                ),
                SensorMessage::CanvasAccess { method } => {
                    info!("Canvas access detected on tab {}: {}", session, method)
                }
                SensorMessage::PotentialHijacking { message } => {
                    info!("Potential hijacking detected on tab {}: {}", session, message)
                }
                SensorMessage::Unknown => {}
            },
            Err(e) => warn!("Failed to persist {} for tab {}: {}", key, session, e),
        }
    }

    // -----------------------------------------------------------------------
    // Tab lifecycle
    // -----------------------------------------------------------------------

    /// A tab closed. Its domain set is always dropped; its durable records
    /// only when `purge_records_on_close` is set.
    pub async fn handle_tab_removed(&self, tab_id: i64) {
        let Some(session) = SessionKey::from_tab_id(tab_id) else {
            return;
        };
        info!("Tab closed: {}. Cleaning up data.", session);
        self.domains.remove(&session);

        if self.config.purge_records_on_close {
            let keys: Vec<String> = RecordKind::ALL
                .iter()
                .map(|kind| kind.store_key(&session))
                .collect();
            if let Err(e) = self.store.remove(&keys).await {
                warn!("Failed to purge records for tab {}: {}", session, e);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Query surface
    // -----------------------------------------------------------------------

    pub fn third_party_domains(&self, session: &SessionKey) -> Vec<String> {
        self.domains.snapshot(session)
    }

    /// Number of sessions currently holding a domain set.
    pub fn tracked_sessions(&self) -> usize {
        self.domains.len()
    }
}

impl DomainQuery for Aggregator {
    fn third_party_domains(&self, session: &SessionKey) -> Vec<String> {
        self.domains.snapshot(session)
    }
}
