//! Score reporter
//!
//! Pull-side of the system. On demand it resolves the active tab, snapshots
//! the aggregator's domain set, reads the three durable records and the
//! cookie jar, then scores the result. Reads have no side effects, so a
//! dropped `report()` future needs no cleanup.

use crate::cookies::{summarize_cookies, CookieSummary};
use crate::format::format_item;
use crate::score::{calculate_privacy_score, PrivacyScore, ScoreInputs};
use chrono::{DateTime, Utc};
use privscope_core::{
    ActiveTab, CanvasAccessRecord, CanvasMethod, CookieJar, DomainQuery, DurableStore,
    HijackRecord, RecordKind, Result, SessionKey, StorageEntry, StorageSnapshot,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Everything a renderer needs for one tab.
#[derive(Clone, Debug, Serialize)]
pub struct ReportBundle {
    pub session: SessionKey,
    pub url: String,

    pub third_party_domain_count: usize,
    pub cookie_count: usize,
    pub local_storage_count: usize,
    pub session_storage_count: usize,

    /// Readback method of the last canvas access, if any.
    pub canvas_access: Option<CanvasMethod>,
    /// Cause of the last hijack report, if any.
    pub hijacking: Option<String>,

    pub score: PrivacyScore,

    pub third_party_domains: Vec<String>,
    pub cookies: CookieSummary,
    pub local_storage: Vec<StorageEntry>,
    pub session_storage: Vec<StorageEntry>,

    pub generated_at: DateTime<Utc>,
}

/// The expandable lists of a report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailList {
    ThirdPartyDomains,
    Cookies,
    LocalStorage,
    SessionStorage,
}

impl DetailList {
    pub const ALL: [DetailList; 4] = [
        DetailList::ThirdPartyDomains,
        DetailList::Cookies,
        DetailList::LocalStorage,
        DetailList::SessionStorage,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Self::ThirdPartyDomains => "Third-party domains",
            Self::Cookies => "Cookies",
            Self::LocalStorage => "Local storage",
            Self::SessionStorage => "Session storage",
        }
    }
}

impl ReportBundle {
    pub fn inputs(&self) -> ScoreInputs {
        ScoreInputs {
            third_party_domains: self.third_party_domain_count,
            cookies: self.cookie_count,
            local_storage_items: self.local_storage_count,
            session_storage_items: self.session_storage_count,
            canvas_access: self.canvas_access.is_some(),
            hijacking_attempt: self.hijacking.is_some(),
        }
    }

    /// Formatted, escaped items of one list, in stored order.
    pub fn detail_items(&self, list: DetailList) -> Vec<String> {
        let raw: Vec<Value> = match list {
            DetailList::ThirdPartyDomains => self
                .third_party_domains
                .iter()
                .map(|domain| Value::String(domain.clone()))
                .collect(),
            DetailList::Cookies => self
                .cookies
                .cookies
                .iter()
                .map(|c| json!({ "name": c.name, "value": c.value, "domain": c.domain }))
                .collect(),
            DetailList::LocalStorage => pairs(&self.local_storage),
            DetailList::SessionStorage => pairs(&self.session_storage),
        };
        raw.iter().map(format_item).collect()
    }
}

fn pairs(entries: &[StorageEntry]) -> Vec<Value> {
    entries.iter().map(|(k, v)| json!([k, v])).collect()
}

pub struct ScoreReporter {
    domains: Arc<dyn DomainQuery>,
    store: Arc<dyn DurableStore>,
    cookies: Arc<dyn CookieJar>,
    tabs: Arc<dyn ActiveTab>,
}

impl ScoreReporter {
    pub fn new(
        domains: Arc<dyn DomainQuery>,
        store: Arc<dyn DurableStore>,
        cookies: Arc<dyn CookieJar>,
        tabs: Arc<dyn ActiveTab>,
    ) -> Self {
        Self {
            domains,
            store,
            cookies,
            tabs,
        }
    }

    /// Build the report for the active tab. Fails only when there is no
    /// active tab; every other missing input counts as "no signal".
    pub async fn report(&self) -> Result<ReportBundle> {
        let active = self.tabs.active_tab().await?;
        let session = active.session;

        let third_party_domains = self.domains.third_party_domains(&session);

        let store = self.store.as_ref();
        let (storage, canvas, hijack) = tokio::join!(
            read_record::<StorageSnapshot>(store, RecordKind::StorageData, &session),
            read_record::<CanvasAccessRecord>(store, RecordKind::CanvasAccess, &session),
            read_record::<HijackRecord>(store, RecordKind::Hijacking, &session),
        );
        let storage = storage.unwrap_or_default();

        let cookies = summarize_cookies(self.cookies.as_ref(), &active.url).await;

        let inputs = ScoreInputs {
            third_party_domains: third_party_domains.len(),
            cookies: cookies.total,
            local_storage_items: storage.local_storage.len(),
            session_storage_items: storage.session_storage.len(),
            canvas_access: canvas.is_some(),
            hijacking_attempt: hijack.is_some(),
        };
        debug!("Score inputs for session {}: {:?}", session, inputs);
        let score = calculate_privacy_score(&inputs);
        info!("Privacy score for session {} ({}): {}", session, active.url, score);

        Ok(ReportBundle {
            session,
            url: active.url,
            third_party_domain_count: inputs.third_party_domains,
            cookie_count: inputs.cookies,
            local_storage_count: inputs.local_storage_items,
            session_storage_count: inputs.session_storage_items,
            canvas_access: canvas.map(|record| record.method),
            hijacking: hijack.map(|record| record.message),
            score,
            third_party_domains,
            cookies,
            local_storage: storage.local_storage,
            session_storage: storage.session_storage,
            generated_at: Utc::now(),
        })
    }
}

/// Read and decode one record. Absent, unreadable and malformed records all
/// come back as `None`; the latter two are logged.
async fn read_record<T: DeserializeOwned>(
    store: &dyn DurableStore,
    kind: RecordKind,
    session: &SessionKey,
) -> Option<T> {
    let key = kind.store_key(session);
    match store.get(&key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Ignoring malformed record {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read {}: {}", key, e);
            None
        }
    }
}
