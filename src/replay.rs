//! Trace replay
//!
//! Feeds a parsed trace through the simulated browser into a live aggregator
//! event loop, then asks the reporter for the focused tab's report.
//!
//! Tab state in the simulated browser changes as soon as the driver reads a
//! lifecycle event, while request completions are classified later on the
//! aggregator's tasks. A request followed immediately by `tabUpdated` for the
//! same tab is therefore racy, the same as in a real browser.

use std::collections::HashMap;
use std::sync::Arc;

use privscope_aggregator::{Aggregator, AggregatorConfig, EventLoopStats};
use privscope_core::{
    Badge, BrowserEvent, CanvasMethod, Cookie, PrivscopeConfig, RequestCompleted, SessionKey,
};
use privscope_reporter::{ReportBundle, ScoreReporter};
use privscope_sensors::{
    CanvasContext2d, CanvasElement, InjectedPage, Location, PageApis, RuntimeSender,
    SensorInjection,
};
use privscope_store::open_store;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::sim::{SimCanvas, SimContext, SimLocation, SimulatedBrowser};
use crate::trace::TraceEvent;

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Report on this tab instead of the one focused at the end of the trace.
    pub focus: Option<u32>,
}

pub struct ReplayOutcome {
    pub report: ReportBundle,
    pub stats: EventLoopStats,
    /// Badge shown on the reported tab, if any.
    pub badge: Option<Badge>,
    /// Trace events that could not be applied.
    pub skipped: usize,
}

/// Replay `events` and report. Cancelling `cancel` stops the event loop
/// early; the report then reflects whatever was processed.
pub async fn replay(
    events: &[TraceEvent],
    config: &PrivscopeConfig,
    options: &ReplayOptions,
    cancel: CancellationToken,
) -> anyhow::Result<ReplayOutcome> {
    let store = open_store(&config.store).await?;
    let browser = Arc::new(SimulatedBrowser::new());
    let aggregator = Arc::new(Aggregator::new(
        browser.clone(),
        browser.clone(),
        store.clone(),
        AggregatorConfig::from(config),
    ));

    let (tx, rx) = mpsc::channel(config.events.channel_capacity.max(1));
    let event_loop = tokio::spawn(aggregator.clone().run(rx, cancel));

    let mut driver = Driver {
        browser: browser.clone(),
        tx,
        pages: HashMap::new(),
        skipped: 0,
    };
    for (i, event) in events.iter().enumerate() {
        if !driver.apply(event).await {
            warn!("Event loop closed, {} trace events not replayed", events.len() - i);
            break;
        }
    }
    let skipped = driver.skipped;
    // Pages hold sender clones; the loop only ends once all are gone.
    drop(driver);

    let stats = event_loop.await?;
    info!(
        "Replayed {} trace events ({} skipped), {} browser events, {} tabs with third-party domains",
        events.len(),
        skipped,
        stats.total(),
        aggregator.tracked_sessions()
    );

    if let Some(tab) = options.focus {
        browser.activate(SessionKey::new(tab)).await?;
    }

    let reporter = ScoreReporter::new(aggregator, store, browser.clone(), browser.clone());
    let report = reporter.report().await?;
    let badge = browser.badge(&report.session);

    Ok(ReplayOutcome {
        report,
        stats,
        badge,
        skipped,
    })
}

type SimPage = InjectedPage<SimCanvas, SimContext, SimLocation>;

struct Driver {
    browser: Arc<SimulatedBrowser>,
    tx: mpsc::Sender<BrowserEvent>,
    pages: HashMap<SessionKey, SimPage>,
    skipped: usize,
}

impl Driver {
    /// Apply one trace event. Returns false once the event loop is gone.
    async fn apply(&mut self, event: &TraceEvent) -> bool {
        debug!("Trace event: {}", event.name());
        match event {
            TraceEvent::TabOpened { tab_id, url } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                self.pages.remove(&session);
                self.browser.open_tab(session, url).await;
            }

            TraceEvent::TabUpdated { tab_id, url } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                // New document, the old sensors go with the old page.
                self.pages.remove(&session);
                if !self.browser.update_tab(session, url) {
                    self.skip(event, "tab is not open");
                }
            }

            TraceEvent::TabClosed { tab_id } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                self.pages.remove(&session);
                self.browser.close_tab(session).await;
                return self.deliver(BrowserEvent::TabRemoved { tab_id: *tab_id }).await;
            }

            TraceEvent::Activate { tab_id } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                if let Err(e) = self.browser.activate(session).await {
                    self.skip(event, &e.to_string());
                }
            }

            TraceEvent::Request { tab_id, url } => {
                return self
                    .deliver(BrowserEvent::RequestCompleted(RequestCompleted {
                        tab_id: *tab_id,
                        url: url.clone(),
                    }))
                    .await;
            }

            TraceEvent::PageLoad {
                tab_id,
                local_storage,
                session_storage,
            } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                if !self.reserve().await {
                    return false;
                }
                let sink = Arc::new(RuntimeSender::new(self.tx.clone(), Some(session)));
                let page = SensorInjection::inject(
                    PageApis {
                        local_storage: local_storage.clone(),
                        session_storage: session_storage.clone(),
                        canvas: SimCanvas,
                        context_2d: SimContext,
                        location: SimLocation,
                    },
                    sink,
                );
                self.pages.insert(session, page);
            }

            TraceEvent::CanvasRead { tab_id, method } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                if !self.reserve().await {
                    return false;
                }
                let Some(page) = self.pages.get(&session) else {
                    self.skip(event, "no page loaded in tab");
                    return true;
                };
                match method {
                    CanvasMethod::ToDataUrl => {
                        let _ = page.canvas.to_data_url(None, None);
                    }
                    CanvasMethod::GetImageData => {
                        let _ = page.context_2d.get_image_data(0, 0, 1, 1);
                    }
                }
            }

            TraceEvent::Navigate { tab_id, url } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                if !self.reserve().await {
                    return false;
                }
                let Some(page) = self.pages.get(&session) else {
                    self.skip(event, "no page loaded in tab");
                    return true;
                };
                let _ = page.location.assign(url);
            }

            TraceEvent::Unload { tab_id } => {
                let Some(session) = self.session(*tab_id, event) else { return true };
                if !self.reserve().await {
                    return false;
                }
                match self.pages.remove(&session) {
                    Some(page) => page.unload.on_before_unload(),
                    None => self.skip(event, "no page loaded in tab"),
                }
            }

            TraceEvent::Message { tab_id, payload } => {
                return self
                    .deliver(BrowserEvent::RuntimeMessage {
                        sender: tab_id.and_then(SessionKey::from_tab_id),
                        payload: payload.clone(),
                    })
                    .await;
            }

            TraceEvent::Cookie {
                url,
                name,
                value,
                domain,
            } => {
                self.browser
                    .add_cookie(url, Cookie::new(name.clone(), value.clone(), domain.clone()));
            }
        }
        true
    }

    fn session(&mut self, tab_id: i64, event: &TraceEvent) -> Option<SessionKey> {
        let session = SessionKey::from_tab_id(tab_id);
        if session.is_none() {
            self.skip(event, "negative tab id");
        }
        session
    }

    fn skip(&mut self, event: &TraceEvent, reason: &str) {
        warn!("Skipping {} event: {}", event.name(), reason);
        self.skipped += 1;
    }

    async fn deliver(&self, event: BrowserEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Wait for a free slot so the next sensor `try_send` is not dropped.
    /// The driver is the only producer, so the slot is still free when the
    /// sensor fires.
    async fn reserve(&self) -> bool {
        self.tx.reserve().await.is_ok()
    }
}
