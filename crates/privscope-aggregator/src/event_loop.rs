//! Browser event loop
//!
//! Request completions are spawned so their tab lookups interleave, the way
//! the platform delivers them. Messages and tab closures are handled in
//! arrival order, which keeps last-write-wins per record kind meaningful.

use crate::aggregator::Aggregator;
use privscope_core::BrowserEvent;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info};

/// Events processed by one `run`, per kind.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLoopStats {
    pub requests: usize,
    pub messages: usize,
    pub tabs_removed: usize,
}

impl EventLoopStats {
    pub fn total(&self) -> usize {
        self.requests + self.messages + self.tabs_removed
    }
}

impl Aggregator {
    /// Consume events until the channel closes or `cancel` fires. In-flight
    /// request handlers are awaited before returning.
    pub async fn run(
        self: Arc<Self>,
        mut events: mpsc::Receiver<BrowserEvent>,
        cancel: CancellationToken,
    ) -> EventLoopStats {
        let tracker = TaskTracker::new();
        let mut stats = EventLoopStats::default();

        loop {
            let event = tokio::select! {
                event = events.recv() => event,
                _ = cancel.cancelled() => {
                    debug!("Event loop cancelled");
                    None
                }
            };
            let Some(event) = event else { break };

            match event {
                BrowserEvent::RequestCompleted(request) => {
                    stats.requests += 1;
                    let agg = self.clone();
                    tracker.spawn(async move {
                        agg.handle_request_completed(request).await;
                    });
                }
                BrowserEvent::RuntimeMessage { sender, payload } => {
                    stats.messages += 1;
                    self.handle_message(sender, payload).await;
                }
                BrowserEvent::TabRemoved { tab_id } => {
                    stats.tabs_removed += 1;
                    self.handle_tab_removed(tab_id).await;
                }
            }
        }

        tracker.close();
        tracker.wait().await;
        info!(
            "Event loop stopped: {} requests, {} messages, {} tabs removed",
            stats.requests, stats.messages, stats.tabs_removed
        );
        stats
    }
}
