//! Navigation / hijack monitoring
//!
//! Two independent triggers. The unload hook fires on every navigation or
//! close, malicious or not; it is a heuristic and over-reports by nature.

use crate::sink::MessageSink;
use privscope_core::SensorMessage;
use std::sync::Arc;
use tracing::debug;

pub const UNLOAD_MESSAGE: &str = "Page is attempting to redirect or unload.";

/// Programmatic navigation entry point.
pub trait Location {
    type Error;

    fn assign(&self, url: &str) -> Result<(), Self::Error>;
}

/// Unload listener.
pub struct HijackMonitor {
    sink: Arc<dyn MessageSink>,
}

impl HijackMonitor {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    /// Page-unload signal.
    pub fn on_before_unload(&self) {
        debug!("beforeunload event detected.");
        self.sink.send(SensorMessage::potential_hijacking(UNLOAD_MESSAGE));
    }
}

/// Wraps the navigation entry point; reports the target, then delegates.
pub struct InstrumentedLocation<L> {
    inner: L,
    sink: Arc<dyn MessageSink>,
}

impl<L> InstrumentedLocation<L> {
    pub fn new(inner: L, sink: Arc<dyn MessageSink>) -> Self {
        Self { inner, sink }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: Location> Location for InstrumentedLocation<L> {
    type Error = L::Error;

    fn assign(&self, url: &str) -> Result<(), Self::Error> {
        debug!("location.assign called with URL: {}", url);
        self.sink
            .send(SensorMessage::potential_hijacking(format!("Attempting to navigate to {}", url)));
        self.inner.assign(url)
    }
}
