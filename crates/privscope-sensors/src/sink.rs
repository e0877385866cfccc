//! Outbound message delivery from the page

use privscope_core::{BrowserEvent, SensorMessage, SessionKey};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::debug;

/// Fire-and-forget message delivery. Implementations must not block and
/// must not report failure to the caller.
pub trait MessageSink: Send + Sync {
    fn send(&self, message: SensorMessage);
}

/// Sink that delivers into the aggregator's event channel, attributed to
/// the tab the sensor runs in.
#[derive(Clone)]
pub struct RuntimeSender {
    tx: mpsc::Sender<BrowserEvent>,
    sender: Option<SessionKey>,
}

impl RuntimeSender {
    pub fn new(tx: mpsc::Sender<BrowserEvent>, sender: Option<SessionKey>) -> Self {
        Self { tx, sender }
    }

    pub fn sender(&self) -> Option<SessionKey> {
        self.sender
    }
}

impl MessageSink for RuntimeSender {
    fn send(&self, message: SensorMessage) {
        let payload = match serde_json::to_value(&message) {
            Ok(payload) => payload,
            Err(e) => {
                debug!("Dropping unserializable sensor message: {}", e);
                return;
            }
        };
        let event = BrowserEvent::RuntimeMessage {
            sender: self.sender,
            payload,
        };
        if let Err(e) = self.tx.try_send(event) {
            debug!("Sensor message not delivered: {}", e);
        }
    }
}

/// Sink that keeps every message in memory, in send order.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<SensorMessage>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<SensorMessage> {
        self.messages
            .lock()
            .map(|messages| messages.clone())
            .unwrap_or_default()
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, message: SensorMessage) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push(message);
        }
    }
}
