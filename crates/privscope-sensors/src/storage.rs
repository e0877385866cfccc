//! Page storage capture

use crate::sink::MessageSink;
use privscope_core::{SensorMessage, StorageEntry};
use tracing::debug;

/// A page storage area (local or session storage).
pub trait StorageArea {
    /// All entries in the area's enumeration order.
    fn entries(&self) -> Vec<StorageEntry>;
}

impl StorageArea for Vec<StorageEntry> {
    fn entries(&self) -> Vec<StorageEntry> {
        self.clone()
    }
}

/// Enumerate both areas once and send a single `storageData` message.
/// Read-only with respect to the page.
pub fn capture_storage(local: &dyn StorageArea, session: &dyn StorageArea, sink: &dyn MessageSink) {
    let local_items = local.entries();
    let session_items = session.entries();
    debug!(
        "Local Storage Items: {}, Session Storage Items: {}",
        local_items.len(),
        session_items.len()
    );
    sink.send(SensorMessage::storage_data(local_items, session_items));
}
