//! Sensor → aggregator message protocol and the browser event envelope
//!
//! Wire format (tagged on `type`):
//!
//!   { "type": "storageData", "localStorage": [["k","v"]], "sessionStorage": [] }
//!   { "type": "canvasAccess", "method": "toDataURL" }
//!   { "type": "potentialHijacking", "message": "Attempting to navigate to https://..." }
//!
//! Unknown `type` values decode to `SensorMessage::Unknown` and are ignored
//! by consumers.

use crate::types::{RecordKind, SessionKey, StorageEntry};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Sensor messages
// ---------------------------------------------------------------------------

/// Canvas readback entry point that fired.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CanvasMethod {
    #[serde(rename = "toDataURL")]
    ToDataUrl,
    #[serde(rename = "getImageData")]
    GetImageData,
}

impl CanvasMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToDataUrl => "toDataURL",
            Self::GetImageData => "getImageData",
        }
    }
}

impl std::fmt::Display for CanvasMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of both page storage areas, in enumeration order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageSnapshot {
    #[serde(rename = "localStorage", default)]
    pub local_storage: Vec<StorageEntry>,
    #[serde(rename = "sessionStorage", default)]
    pub session_storage: Vec<StorageEntry>,
}

/// Message emitted by an in-page sensor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum SensorMessage {
    #[serde(rename = "storageData")]
    StorageData(StorageSnapshot),

    #[serde(rename = "canvasAccess")]
    CanvasAccess { method: CanvasMethod },

    #[serde(rename = "potentialHijacking")]
    PotentialHijacking { message: String },

    /// Any other `type`. Forward-compatible no-op.
    #[serde(other, skip_serializing)]
    Unknown,
}

impl SensorMessage {
    pub fn storage_data(local: Vec<StorageEntry>, session: Vec<StorageEntry>) -> Self {
        Self::StorageData(StorageSnapshot {
            local_storage: local,
            session_storage: session,
        })
    }

    pub fn canvas_access(method: CanvasMethod) -> Self {
        Self::CanvasAccess { method }
    }

    pub fn potential_hijacking(message: impl Into<String>) -> Self {
        Self::PotentialHijacking {
            message: message.into(),
        }
    }

    /// Durable record this message is persisted under, if any.
    pub fn record_kind(&self) -> Option<RecordKind> {
        match self {
            Self::StorageData(_) => Some(RecordKind::StorageData),
            Self::CanvasAccess { .. } => Some(RecordKind::CanvasAccess),
            Self::PotentialHijacking { .. } => Some(RecordKind::Hijacking),
            Self::Unknown => None,
        }
    }

    /// Decode a raw payload. Returns `Ok(Unknown)` for unrecognised tags and
    /// an error for a known tag with a malformed body.
    pub fn decode(payload: &serde_json::Value) -> crate::Result<Self> {
        SensorMessage::deserialize(payload)
            .map_err(|e| crate::Error::InvalidMessage(e.to_string()))
    }
}

/// Stored canvas record (the verbatim `canvasAccess` payload).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct CanvasAccessRecord {
    pub method: CanvasMethod,
}

/// Stored hijack record (the verbatim `potentialHijacking` payload).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HijackRecord {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Browser event envelope
// ---------------------------------------------------------------------------

/// A completed network request as seen by the platform's request feed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequestCompleted {
    /// Platform tab id; `-1` for requests not issued by a tab.
    #[serde(rename = "tabId")]
    pub tab_id: i64,
    pub url: String,
}

/// Everything the aggregator subscribes to.
#[derive(Clone, Debug, PartialEq)]
pub enum BrowserEvent {
    RequestCompleted(RequestCompleted),
    TabRemoved { tab_id: i64 },
    RuntimeMessage {
        sender: Option<SessionKey>,
        payload: serde_json::Value,
    },
}

impl BrowserEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RequestCompleted(_) => "request_completed",
            Self::TabRemoved { .. } => "tab_removed",
            Self::RuntimeMessage { .. } => "runtime_message",
        }
    }
}
