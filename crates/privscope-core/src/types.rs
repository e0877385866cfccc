//! Core types for Privscope

use serde::{Deserialize, Serialize};

/// Session identifier for one browser tab. Cheap to copy.
///
/// Built from the platform tab id; negative ids (the platform's "no tab"
/// marker) never produce a key.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(u32);

impl SessionKey {
    pub fn new(tab_id: u32) -> Self {
        Self(tab_id)
    }

    /// Map a raw platform tab id to a session key. `-1` and other negative
    /// ids are requests/messages not attributable to a tab.
    pub fn from_tab_id(tab_id: i64) -> Option<Self> {
        u32::try_from(tab_id).ok().map(Self)
    }

    pub fn tab_id(&self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SessionKey {
    fn from(tab_id: u32) -> Self {
        Self::new(tab_id)
    }
}

/// One `(key, value)` entry of a page storage area.
pub type StorageEntry = (String, String);

/// A cookie as returned by the platform's cookie enumeration.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
        }
    }
}

/// Per-tab toolbar indicator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Badge {
    pub text: String,
    pub color: String,
}

impl Badge {
    pub fn new(text: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: color.into(),
        }
    }
}

/// Kind of observation record persisted in the durable store.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum RecordKind {
    StorageData,
    CanvasAccess,
    Hijacking,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [
        RecordKind::StorageData,
        RecordKind::CanvasAccess,
        RecordKind::Hijacking,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::StorageData => "storageData",
            Self::CanvasAccess => "canvasAccess",
            Self::Hijacking => "hijacking",
        }
    }

    /// Durable store key: `<prefix>_<session>`.
    pub fn store_key(self, session: &SessionKey) -> String {
        format!("{}_{}", self.prefix(), session)
    }
}
