//! Error types for Privscope

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("tab lookup failed for tab {tab}: {message}")]
    TabLookup { tab: String, message: String },

    #[error("tab not found: {0}")]
    TabNotFound(String),

    #[error("no active tab")]
    NoActiveTab,

    #[error("store error: {0}")]
    Store(String),

    #[error("cookie enumeration failed: {0}")]
    Cookies(String),

    #[error("badge update failed: {0}")]
    Badge(String),

    #[error("invalid message: {0}")]
    InvalidMessage(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn tab_lookup(tab: impl ToString, message: impl Into<String>) -> Self {
        Self::TabLookup {
            tab: tab.to_string(),
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store(message.into())
    }
}
