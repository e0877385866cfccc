//! Privscope configuration
//!
//! Loaded from TOML at startup, falls back to defaults if no config file
//! exists or it fails to parse.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PrivscopeConfig {
    /// Durable store backend.
    pub store: StoreConfig,
    /// Indicator shown when page storage is captured.
    pub badge: BadgeConfig,
    /// What happens to per-tab state when a tab closes.
    pub teardown: TeardownConfig,
    /// Event loop sizing.
    pub events: EventsConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON file for the `file` backend.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BadgeConfig {
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TeardownConfig {
    /// Also delete the tab's storage/canvas/hijack records on close. When
    /// false, records outlive the tab and may be shown again if the platform
    /// reuses the tab id.
    pub purge_records_on_close: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Bounded capacity of the browser event channel.
    pub channel_capacity: usize,
}

// ============================================================
// Defaults
// ============================================================

impl Default for BadgeConfig {
    fn default() -> Self {
        Self {
            text: "!".into(),
            color: "red".into(),
        }
    }
}

impl Default for TeardownConfig {
    fn default() -> Self {
        Self {
            purge_records_on_close: true,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 1024,
        }
    }
}

// ============================================================
// Loading
// ============================================================

impl PrivscopeConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_toml(&content) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Write the current config as TOML (for generating a default config file).
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn badge(&self) -> crate::Badge {
        crate::Badge::new(self.badge.text.clone(), self.badge.color.clone())
    }
}
