//! Privscope Store - durable key-value backends shared by the aggregator
//! (writer) and the reporter (reader)

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use privscope_core::config::{StoreBackend, StoreConfig};
use privscope_core::{DurableStore, Error, Result};
use std::sync::Arc;

/// Build the backend selected by config.
pub async fn open_store(config: &StoreConfig) -> Result<Arc<dyn DurableStore>> {
    match config.backend {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::File => {
            let path = config
                .path
                .as_ref()
                .ok_or_else(|| Error::Config("store.path is required for the file backend".into()))?;
            Ok(Arc::new(FileStore::open(path).await?))
        }
    }
}
