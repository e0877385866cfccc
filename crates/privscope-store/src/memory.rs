//! Process-local store

use privscope_core::{DurableStore, Result};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait::async_trait]
impl DurableStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[String]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for key in keys {
            entries.remove(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        store.set("canvasAccess_1", json!({"method": "toDataURL"})).await.unwrap();
        store.set("canvasAccess_1", json!({"method": "getImageData"})).await.unwrap();
        let value = store.get("canvasAccess_1").await.unwrap().unwrap();
        assert_eq!(value["method"], "getImageData");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn remove_ignores_missing_keys() {
        let store = MemoryStore::new();
        store.set("a", json!(1)).await.unwrap();
        store.remove(&["a".to_string(), "b".to_string()]).await.unwrap();
        assert!(store.is_empty().await);
        assert!(!store.is_durable());
    }
}
