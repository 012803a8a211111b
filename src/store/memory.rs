use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{FieldMap, KeyValueStore, StoreError};

/// Process-local store, used for tests and for serving without a cache server.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, FieldMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn put(&self, key: &str, fields: FieldMap) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), fields);
        Ok(())
    }

    async fn get_all_fields(&self, key: &str) -> Result<Option<FieldMap>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
