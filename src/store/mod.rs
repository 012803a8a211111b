mod error;
mod memory;
mod redis_store;
mod summary;
mod trail;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{StoreBackend, StoreConfig};

pub use error::StoreError;
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use summary::DeviceSummaryStore;

/// Field name to value, as held in one hash entry of the cache.
pub type FieldMap = HashMap<String, String>;

/// Minimal hash-per-key boundary of the backing cache.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Replaces every field stored under `key` with `fields`, atomically.
    async fn put(&self, key: &str, fields: FieldMap) -> Result<(), StoreError>;

    /// Returns `None` when nothing is stored under `key`.
    async fn get_all_fields(&self, key: &str) -> Result<Option<FieldMap>, StoreError>;

    fn backend_name(&self) -> &str;
}

/// Opens the configured backend and wraps it in a summary store.
pub async fn open(config: &StoreConfig) -> Result<DeviceSummaryStore, StoreError> {
    let kv: Arc<dyn KeyValueStore> = match config.backend {
        StoreBackend::Redis => Arc::new(RedisStore::connect(&config.url, config.timeout).await?),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    };
    Ok(DeviceSummaryStore::new(kv, config.key_prefix.clone()))
}
