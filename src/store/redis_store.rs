//! Redis backend. Each device summary is one hash.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;

use super::{FieldMap, KeyValueStore, StoreError};

pub struct RedisStore {
    conn: ConnectionManager,
    timeout: Duration,
}

impl RedisStore {
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = redis::Client::open(url).map_err(unavailable)?;

        let conn = bounded(timeout, ConnectionManager::new(client)).await?;
        log::info!("Connected to redis at {}", url);

        Ok(Self { conn, timeout })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn put(&self, key: &str, fields: FieldMap) -> Result<(), StoreError> {
        let items: Vec<(String, String)> = fields.into_iter().collect();
        let mut conn = self.conn.clone();

        // DEL + HSET in one MULTI/EXEC so readers never see a half-written hash.
        let mut pipe = redis::pipe();
        pipe.atomic()
            .del(key)
            .ignore()
            .hset_multiple(key, &items)
            .ignore();

        bounded(self.timeout, pipe.query_async(&mut conn)).await
    }

    async fn get_all_fields(&self, key: &str) -> Result<Option<FieldMap>, StoreError> {
        let mut conn = self.conn.clone();
        let fields: FieldMap = bounded(self.timeout, conn.hgetall(key)).await?;
        Ok(absent_if_empty(fields))
    }

    fn backend_name(&self) -> &str {
        "redis"
    }
}

/// HGETALL answers a missing key with an empty hash.
fn absent_if_empty(fields: FieldMap) -> Option<FieldMap> {
    if fields.is_empty() {
        None
    } else {
        Some(fields)
    }
}

fn unavailable(e: redis::RedisError) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

async fn bounded<T, F>(timeout: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = redis::RedisResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(unavailable(e)),
        Err(_) => Err(StoreError::Unavailable(format!(
            "no response within {}",
            humantime::format_duration(timeout)
        ))),
    }
}
