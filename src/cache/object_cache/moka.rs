use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};

/// 基于 moka 的进程内缓存，所有条目共享同一个 TTL
pub struct MokaCacheWrapper {
    inner: Cache<String, String>,
}

impl MokaCacheWrapper {
    pub fn new(max_capacity: u64, ttl_secs: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs.max(1)))
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, ttl: {}s",
            max_capacity, ttl_secs
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some(value) => CacheResult::Found(value),
            None => {
                debug!("Key not found in cache: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String) {
        self.inner.insert(key, value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{get_json, insert_json};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Entry {
        name: String,
    }

    #[tokio::test]
    async fn test_json_round_trip_and_remove() {
        let cache = MokaCacheWrapper::new(16, 60);
        let entry = Entry {
            name: "alice".into(),
        };
        insert_json(&cache, "token-a".into(), &entry).await;

        assert_eq!(
            get_json::<Entry>(&cache, "token-a").await,
            CacheResult::Found(entry)
        );

        cache.remove("token-a").await;
        assert_eq!(
            get_json::<Entry>(&cache, "token-a").await,
            CacheResult::NotFound
        );
    }

    #[tokio::test]
    async fn test_undecodable_entry_is_dropped() {
        let cache = MokaCacheWrapper::new(16, 60);
        cache.insert_raw("k".into(), "not json".into()).await;

        assert_eq!(
            get_json::<Entry>(&cache, "k").await,
            CacheResult::ExistsButNoValue
        );
        assert_eq!(cache.get_raw("k").await, CacheResult::NotFound);
    }
}
