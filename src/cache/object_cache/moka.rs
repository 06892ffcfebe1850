use async_trait::async_trait;
use moka::{Expiry, future::Cache};
use std::time::{Duration, Instant};
use tracing::debug;

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::Result;

declare_object_cache_plugin!("moka", MokaCacheWrapper);

/// 按条目 TTL 过期，TTL 为 0 时使用默认值
struct EntryTtl {
    default_ttl: Duration,
}

impl Expiry<String, (String, u64)> for EntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        value: &(String, u64),
        _created_at: Instant,
    ) -> Option<Duration> {
        match value.1 {
            0 => Some(self.default_ttl),
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

pub struct MokaCacheWrapper {
    inner: Cache<String, (String, u64)>,
}

impl MokaCacheWrapper {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        Ok(Self::with_settings(
            config.cache.memory.max_capacity,
            config.cache.default_ttl,
        ))
    }

    pub fn with_settings(max_capacity: u64, default_ttl: u64) -> Self {
        let inner = Cache::builder()
            .max_capacity(max_capacity)
            .expire_after(EntryTtl {
                default_ttl: Duration::from_secs(default_ttl),
            })
            .build();

        debug!(
            "MokaCacheWrapper initialized with max capacity: {}, default TTL: {}s",
            max_capacity, default_ttl
        );
        Self { inner }
    }
}

#[async_trait]
impl ObjectCache for MokaCacheWrapper {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        match self.inner.get(key).await {
            Some((value, _)) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(value)
            }
            None => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        self.inner.insert(key, (value, ttl)).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
