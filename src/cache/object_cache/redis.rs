use async_trait::async_trait;
use redis::{AsyncCommands, aio::MultiplexedConnection};
use tracing::{debug, error, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::config::AppConfig;
use crate::declare_object_cache_plugin;
use crate::errors::{Result, StudyDeskError};

declare_object_cache_plugin!("redis", RedisObjectCache);

pub struct RedisObjectCache {
    client: redis::Client,
    key_prefix: String,
    ttl: u64, // 秒
}

impl RedisObjectCache {
    pub fn new() -> Result<Self> {
        let config = AppConfig::get();
        let redis_config = &config.cache.redis;

        let client = redis::Client::open(redis_config.url.clone()).map_err(|e| {
            StudyDeskError::cache_connection(format!("Invalid Redis URL {}: {e}", redis_config.url))
        })?;

        // 启动时用同步连接做一次 PING
        let mut conn = client.get_connection().map_err(|e| {
            error!(
                "Failed to connect to Redis server at {}: {}",
                redis_config.url, e
            );
            StudyDeskError::cache_connection(format!("Redis connection failed: {e}"))
        })?;
        let pong = redis::cmd("PING")
            .query::<String>(&mut conn)
            .map_err(|e| StudyDeskError::cache_connection(format!("Redis ping failed: {e}")))?;
        debug!(
            "Redis connection test successful: {} (prefix: '{}', TTL: {}s)",
            pong, redis_config.key_prefix, config.cache.default_ttl
        );

        Ok(Self {
            client,
            key_prefix: redis_config.key_prefix.clone(),
            ttl: config.cache.default_ttl,
        })
    }

    async fn get_connection(&self) -> Option<MultiplexedConnection> {
        match self.client.get_multiplexed_async_connection().await {
            Ok(conn) => Some(conn),
            Err(e) => {
                error!("Failed to get Redis connection: {}", e);
                None
            }
        }
    }

    fn make_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }
}

#[async_trait]
impl ObjectCache for RedisObjectCache {
    async fn get_raw(&self, key: &str) -> CacheResult<String> {
        let Some(mut conn) = self.get_connection().await else {
            return CacheResult::ExistsButNoValue;
        };

        match conn.get::<String, Option<String>>(self.make_key(key)).await {
            Ok(Some(data)) => {
                debug!("Cache hit: {}", key);
                CacheResult::Found(data)
            }
            Ok(None) => {
                debug!("Cache miss: {}", key);
                CacheResult::NotFound
            }
            Err(e) => {
                error!("Failed to get key '{}': {}", key, e);
                CacheResult::ExistsButNoValue
            }
        }
    }

    async fn insert_raw(&self, key: String, value: String, ttl: u64) {
        let Some(mut conn) = self.get_connection().await else {
            return;
        };

        let effective_ttl = if ttl == 0 { self.ttl } else { ttl };
        if let Err(e) = conn
            .set_ex::<String, String, ()>(self.make_key(&key), value, effective_ttl)
            .await
        {
            error!("Failed to insert key '{}' into cache: {}", key, e);
        }
    }

    async fn remove(&self, key: &str) {
        let Some(mut conn) = self.get_connection().await else {
            return;
        };

        if let Err(e) = conn.del::<String, i32>(self.make_key(key)).await {
            error!("Failed to remove key '{}': {}", key, e);
        }
    }

    async fn invalidate_all(&self) {
        // 共享实例上不做全量清理，会话条目依赖 TTL 过期
        warn!("RedisObjectCache does not implement invalidate_all");
    }
}
