//! 对象缓存层
//!
//! 缓存后端以插件形式注册（见 [`declare_object_cache_plugin!`]），
//! 启动时根据 `cache.type` 选择具体实现。目前用于缓存已校验过的会话用户。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，无法确定键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化缓存对象，反序列化失败时删除该键
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::info!("Dropping undecodable cache entry {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 序列化后写入缓存
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: String, value: &T, ttl: u64) {
    if let Ok(json) = serde_json::to_string(value) {
        cache.insert_raw(key, json, ttl).await;
    }
}

/// 声明并在程序加载时注册一个缓存插件
///
/// 类型需提供 `fn new() -> crate::errors::Result<Self>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new().map(|cache| {
                            Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                        })
                    })
                }),
            );
        }
    };
}
