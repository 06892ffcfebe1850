use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::identity::{IdentityProvider, create_identity_provider};
use crate::storage::{StorageProvider, create_storage_provider};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct StartupContext {
    pub identity: Arc<dyn IdentityProvider>,
    pub storage: Arc<dyn StorageProvider>,
    pub cache: Arc<dyn ObjectCache>,
}

/// 按名称构造缓存插件
async fn try_cache_plugin(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到内存缓存
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    } else if let Some(cache) = try_cache_plugin(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to Moka (in-memory) cache");
        if let Some(cache) = try_cache_plugin("moka").await {
            return Ok(cache);
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// 后端请求共用的 HTTP 客户端
fn create_http_client() -> reqwest::Result<reqwest::Client> {
    let config = AppConfig::get();
    reqwest::Client::builder()
        .timeout(Duration::from_millis(config.backend.request_timeout))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// 准备服务器启动的上下文
/// 包括认证客户端、存储和缓存
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let config = AppConfig::get();
    if config.backend.anon_key.is_empty() {
        warn!("backend.anon_key is empty; requests to the hosted backend will be rejected");
    }
    if !config.has_service_role() {
        warn!("backend.service_role_key is not set; account provisioning is disabled");
    }

    let http = create_http_client().expect("Failed to create HTTP client");
    let identity = create_identity_provider(http.clone());
    let storage = create_storage_provider(http);
    warn!("Hosted backend clients initialized for {}", config.backend.url);

    // 认证服务不可达时只记录，不阻止启动
    match identity.health_check().await {
        Ok(()) => debug!("Auth service health check passed"),
        Err(e) => warn!("Auth service health check failed: {}", e),
    }

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext {
        identity,
        storage,
        cache,
    }
}
