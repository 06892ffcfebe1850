use actix_cors::Cors;
use actix_web::middleware::{Compress, DefaultHeaders};
use actix_web::{App, HttpServer, http::Method, web};
use dotenv::dotenv;
use human_panic::setup_panic;
use std::sync::Arc;
use tracing::{debug, warn};

// 从 lib.rs 导入模块
use studydesk::cache::ObjectCache;
use studydesk::config::AppConfig;
use studydesk::identity::IdentityProvider;
use studydesk::middlewares;
use studydesk::models::AppStartTime;
use studydesk::routes;
use studydesk::runtime::lifetime;
use studydesk::storage::StorageProvider;
use studydesk::utils::{
    form_error_handler, json_error_handler, path_error_handler, query_error_handler,
};

/// 按配置构造 CORS，`*` 表示允许任意来源
fn build_cors(config: &AppConfig) -> Cors {
    let cors = &config.cors;
    let mut builder = if cors.allowed_origins.iter().any(|o| o == "*") {
        Cors::default().allow_any_origin()
    } else {
        cors.allowed_origins
            .iter()
            .fold(Cors::default(), |c, origin| c.allowed_origin(origin))
    };

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    builder = builder
        .allowed_methods(methods)
        .allowed_headers(cors.allowed_headers.iter().map(String::as_str))
        .supports_credentials()
        .max_age(cors.max_age);
    builder
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // 记录程序启动时间
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    // 启动前预处理 //

    // 初始化配置
    setup_panic!();
    AppConfig::init().expect("Failed to initialize configuration");
    let config = AppConfig::get();

    // 初始化日志
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    // 打印信息
    warn!(
        "Starting pre-startup processing...
        Project: {} ({})
        Version: {}
        Authors: {}",
        config.app.system_name,
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let startup = lifetime::startup::prepare_server_startup().await;

    let identity: Arc<dyn IdentityProvider> = startup.identity.clone();
    let storage: Arc<dyn StorageProvider> = startup.storage.clone();
    let cache: Arc<dyn ObjectCache> = startup.cache.clone();

    // 输出预处理时间
    debug!(
        "Pre-startup processing completed in {} ms",
        chrono::Utc::now()
            .signed_duration_since(app_start_time.start_datetime)
            .num_milliseconds()
    );

    // 预处理完成 //

    warn!("Using {} CPU cores for the server", config.server.workers);

    // Start the HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(middlewares::LoadSession::from_config()) // 解析会话 Cookie
            .wrap(build_cors(config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add((
                        "Keep-Alive",
                        format!("timeout={}, max=1000", config.server.timeouts.keep_alive),
                    ))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .app_data(web::QueryConfig::default().error_handler(query_error_handler)) // 设置查询参数错误处理器
            .app_data(web::JsonConfig::default().error_handler(json_error_handler)) // 设置JSON错误处理器
            .app_data(
                web::FormConfig::default()
                    .limit(config.server.limits.max_payload_size)
                    .error_handler(form_error_handler),
            ) // 设置表单错误处理器
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .app_data(web::Data::new(identity.clone()))
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(cache.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(
                config.server.limits.max_payload_size,
            )) // 设置最大请求体大小
            .configure(routes::configure_auth_routes) // 登录、注销、会话
            .configure(routes::configure_home_routes) // 首页
            .configure(routes::configure_course_routes) // 课程、作业、成绩
            .configure(routes::configure_student_routes) // 学生
            .configure(routes::configure_staff_routes) // 教职工
            .configure(routes::configure_flashdeck_routes) // 闪卡
            .configure(routes::configure_frontend_routes) // 前端页面（放在最后作为 fallback）
    })
    .keep_alive(std::time::Duration::from_secs(
        config.server.timeouts.keep_alive,
    )) // 启用长连接
    .client_request_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_request,
    )) // 客户端超时
    .client_disconnect_timeout(std::time::Duration::from_millis(
        config.server.timeouts.client_disconnect,
    )) // 断连超时
    .workers(config.server.workers);

    let server = {
        #[cfg(unix)]
        {
            if let Some(socket_path) = config.unix_socket_path() {
                warn!("Starting server on Unix socket: {}", socket_path);
                if std::path::Path::new(socket_path).exists() {
                    std::fs::remove_file(socket_path)?;
                }
                server.bind_uds(socket_path)?
            } else {
                let bind_address = config.server_bind_address();
                warn!("Starting server at http://{}", bind_address);
                server.bind(bind_address)?
            }
        }

        #[cfg(not(unix))]
        {
            let bind_address = config.server_bind_address();
            warn!("Starting server at http://{}", bind_address);
            server.bind(bind_address)?
        }
    }
    .run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: all tasks completed");
        }
    }

    Ok(())
}
