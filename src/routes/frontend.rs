//! 前端页面路由
//!
//! 页面由嵌入的前端渲染，数据来自 `/api/v1` 下的接口：
//! - 未知路径回退到 index.html，由前端路由处理
//! - `./frontend-custom/` 下的同名文件优先（开发用）
//! - HTML 中的 `%SYSTEM_NAME%` 替换为配置的系统名称
//! - 页面请求先经过 [`AuthGuard`](crate::middlewares::AuthGuard) 做登录跳转

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use rust_embed::Embed;
use std::path::Path;

use crate::config::AppConfig;
use crate::middlewares;

/// 嵌入前端静态资源
/// 编译时从 frontend/dist/ 目录读取文件
#[derive(Embed)]
#[folder = "frontend/dist/"]
struct FrontendAssets;

/// 获取文件的 MIME 类型
fn get_mime_type(path: &str) -> &'static str {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    match ext {
        "html" => "text/html; charset=utf-8",
        "js" => "application/javascript; charset=utf-8",
        "mjs" => "application/javascript; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "eot" => "application/vnd.ms-fontobject",
        "webp" => "image/webp",
        "txt" => "text/plain; charset=utf-8",
        "webmanifest" => "application/manifest+json",
        "map" => "application/json",
        _ => "application/octet-stream",
    }
}

/// 检查是否应该设置缓存
fn should_cache(path: &str) -> bool {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("");

    // 静态资源（带 hash 的）可以长期缓存
    matches!(
        ext,
        "js" | "css"
            | "woff"
            | "woff2"
            | "ttf"
            | "eot"
            | "png"
            | "jpg"
            | "jpeg"
            | "gif"
            | "svg"
            | "webp"
    )
}

/// 替换 HTML 中的占位符
fn process_html(content: &[u8], system_name: &str) -> Vec<u8> {
    String::from_utf8_lossy(content)
        .replace("%SYSTEM_NAME%", system_name)
        .into_bytes()
}

/// 尝试从自定义目录读取文件（开发用）
fn try_custom_file(path: &str) -> Option<Vec<u8>> {
    let custom_path = format!("./frontend-custom/{}", path);
    std::fs::read(&custom_path).ok()
}

/// 尝试从嵌入的资源中获取文件
fn get_embedded_file(path: &str) -> Option<Vec<u8>> {
    FrontendAssets::get(path).map(|f| f.data.to_vec())
}

/// 获取文件内容（优先自定义目录，然后嵌入资源）
fn get_file(path: &str) -> Option<Vec<u8>> {
    try_custom_file(path).or_else(|| get_embedded_file(path))
}

/// 页面与静态资源请求处理
pub async fn serve_frontend(req: HttpRequest) -> ActixResult<HttpResponse> {
    let path = req.match_info().query("tail").trim_start_matches('/');
    let config = AppConfig::get();

    // 尝试获取请求的文件
    let (content, file_path) = if path.is_empty() || path == "/" {
        // 根路径返回 index.html
        (get_file("index.html"), "index.html")
    } else if let Some(content) = get_file(path) {
        // 找到请求的文件
        (Some(content), path)
    } else {
        // SPA fallback: 未找到的路由返回 index.html
        (get_file("index.html"), "index.html")
    };

    match content {
        Some(mut data) => {
            let mime = get_mime_type(file_path);

            // 处理 HTML 文件中的占位符
            if mime.starts_with("text/html") {
                data = process_html(&data, &config.app.system_name);
            }

            let mut response = HttpResponse::Ok();
            response.content_type(mime);

            // 设置缓存头
            if should_cache(file_path) {
                response.insert_header(("Cache-Control", "public, max-age=31536000, immutable"));
            } else {
                response.insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"));
            }

            Ok(response.body(data))
        }
        None => {
            // 连 index.html 都没有时返回提示页
            Ok(HttpResponse::NotFound()
                .content_type("text/html; charset=utf-8")
                .body(format!(
                    r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{name}</title>
</head>
<body>
    <h1>{name}: frontend not embedded</h1>
    <p>Build the frontend before compiling the server:</p>
    <pre>cd frontend && npm run build</pre>
    <p>Page data is still available under <code>/api/v1</code>.</p>
</body>
</html>"#,
                    name = config.app.system_name
                )))
        }
    }
}

/// 配置前端路由，需放在所有接口路由之后
pub fn configure_frontend_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/{tail:.*}")
            .wrap(middlewares::AuthGuard)
            .route(web::get().to(serve_frontend)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_mime_type() {
        assert_eq!(get_mime_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(
            get_mime_type("app.js"),
            "application/javascript; charset=utf-8"
        );
        assert_eq!(get_mime_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(get_mime_type("image.png"), "image/png");
        assert_eq!(
            get_mime_type("site.webmanifest"),
            "application/manifest+json"
        );
        assert_eq!(get_mime_type("unknown.xyz"), "application/octet-stream");
    }

    #[test]
    fn test_process_html_replaces_system_name() {
        let html = b"<title>%SYSTEM_NAME%</title>";
        assert_eq!(
            process_html(html, "StudyDesk"),
            b"<title>StudyDesk</title>".to_vec()
        );
    }

    #[test]
    fn test_should_cache() {
        assert!(should_cache("app.js"));
        assert!(should_cache("style.css"));
        assert!(should_cache("logo.png"));
        assert!(!should_cache("index.html"));
        assert!(!should_cache("manifest.json"));
    }
}
