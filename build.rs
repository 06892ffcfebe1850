use std::env;
use std::fs;
use std::path::Path;

fn main() {
    println!("cargo:rerun-if-changed=frontend/dist");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let dist_path = Path::new(&manifest_dir).join("frontend/dist");

    // rust-embed 要求目录存在，前端未构建时写入占位页面
    if !dist_path.join("index.html").exists() {
        println!("cargo:warning=frontend/dist/index.html not found, embedding a placeholder page");
        create_fallback_files(&dist_path);
    }
}

fn create_fallback_files(dist_path: &Path) {
    fs::create_dir_all(dist_path).expect("Failed to create dist directory");

    let fallback_html = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>%SYSTEM_NAME%</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            max-width: 640px;
            margin: 96px auto;
            padding: 20px;
        }
        code {
            background: #f1f3f4;
            padding: 2px 6px;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <h1>%SYSTEM_NAME%</h1>
    <p>The web frontend was not built when this binary was compiled.</p>
    <p>Run <code>cd frontend && npm install && npm run build</code> and rebuild the server.</p>
    <p>Course, student, staff and flashdeck data is served under <code>/api/v1</code>.</p>
</body>
</html>"#;

    fs::write(dist_path.join("index.html"), fallback_html)
        .expect("Failed to write fallback index.html");
    fs::write(dist_path.join("favicon.ico"), []).expect("Failed to write fallback favicon");
}
