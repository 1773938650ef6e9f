//! Test utilities and common setup.

use std::fs::File;
use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
    Router,
};
use tempfile::TempDir;
use tinyserve::{routes, AppState, Config};
use tower::ServiceExt;

/// Create a test application serving `root` with the default config.
pub fn test_app(root: &Path) -> Router {
    test_app_with_config(root, Config::default())
}

/// Create a test application serving `root` with the given config.
pub fn test_app_with_config(root: &Path, config: Config) -> Router {
    let state = AppState::with_config(root.to_path_buf(), config).unwrap();
    routes::router(state)
}

/// Create an empty served directory.
pub fn temp_root() -> TempDir {
    TempDir::new().unwrap()
}

/// Write a file under `root`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}

/// Set the modification time of `root/relative` to `secs` after the epoch.
pub fn set_mtime(root: &Path, relative: &str, secs: u64) -> SystemTime {
    let time = UNIX_EPOCH + Duration::from_secs(secs);
    File::options()
        .write(true)
        .open(root.join(relative))
        .unwrap()
        .set_modified(time)
        .unwrap();
    time
}

/// Send a GET with optional extra headers.
pub async fn get(app: &Router, uri: &str, headers: &[(&str, &str)]) -> Response {
    let mut builder = Request::builder().uri(uri).method(Method::GET);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Collect a response body as a string.
pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
