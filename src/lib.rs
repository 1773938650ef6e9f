//! Tiny web server for sharing a folder.
//!
//! Serves files under a root directory by URL path, answers `If-Modified-Since`
//! revalidation, and renders a sortable HTML listing for directories without
//! an index page.

pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod handlers;
pub mod listing;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::HeaderValue;

pub use config::Config;
pub use error::FileServerError;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Root directory to serve files from
    pub root_dir: PathBuf,
    /// Configuration
    pub config: Arc<Config>,
    /// Pre-validated `Server` header value
    pub server_header: HeaderValue,
}

impl AppState {
    /// Create a new AppState with the given root directory and default config.
    pub fn new(root_dir: PathBuf) -> Result<Self, FileServerError> {
        Self::with_config(root_dir, Config::default())
    }

    /// Create a new AppState with the given root directory and config.
    pub fn with_config(root_dir: PathBuf, config: Config) -> Result<Self, FileServerError> {
        let server_header = HeaderValue::from_str(&config.server_name).map_err(|_| {
            FileServerError::InvalidConfig(format!(
                "server_name {:?} is not a valid header value",
                config.server_name
            ))
        })?;

        Ok(Self {
            root_dir,
            config: Arc::new(config),
            server_header,
        })
    }
}
