use std::path::Path;

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Value of the `Server` response header
    #[serde(default = "default_server_name")]
    pub server_name: String,

    /// List dot-prefixed files and directories
    #[serde(default = "default_true")]
    pub show_hidden: bool,

    /// Escape directory names in listings like file names.
    /// Set to false for raw directory names in links and text.
    #[serde(default = "default_true")]
    pub escape_directory_names: bool,
}

fn default_server_name() -> String {
    "Tiny Web Server".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_name: default_server_name(),
            show_hidden: true,
            escape_directory_names: true,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Check if a listing entry should be left out
    pub fn is_hidden(&self, name: &str) -> bool {
        !self.show_hidden && name.starts_with('.')
    }
}
