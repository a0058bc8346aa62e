use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mime: MimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Redirect directory requests without a trailing '/' to the
    /// slash-terminated URL so relative listing links compose
    #[serde(default = "default_ensure_trailing_slash")]
    pub ensure_trailing_slash: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MimeConfig {
    /// Extension -> MIME type table consulted before the binary sniff
    #[serde(default = "default_mime_types")]
    pub types: HashMap<String, String>,
}

fn default_bind_address() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_ensure_trailing_slash() -> bool {
    true
}

fn default_data_dir() -> String {
    "./plaintree-data".to_string()
}

fn default_mime_types() -> HashMap<String, String> {
    [
        ("css", "text/css"),
        ("gif", "image/gif"),
        ("html", "text/html"),
        ("ico", "image/x-icon"),
        ("jpeg", "image/jpeg"),
        ("jpg", "image/jpeg"),
        ("js", "text/javascript"),
        ("json", "application/json"),
        ("md", "text/markdown"),
        ("pdf", "application/pdf"),
        ("png", "image/png"),
        ("svg", "image/svg+xml"),
        ("txt", "text/plain"),
        ("xml", "text/xml"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            ensure_trailing_slash: default_ensure_trailing_slash(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for MimeConfig {
    fn default() -> Self {
        Self {
            types: default_mime_types(),
        }
    }
}

impl Config {
    /// Load config from file, or create default if it doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
