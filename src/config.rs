use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.json";
const DEFAULT_ADDRESS: &str = "http://localhost:3000/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for a SciLog client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the REST API, including the `/api/v1` prefix
    pub address: String,
    /// Bearer token from a previous login
    pub token: Option<String>,
    /// Default user name for password login
    pub username: Option<String>,
    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            username: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load the config file, then apply `SCILOG_URL`, `SCILOG_TOKEN` and
    /// `SCILOG_USER` from the environment.
    /// Falls back to defaults if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let config = match Self::try_load() {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        };
        config.with_env()
    }

    fn try_load() -> Result<Self> {
        let config_path = config_path()?;
        if !config_path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(&config_path)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;

        let config = serde_json::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Overlay environment variables on top of this config.
    pub fn with_env(mut self) -> Self {
        if let Ok(address) = std::env::var("SCILOG_URL") {
            self.address = address;
        }
        if let Ok(token) = std::env::var("SCILOG_TOKEN") {
            self.token = Some(token);
        }
        if let Ok(username) = std::env::var("SCILOG_USER") {
            self.username = Some(username);
        }
        self
    }
}

fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("ch", "psi", "scilog")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
