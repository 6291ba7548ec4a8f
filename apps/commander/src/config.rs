//! Commander configuration.
//!
//! Reads `~/.config/adbherd/config.json`. Every field has a default, and the
//! environment can override the interesting ones (`SHODAN_API_KEY`,
//! `ADBHERD_QUERY`), so a config file is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use adbherd_adb::AdbConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommanderConfig {
    /// Shodan API key. Empty means discovery is unavailable.
    #[serde(default)]
    pub shodan_api_key: String,

    /// Search query handed to the discovery provider.
    #[serde(default = "default_query")]
    pub query: String,

    /// Path to the adb binary.
    #[serde(default = "default_adb_path")]
    pub adb_path: String,

    /// Seconds before a connect attempt is abandoned.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Seconds before a broadcast command is abandoned.
    #[serde(default = "default_command_timeout")]
    pub command_timeout_secs: u64,
}

fn default_query() -> String {
    adbherd_discovery::DEFAULT_QUERY.to_string()
}

fn default_adb_path() -> String {
    "adb".into()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_command_timeout() -> u64 {
    30
}

impl Default for CommanderConfig {
    fn default() -> Self {
        Self {
            shodan_api_key: String::new(),
            query: default_query(),
            adb_path: default_adb_path(),
            connect_timeout_secs: default_connect_timeout(),
            command_timeout_secs: default_command_timeout(),
        }
    }
}

impl CommanderConfig {
    /// Loads the config file (missing or malformed file falls back to
    /// defaults), then applies environment overrides.
    pub fn load() -> Self {
        let mut cfg = config_path()
            .and_then(|path| Self::read_file(&path))
            .unwrap_or_default();
        cfg.apply_overrides(
            std::env::var("SHODAN_API_KEY").ok(),
            std::env::var("ADBHERD_QUERY").ok(),
        );
        cfg
    }

    fn read_file(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed config file");
                None
            }
        }
    }

    /// Non-empty override values win over the file.
    fn apply_overrides(&mut self, api_key: Option<String>, query: Option<String>) {
        if let Some(key) = api_key
            && !key.is_empty()
        {
            self.shodan_api_key = key;
        }
        if let Some(query) = query
            && !query.is_empty()
        {
            self.query = query;
        }
    }

    /// The adb client configuration this config describes.
    pub fn adb_config(&self) -> AdbConfig {
        AdbConfig {
            adb_path: PathBuf::from(&self.adb_path),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            command_timeout: Duration::from_secs(self.command_timeout_secs),
        }
    }
}

/// `~/.config/adbherd/config.json`.
pub fn config_path() -> Option<PathBuf> {
    let home = std::env::var_os("HOME")?;
    if home.is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("adbherd")
            .join("config.json"),
    )
}
