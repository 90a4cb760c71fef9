//! Configuration resolution for futlink.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/futlink/settings.json)
//! 3. Environment variables
//! 4. CLI arguments (highest priority, applied by the binary)

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default FUT web surface.
pub const DEFAULT_BASE_URL: &str = "https://www.easports.com";

/// Complete futlink configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub client: ClientSettings,
    #[serde(default)]
    pub log: LogSettings,
}

/// Settings for talking to the FUT web app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    /// Web app origin, without trailing slash.
    pub base_url: String,
    /// Game year, e.g. `17` for FIFA 17.
    pub game_version: u32,
    /// Locale sent to the iframe page.
    pub locale: String,
    /// Per-request timeout (seconds).
    pub request_timeout_secs: u64,
    /// Explicit caller-platform to shard-platform mapping (e.g. `xone` -> `xbox`).
    pub platform_aliases: BTreeMap<String, String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            game_version: 17,
            locale: "en_GB".to_string(),
            request_timeout_secs: 30,
            platform_aliases: BTreeMap::new(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON log lines.
    pub json: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json: false,
        }
    }
}

/// Load configuration with hierarchical resolution.
///
/// `config_file` overrides the global settings path when given.
pub fn load_config(config_file: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    let path = config_file.map(Path::to_path_buf).or_else(global_config_path);
    if let Some(path) = path {
        if path.exists() {
            let file = load_config_file(&path)?;
            merge_config(&mut config, file);
        } else if config_file.is_some() {
            return Err(Error::Config(format!(
                "config file {} does not exist",
                path.display()
            )));
        }
    }

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".futlink").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/futlink/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("futlink").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    let Config { client, log } = overlay;

    base.client.base_url = client.base_url;
    base.client.game_version = client.game_version;
    base.client.locale = client.locale;
    base.client.request_timeout_secs = client.request_timeout_secs;
    base.client.platform_aliases.extend(client.platform_aliases);

    base.log = log;
}

/// Apply `FUTLINK_*` overrides read through `lookup`.
///
/// Unparseable numeric values are ignored.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("FUTLINK_BASE_URL") {
        config.client.base_url = val;
    }
    if let Some(n) = lookup("FUTLINK_GAME_VERSION").and_then(|v| v.parse().ok()) {
        config.client.game_version = n;
    }
    if let Some(val) = lookup("FUTLINK_LOCALE") {
        config.client.locale = val;
    }
    if let Some(n) = lookup("FUTLINK_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.client.request_timeout_secs = n;
    }
    if let Some(val) = lookup("FUTLINK_LOG_LEVEL") {
        config.log.level = val;
    }
}
