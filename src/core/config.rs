//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.support-chat/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::format::{DEFAULT_DATE_FORMAT, DEFAULT_TIME_FORMAT, DisplayZone, TimeFormats};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    #[serde(default)]
    pub general: GeneralConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub max_message_chars: Option<usize>,
    pub time_format: Option<String>,
    pub date_format: Option<String>,
    pub timezone: Option<DisplayZone>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT_MS: u64 = 45_000;
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

pub const ENV_BASE_URL: &str = "SUPPORT_CHAT_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "SUPPORT_CHAT_TIMEOUT_MS";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub max_message_chars: usize,
    pub formats: TimeFormats,
    pub debug: bool,
    pub prefs_path: Option<PathBuf>,
}

/// Overrides collected from command-line flags (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub base_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub debug: bool,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.support-chat/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".support-chat").join("config.toml"))
}

/// Load config from `~/.support-chat/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `ChatConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<ChatConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(ChatConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(ChatConfig::default());
    }

    load_config_from(&path)
}

/// Parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<ChatConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: ChatConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# support-chat configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# base_url = "http://127.0.0.1:5000"  # Or set SUPPORT_CHAT_BASE_URL
# timeout_ms = 45000                  # Or set SUPPORT_CHAT_TIMEOUT_MS; 0 is replaced by the default
# max_message_chars = 2000            # 0 = no limit
# time_format = "%H:%M"
# date_format = "%A, %b %d, %Y"
# timezone = "local"                  # "local" or "utc"
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &ChatConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with(config, cli, |key| std::env::var(key).ok())
}

/// Like [`resolve`], with environment lookups going through `env`.
pub fn resolve_with<F>(config: &ChatConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Base URL: CLI → env → config → default
    let base_url = cli
        .base_url
        .clone()
        .or_else(|| env(ENV_BASE_URL))
        .or_else(|| config.general.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Timeout: CLI → env → config → default
    let timeout_ms = cli
        .timeout_ms
        .or_else(|| env_timeout_ms(&env))
        .or(config.general.timeout_ms)
        .unwrap_or(DEFAULT_TIMEOUT_MS);
    let timeout_ms = if timeout_ms == 0 {
        warn!("timeout_ms = 0 would fail every request, using {DEFAULT_TIMEOUT_MS}");
        DEFAULT_TIMEOUT_MS
    } else {
        timeout_ms
    };

    let formats = TimeFormats {
        time: config
            .general
            .time_format
            .clone()
            .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
        date: config
            .general
            .date_format
            .clone()
            .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
        zone: config.general.timezone.unwrap_or_default(),
    };

    ResolvedConfig {
        base_url: base_url.trim_end_matches('/').to_string(),
        timeout: Duration::from_millis(timeout_ms),
        max_message_chars: config
            .general
            .max_message_chars
            .unwrap_or(DEFAULT_MAX_MESSAGE_CHARS),
        formats,
        debug: cli.debug,
        prefs_path: crate::core::prefs::prefs_path(),
    }
}

fn env_timeout_ms(env: &impl Fn(&str) -> Option<String>) -> Option<u64> {
    let raw = env(ENV_TIMEOUT_MS)?;
    match raw.trim().parse() {
        Ok(ms) => Some(ms),
        Err(_) => {
            warn!("Ignoring non-numeric {ENV_TIMEOUT_MS}={raw:?}");
            None
        }
    }
}
