//! Configuration for the plcwatch CLI.
//!
//! TOML file + environment layering, credential resolution (env var →
//! keyring → plaintext), and translation to the core's `DeviceEndpoint`
//! and `SupervisorConfig` values. Device order in the file is preserved
//! for display and polling order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use indexmap::IndexMap;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use plcwatch_core::{DeviceEndpoint, SupervisorConfig};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for device '{host}'")]
    NoCredentials { host: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global timing defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Devices to supervise, keyed by host (name or IP). Insertion
    /// order is preserved.
    #[serde(default)]
    pub devices: IndexMap<String, DeviceProfile>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    /// Seconds between monitoring cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Minimum seconds between restart attempts per device.
    #[serde(default = "default_cooldown")]
    pub cooldown: u64,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            poll_interval: default_poll_interval(),
            cooldown: default_cooldown(),
            timeout: default_timeout(),
        }
    }
}

fn default_poll_interval() -> u64 {
    60
}
fn default_cooldown() -> u64 {
    300
}
fn default_timeout() -> u64 {
    5
}

/// Per-device settings.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DeviceProfile {
    /// Device web-panel password (plaintext — prefer keyring or env).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the default config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "plcwatch", "plcwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("plcwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from a specific file plus the environment
/// (`PLCWATCH_` prefix, `__` as the nesting separator).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PLCWATCH_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the config from the canonical path.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize the config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a device password through the credential chain.
pub fn resolve_password(profile: &DeviceProfile, host: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(ref env_name) = profile.password_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new("plcwatch", host) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials { host: host.into() })
}

// ── Translation to core values ──────────────────────────────────────

/// Resolve every configured device into a `DeviceEndpoint`, preserving
/// file order.
pub fn device_endpoints(cfg: &Config) -> Result<Vec<DeviceEndpoint>, ConfigError> {
    cfg.devices
        .iter()
        .map(|(host, profile)| {
            let password = resolve_password(profile, host)?;
            Ok(DeviceEndpoint::new(host.clone(), password))
        })
        .collect()
}

/// Build the supervisor timing policy from config defaults, with
/// optional per-invocation overrides (CLI flags).
pub fn supervisor_config(
    cfg: &Config,
    poll_interval_override: Option<u64>,
    cooldown_override: Option<u64>,
    timeout_override: Option<u64>,
) -> SupervisorConfig {
    SupervisorConfig {
        poll_interval: Duration::from_secs(
            poll_interval_override.unwrap_or(cfg.defaults.poll_interval),
        ),
        cooldown: Duration::from_secs(cooldown_override.unwrap_or(cfg.defaults.cooldown)),
        timeout: Duration::from_secs(timeout_override.unwrap_or(cfg.defaults.timeout)),
    }
}
