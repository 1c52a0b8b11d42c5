//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use plcwatch_config::ConfigError;
use plcwatch_core::CoreError;

/// Exit codes. Config problems (including an empty device list) are
/// startup errors and exit 1.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No devices configured")]
    #[diagnostic(
        code(plcwatch::no_devices),
        help(
            "Add devices to your config file:\n\
             [devices.\"192.168.1.10\"]\n\
             password = \"...\"\n\
             Expected at: {path}"
        )
    )]
    NoDevices { path: String },

    #[error("No password configured for device '{host}'")]
    #[diagnostic(
        code(plcwatch::no_credentials),
        help(
            "Set `password` or `password_env` for the device, or store the \
             password in the system keyring under service 'plcwatch'."
        )
    )]
    NoCredentials { host: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(plcwatch::config))]
    Config { message: String },

    // ── Devices ──────────────────────────────────────────────────────
    #[error("Device '{host}' is not configured")]
    #[diagnostic(
        code(plcwatch::device_not_found),
        help("Configured devices: {available}")
    )]
    DeviceNotFound { host: String, available: String },

    #[error("Restart of '{host}' blocked by cooldown ({remaining_secs}s remaining)")]
    #[diagnostic(
        code(plcwatch::cooldown_active),
        help("Wait for the cooldown to elapse, or lower `defaults.cooldown`.")
    )]
    CooldownActive { host: String, remaining_secs: u64 },

    #[error("Device operation failed: {message}")]
    #[diagnostic(
        code(plcwatch::device_error),
        help("Check that the device is reachable and the password is correct.")
    )]
    DeviceFailed { message: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DeviceNotFound { .. } => exit_code::NOT_FOUND,
            _ => exit_code::GENERAL,
        }
    }
}

// ── Error mappings ───────────────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { host } => Self::NoCredentials { host },
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NoDevices => Self::NoDevices {
                path: plcwatch_config::config_path().display().to_string(),
            },
            CoreError::DeviceNotFound { host } => Self::DeviceNotFound {
                host,
                available: String::new(),
            },
            CoreError::CooldownActive {
                host,
                remaining_secs,
            } => Self::CooldownActive {
                host,
                remaining_secs,
            },
            CoreError::Api(api) => Self::DeviceFailed {
                message: api.to_string(),
            },
        }
    }
}
