// Value types handed to the supervisor at construction.
//
// Configuration loading lives in `plcwatch-config`; these are the
// resolved values the core consumes, with secrets already wrapped.

use std::time::Duration;

use secrecy::SecretString;

/// Immutable identity of one physical device: where it is and how to
/// log in. Owned by configuration for the process lifetime.
#[derive(Debug, Clone)]
pub struct DeviceEndpoint {
    pub host: String,
    pub password: SecretString,
}

impl DeviceEndpoint {
    pub fn new(host: impl Into<String>, password: SecretString) -> Self {
        Self {
            host: host.into(),
            password,
        }
    }
}

/// Supervisor timing policy.
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Sleep between monitoring cycles.
    pub poll_interval: Duration,
    /// Minimum elapsed time between consecutive restart attempts for
    /// the same device.
    pub cooldown: Duration,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(60),
            cooldown: Duration::from_secs(300),
            timeout: Duration::from_secs(5),
        }
    }
}
