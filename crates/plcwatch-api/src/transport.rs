// Transport configuration for building reqwest::Client instances.
//
// The adapters speak plain HTTP on their default port, so there is no
// TLS surface here — just a request timeout so one unreachable device
// cannot stall a whole monitoring cycle, and a stable user agent.

use std::time::Duration;

use crate::error::Error;

/// Shared transport configuration for device HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl TransportConfig {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent("plcwatch/0.1.0")
            .build()
            .map_err(Error::Transport)
    }
}
