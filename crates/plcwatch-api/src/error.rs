use thiserror::Error;

/// Top-level error type for the `plcwatch-api` crate.
///
/// Covers every failure mode of the device protocol: authentication,
/// transport, and non-success device responses. `plcwatch-core` maps
/// these into per-cycle poll outcomes; they are never fatal to a
/// supervising loop.
#[derive(Debug, Error)]
pub enum Error {
    /// Login rejected, token missing, or no session established.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The device answered with a non-success HTTP status.
    #[error("device returned HTTP {status}: {message}")]
    Device { status: u16, message: String },

    /// HTTP transport error (connection refused, timeout, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if this error indicates the session is invalid
    /// and a fresh login might resolve it.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
            || matches!(self, Self::Device { status: 401 | 403, .. })
    }

    /// Returns `true` if this is a transient network error worth retrying
    /// on the next poll cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Device { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
