use thiserror::Error;

/// Errors surfaced by the core layer.
///
/// Device-level failures (`Api`) are per-cycle outcomes: the supervisor
/// reports them and moves on to the next device. The only fatal startup
/// condition is an empty device list.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Protocol client failure (network, auth, device rejection).
    #[error(transparent)]
    Api(#[from] plcwatch_api::Error),

    /// No devices configured — nothing to supervise.
    #[error("no devices configured")]
    NoDevices,

    /// A host was named that is not part of the configured fleet.
    #[error("device '{host}' is not configured")]
    DeviceNotFound { host: String },

    /// Restart blocked by the per-device cooldown policy. This is a
    /// normal skip, not a failure.
    #[error("restart of '{host}' blocked by cooldown ({remaining_secs}s remaining)")]
    CooldownActive { host: String, remaining_secs: u64 },
}

impl CoreError {
    /// Returns `true` if this is a policy skip rather than a failure.
    pub fn is_policy_skip(&self) -> bool {
        matches!(self, Self::CooldownActive { .. })
    }
}
