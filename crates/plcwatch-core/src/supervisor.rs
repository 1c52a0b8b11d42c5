// ── Fleet supervision ──
//
// Drives one DeviceClient + one CooldownState per configured device on a
// polling cadence and applies the restart policy. Devices are fully
// independent (separate sessions, separate cooldown state), iterated
// sequentially within a cycle. Failures of one device never terminate
// the loop; they are reported and the cycle moves on.
//
// All reporting goes through tracing with structured fields — the core
// never formats human-readable output.

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use plcwatch_api::{DeviceClient, TransportConfig};

use crate::config::{DeviceEndpoint, SupervisorConfig};
use crate::cooldown::CooldownState;
use crate::error::CoreError;
use crate::quality::{QualityReport, analyze};

/// Collaborator deciding whether a manual restart may proceed.
///
/// The CLI implements this with an interactive prompt; tests with a
/// canned answer.
pub trait RestartConfirmer {
    fn confirm(&self, host: &str) -> bool;
}

/// Outcome of a manual restart request that passed the cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartOutcome {
    Restarted,
    Declined,
}

/// One device under supervision: its protocol client plus cooldown state.
pub struct ManagedDevice {
    client: DeviceClient,
    cooldown: CooldownState,
}

impl ManagedDevice {
    pub fn new(endpoint: &DeviceEndpoint, transport: &TransportConfig) -> Result<Self, CoreError> {
        let client = DeviceClient::new(&endpoint.host, endpoint.password.clone(), transport)?;
        Ok(Self::with_client(client))
    }

    /// Wrap a pre-built client (tests point this at a mock server).
    pub fn with_client(client: DeviceClient) -> Self {
        Self {
            client,
            cooldown: CooldownState::default(),
        }
    }

    pub fn host(&self) -> &str {
        self.client.host()
    }

    pub fn cooldown(&self) -> &CooldownState {
        &self.cooldown
    }

    /// Authenticate, fetch the status blob, and analyze it.
    ///
    /// Always re-authenticates: device sessions are short-lived, and a
    /// stale session must never cause silent failure. The extra round
    /// trips per poll are the price of that property.
    pub async fn fetch_quality(&mut self) -> Result<QualityReport, CoreError> {
        self.client.authenticate().await?;
        let blob = self.client.fetch_status().await?;
        Ok(analyze(&blob))
    }
}

/// Per-device outcome of a [`FleetSupervisor::check_once`] pass.
pub struct CheckOutcome {
    pub host: String,
    pub result: Result<QualityReport, CoreError>,
}

/// Supervises the whole fleet: polling, issue detection, and the
/// cooldown-guarded restart policy.
pub struct FleetSupervisor {
    devices: Vec<ManagedDevice>,
    config: SupervisorConfig,
}

impl FleetSupervisor {
    /// Build a supervisor for the configured endpoints.
    ///
    /// Zero devices is the one unrecoverable configuration problem in
    /// this layer; callers treat it as a startup error.
    pub fn new(endpoints: &[DeviceEndpoint], config: SupervisorConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::new(config.timeout);
        let devices = endpoints
            .iter()
            .map(|endpoint| ManagedDevice::new(endpoint, &transport))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_devices(devices, config)
    }

    /// Build a supervisor from pre-constructed devices.
    pub fn from_devices(
        devices: Vec<ManagedDevice>,
        config: SupervisorConfig,
    ) -> Result<Self, CoreError> {
        if devices.is_empty() {
            return Err(CoreError::NoDevices);
        }
        Ok(Self { devices, config })
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.devices.iter().map(ManagedDevice::host)
    }

    /// Check every device once and report the outcomes. Never restarts.
    pub async fn check_once(&mut self) -> Vec<CheckOutcome> {
        let mut outcomes = Vec::with_capacity(self.devices.len());

        for device in &mut self.devices {
            let host = device.host().to_owned();
            let result = device.fetch_quality().await;

            match &result {
                Ok(report) if report.is_healthy() => info!(
                    host = %host,
                    rx_mbps = report.master_rx_mbps,
                    tx_mbps = report.master_tx_mbps,
                    "link healthy"
                ),
                Ok(report) => warn!(
                    host = %host,
                    rx_mbps = report.master_rx_mbps,
                    tx_mbps = report.master_tx_mbps,
                    issues = ?report.issues,
                    "link degraded"
                ),
                Err(error) => warn!(host = %host, error = %error, "quality check failed"),
            }

            outcomes.push(CheckOutcome { host, result });
        }

        outcomes
    }

    /// One monitoring pass: fetch quality for every device and apply the
    /// cooldown-guarded restart policy to any device reporting issues.
    pub async fn poll_cycle(&mut self) {
        let cooldown = self.config.cooldown;

        for device in &mut self.devices {
            let host = device.host().to_owned();

            let report = match device.fetch_quality().await {
                Ok(report) => report,
                Err(error) => {
                    // No report this cycle; the device gets another
                    // chance next interval.
                    warn!(host = %host, error = %error, "quality check failed");
                    continue;
                }
            };

            if report.is_healthy() {
                info!(
                    host = %host,
                    rx_mbps = report.master_rx_mbps,
                    tx_mbps = report.master_tx_mbps,
                    "link healthy"
                );
                continue;
            }

            warn!(
                host = %host,
                rx_mbps = report.master_rx_mbps,
                tx_mbps = report.master_tx_mbps,
                issues = ?report.issues,
                "link degraded"
            );

            if let Some(remaining) = device.cooldown.remaining(Instant::now(), cooldown) {
                info!(
                    host = %host,
                    remaining_secs = remaining.as_secs(),
                    "restart blocked by cooldown"
                );
                continue;
            }

            match device.client.restart().await {
                Ok(()) => {
                    device.cooldown.record_restart(Instant::now());
                    warn!(host = %host, "device restarted");
                }
                // Cooldown is not consumed; the next cycle may retry,
                // bounded by the poll interval.
                Err(error) => warn!(host = %host, error = %error, "restart failed"),
            }
        }
    }

    /// Run monitoring cycles until `cancel` fires.
    ///
    /// Cancellation interrupts the inter-cycle sleep promptly and never
    /// starts a new cycle once observed; an in-flight HTTP request is
    /// allowed to finish its bounded timeout.
    pub async fn monitor(&mut self, cancel: CancellationToken) {
        info!(
            devices = self.devices.len(),
            poll_interval_secs = self.config.poll_interval.as_secs(),
            cooldown_secs = self.config.cooldown.as_secs(),
            "monitor loop started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.poll_cycle().await;

            tokio::select! {
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(self.config.poll_interval) => {}
            }
        }

        info!("monitor loop stopped");
    }

    /// Restart one device on demand.
    ///
    /// Applies the same cooldown policy as the monitoring loop, then
    /// asks the confirmation collaborator before authenticating and
    /// dispatching the restart. Cooldown is recorded on success only.
    pub async fn manual_restart(
        &mut self,
        host: &str,
        confirmer: &dyn RestartConfirmer,
    ) -> Result<RestartOutcome, CoreError> {
        let cooldown = self.config.cooldown;
        let device = self
            .devices
            .iter_mut()
            .find(|device| device.host() == host)
            .ok_or_else(|| CoreError::DeviceNotFound {
                host: host.to_owned(),
            })?;

        if let Some(remaining) = device.cooldown.remaining(Instant::now(), cooldown) {
            return Err(CoreError::CooldownActive {
                host: host.to_owned(),
                remaining_secs: remaining.as_secs(),
            });
        }

        if !confirmer.confirm(host) {
            debug!(host = %host, "manual restart declined");
            return Ok(RestartOutcome::Declined);
        }

        device.client.authenticate().await?;
        device.client.restart().await?;
        device.cooldown.record_restart(Instant::now());

        warn!(host = %host, "manual restart dispatched");
        Ok(RestartOutcome::Restarted)
    }
}
