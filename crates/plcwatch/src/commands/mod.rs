//! Command handlers: bridge CLI args -> fleet supervisor -> output formatting.

pub mod check;
pub mod monitor;
pub mod restart;
pub mod util;

use plcwatch_core::FleetSupervisor;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Load the config, resolve credentials, and build the supervisor.
///
/// Every subcommand goes through here; a missing or empty config is a
/// startup error with exit code 1.
pub fn build_supervisor(
    global: &GlobalOpts,
    poll_interval_override: Option<u64>,
    cooldown_override: Option<u64>,
) -> Result<FleetSupervisor, CliError> {
    let path = global
        .config
        .clone()
        .unwrap_or_else(plcwatch_config::config_path);

    tracing::debug!(path = %path.display(), "loading config");
    let cfg = plcwatch_config::load_config_from(&path)?;

    if cfg.devices.is_empty() {
        return Err(CliError::NoDevices {
            path: path.display().to_string(),
        });
    }

    let endpoints = plcwatch_config::device_endpoints(&cfg)?;
    let sup_config = plcwatch_config::supervisor_config(
        &cfg,
        poll_interval_override,
        cooldown_override,
        global.timeout,
    );

    Ok(FleetSupervisor::new(&endpoints, sup_config)?)
}
