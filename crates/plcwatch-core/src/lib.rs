//! Business logic for plcwatch: connection-quality analysis and the
//! cooldown-guarded fleet supervisor.
//!
//! `plcwatch-api` stops at the parsed status blob; this crate turns blobs
//! into [`QualityReport`]s and drives a fleet of device clients on a
//! polling cadence, restarting adapters whose link quality degrades.

pub mod config;
pub mod cooldown;
pub mod error;
pub mod quality;
pub mod supervisor;

pub use config::{DeviceEndpoint, SupervisorConfig};
pub use cooldown::CooldownState;
pub use error::CoreError;
pub use quality::{MIN_LINK_MBPS, QualityReport, analyze, rate_units_to_mbps};
pub use supervisor::{
    CheckOutcome, FleetSupervisor, ManagedDevice, RestartConfirmer, RestartOutcome,
};
