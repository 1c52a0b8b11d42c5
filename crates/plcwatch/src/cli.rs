//! Clap derive structures for the `plcwatch` CLI.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// plcwatch -- monitor and remediate powerline bridge devices
#[derive(Debug, Parser)]
#[command(
    name = "plcwatch",
    version,
    about = "Monitor powerline bridge devices and restart unhealthy ones",
    long_about = "Polls the web control panel of each configured powerline \
        bridge device, derives link quality from its status dump, and \
        restarts adapters whose bandwidth degrades -- with a per-device \
        cooldown so a flapping link cannot cause a restart storm.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Path to the config file
    #[arg(long, env = "PLCWATCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Per-request HTTP timeout in seconds (overrides config)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check every configured device once and report link quality
    Check,

    /// Poll devices continuously, restarting unhealthy ones
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// Restart one device now (cooldown still applies)
    Restart(RestartArgs),
}

#[derive(Debug, Args)]
pub struct MonitorArgs {
    /// Seconds between polling cycles (overrides config)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Minimum seconds between restart attempts per device (overrides config)
    #[arg(long)]
    pub cooldown: Option<u64>,
}

#[derive(Debug, Args)]
pub struct RestartArgs {
    /// Device host (name or IP) as configured
    pub host: String,
}
