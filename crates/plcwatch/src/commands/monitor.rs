//! `monitor` -- continuous polling with cooldown-guarded restarts.

use tokio_util::sync::CancellationToken;

use crate::cli::{GlobalOpts, MonitorArgs};
use crate::error::CliError;

pub async fn handle(args: MonitorArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut supervisor = super::build_supervisor(global, args.interval, args.cooldown)?;

    if !global.quiet {
        let hosts: Vec<&str> = supervisor.hosts().collect();
        println!(
            "Monitoring {} device(s) every {}s (cooldown {}s): {}",
            hosts.len(),
            supervisor.config().poll_interval.as_secs(),
            supervisor.config().cooldown.as_secs(),
            hosts.join(", ")
        );
        println!("Press Ctrl-C to stop.");
    }

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("shutdown signal received");
            signal_cancel.cancel();
        }
    });

    supervisor.monitor(cancel).await;

    if !global.quiet {
        println!("Monitor stopped.");
    }
    Ok(())
}
