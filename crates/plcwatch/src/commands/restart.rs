//! `restart` -- restart one device on demand, cooldown still applies.

use plcwatch_core::{CoreError, RestartOutcome};

use crate::cli::{GlobalOpts, RestartArgs};
use crate::commands::util::PromptConfirmer;
use crate::error::CliError;

pub async fn handle(args: RestartArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut supervisor = super::build_supervisor(global, None, None)?;

    let confirmer = PromptConfirmer { yes: global.yes };
    let result = supervisor.manual_restart(&args.host, &confirmer).await;

    let outcome = match result {
        Ok(outcome) => outcome,
        // Enrich "not found" with the configured hosts so the user can
        // spot a typo immediately.
        Err(CoreError::DeviceNotFound { host }) => {
            return Err(CliError::DeviceNotFound {
                host,
                available: supervisor.hosts().collect::<Vec<_>>().join(", "),
            });
        }
        Err(other) => return Err(other.into()),
    };

    match outcome {
        RestartOutcome::Restarted => {
            if !global.quiet {
                println!("Device '{}' is restarting.", args.host);
            }
        }
        RestartOutcome::Declined => {
            if !global.quiet {
                println!("Restart cancelled.");
            }
        }
    }

    Ok(())
}
