//! Shared helpers for command handlers.

use plcwatch_core::RestartConfirmer;

/// Interactive restart confirmation, auto-approving with `--yes`.
pub struct PromptConfirmer {
    pub yes: bool,
}

impl RestartConfirmer for PromptConfirmer {
    fn confirm(&self, host: &str) -> bool {
        if self.yes {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(format!("Restart device '{host}'? The link will drop briefly"))
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}
