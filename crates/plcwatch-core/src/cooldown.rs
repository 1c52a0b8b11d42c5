// Per-device restart cooldown
//
// Keyed to restart *attempts that were dispatched successfully*, not to
// resolved issues: a successful restart consumes the window regardless
// of whether the next quality check improves, which bounds restart
// frequency deterministically. A failed restart does not consume it,
// so the next cycle may retry, bounded only by the poll interval.

use std::time::Duration;

use tokio::time::Instant;

/// Cooldown tracking for one device. Owned by the supervisor; updated
/// only after a restart is dispatched successfully.
#[derive(Debug, Clone, Default)]
pub struct CooldownState {
    last_restart: Option<Instant>,
}

impl CooldownState {
    /// Time left in the cooldown window at `now`, or `None` when a
    /// restart is permitted (never restarted, or window elapsed).
    pub fn remaining(&self, now: Instant, cooldown: Duration) -> Option<Duration> {
        let last = self.last_restart?;
        let elapsed = now.duration_since(last);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    /// Record a successful restart dispatch at `now`.
    pub fn record_restart(&mut self, now: Instant) {
        self.last_restart = Some(now);
    }

    pub fn last_restart(&self) -> Option<Instant> {
        self.last_restart
    }
}
