//! Cumulative reconnect budget.
//!
//! The budget is absolute: every failed attempt is measured against the
//! moment the current waiting episode began, never against the previous
//! attempt. A successful connection ends the episode.

use std::time::{Duration, Instant};

/// Longest the wrapper waits for RCON across all attempts.
pub const MAX_RCON_WAIT: Duration = Duration::from_secs(900);

/// Pause between two connection attempts.
pub const RCON_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Limits applied to one waiting episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectBudget {
    pub max_wait: Duration,
    pub retry_delay: Duration,
}

impl Default for ReconnectBudget {
    fn default() -> Self {
        Self {
            max_wait: MAX_RCON_WAIT,
            retry_delay: RCON_RETRY_DELAY,
        }
    }
}

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetVerdict {
    /// Still within budget; try again after `delay`.
    Retry { elapsed: Duration, delay: Duration },
    /// Waited longer than the budget allows.
    Exhausted { elapsed: Duration },
}

/// Tracks the start of the current waiting episode.
#[derive(Debug, Default, Clone)]
pub struct WaitClock {
    started: Option<Instant>,
}

impl WaitClock {
    pub const fn new() -> Self {
        Self { started: None }
    }

    /// Whether a waiting episode is in progress.
    pub const fn is_waiting(&self) -> bool {
        self.started.is_some()
    }

    /// Start of the current episode, if any.
    pub const fn started_at(&self) -> Option<Instant> {
        self.started
    }

    /// Mark an attempt; only the first attempt of an episode sets the start.
    pub fn begin(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    /// End the episode on a successful handshake, returning how long it took.
    pub fn connected(&mut self, now: Instant) -> Duration {
        self.started
            .take()
            .map(|start| now.saturating_duration_since(start))
            .unwrap_or_default()
    }

    /// Evaluate a failed attempt against the budget.
    ///
    /// A failure outside an episode (a live session dropping) opens a new
    /// one at `now`. The stored start is never moved by later failures.
    pub fn failed(&mut self, now: Instant, budget: &ReconnectBudget) -> BudgetVerdict {
        let start = *self.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(start);
        if elapsed > budget.max_wait {
            BudgetVerdict::Exhausted { elapsed }
        } else {
            BudgetVerdict::Retry {
                elapsed,
                delay: budget.retry_delay,
            }
        }
    }
}

/// Whole seconds, rounded to nearest, for user-facing messages.
pub fn rounded_secs(elapsed: Duration) -> u64 {
    let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
    millis.saturating_add(500) / 1000
}
