//! Cancelable scheduled callbacks.
//!
//! `schedule` hands back a [`TimerToken`]; the engine remembers which token it
//! expects for each timer kind and treats any other token that fires as stale.
//! [`ManualScheduler`] is a virtual clock used by tests and the CLI; the `web`
//! feature provides a `setTimeout`-backed implementation.

use std::collections::BTreeSet;
use std::time::Duration;

/// Handle for one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Wrap a raw token value.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw token value.
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Source of delayed callbacks.
///
/// When a timer expires the host delivers its token back to the reader via
/// `Reader::handle_timer`.
pub trait Scheduler {
    /// Schedule a callback `delay` from now.
    fn schedule(&mut self, delay: Duration) -> TimerToken;

    /// Cancel a pending callback. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}

/// Virtual-clock scheduler. Time only moves when the caller says so.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    now: Duration,
    next_token: u64,
    // Keyed by (due time, token) so iteration order is due time, then scheduling order.
    pending: BTreeSet<(Duration, TimerToken)>,
}

impl ManualScheduler {
    /// Clock at zero with nothing scheduled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still pending.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `token` is still pending.
    pub fn is_pending(&self, token: TimerToken) -> bool {
        self.pending.iter().any(|(_, t)| *t == token)
    }

    /// Remove and return the earliest timer due at or before `until`, moving
    /// the clock to its due time.
    ///
    /// Returns `None` (and leaves the clock alone) when nothing is due.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerToken> {
        let &(due, token) = self.pending.first()?;
        if due > until {
            return None;
        }
        self.pending.remove(&(due, token));
        self.now = self.now.max(due);
        Some(token)
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn advance_to(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerToken {
        self.next_token += 1;
        let token = TimerToken::new(self.next_token);
        self.pending.insert((self.now + delay, token));
        token
    }

    fn cancel(&mut self, token: TimerToken) {
        self.pending.retain(|(_, t)| *t != token);
    }
}
