//! Dwell-growth timer
//!
//! The canvas runs on a single cooperative thread, so the growth "interval"
//! is a schedule the host polls rather than a background thread. Each
//! gesture gets a fresh [`TimerToken`]; a tick delivered for any other token
//! is stale and must be ignored by the owner.

/// Identifies the gesture a timer belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

impl TimerToken {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(self) -> u64 {
        self.0
    }
}

/// A periodic schedule anchored at the moment the gesture began
#[derive(Debug, Clone)]
pub struct GrowthTimer {
    token: TimerToken,
    interval_ms: u64,
    next_due_ms: u64,
}

impl GrowthTimer {
    /// Start a timer whose first tick is due one interval after `start_ms`
    pub fn start(token: TimerToken, start_ms: u64, interval_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        Self {
            token,
            interval_ms,
            next_due_ms: start_ms.saturating_add(interval_ms),
        }
    }

    #[inline]
    pub fn token(&self) -> TimerToken {
        self.token
    }

    #[inline]
    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    #[inline]
    pub fn next_due_ms(&self) -> u64 {
        self.next_due_ms
    }

    /// Consume every tick due at or before `now_ms` and return how many fired
    pub fn take_due(&mut self, now_ms: u64) -> u64 {
        if now_ms < self.next_due_ms {
            return 0;
        }
        let due = (now_ms - self.next_due_ms) / self.interval_ms + 1;
        self.next_due_ms = self
            .next_due_ms
            .saturating_add(due.saturating_mul(self.interval_ms));
        due
    }
}
