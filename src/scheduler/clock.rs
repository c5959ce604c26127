use std::fmt;
use std::ops::Add;
use std::time::Duration;

use serde::{Serialize, Serializer};

/// A point on the virtual clock, measured from the start of the run.
///
/// Backed by [`Duration`] so repeated `+ period` stays exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimTime(Duration);

impl SimTime {
    pub const ZERO: SimTime = SimTime(Duration::ZERO);

    pub fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn as_secs_f64(&self) -> f64 {
        self.0.as_secs_f64()
    }
}

impl Add<Duration> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: Duration) -> SimTime {
        SimTime(self.0.saturating_add(rhs))
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

/// Serialized as seconds, the unit the time-series consumers plot against.
impl Serialize for SimTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

/// The host's timer as seen by a job: one pending fire at most.
pub trait TimerPort {
    fn now(&self) -> SimTime;

    /// Arrange for the job to be fired at `at`.
    fn schedule_at(&mut self, at: SimTime);

    /// Drop the pending fire, if any. Returns whether one was pending.
    fn cancel(&mut self) -> bool;
}

/// Discrete-event driver for a single job.
///
/// Time jumps straight to the pending fire; nothing waits on the wall clock.
/// With a limit set, a fire past the limit is left pending and
/// [`advance`](VirtualClock::advance) reports the end of the run.
#[derive(Debug)]
pub struct VirtualClock {
    now: SimTime,
    pending: Option<SimTime>,
    limit: Option<SimTime>,
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::with_limit(None)
    }
}

impl VirtualClock {
    pub fn with_limit(limit: Option<SimTime>) -> Self {
        Self {
            now: SimTime::ZERO,
            pending: None,
            limit,
        }
    }

    pub fn pending(&self) -> Option<SimTime> {
        self.pending
    }

    /// Move to the pending fire and consume it.
    pub fn advance(&mut self) -> Option<SimTime> {
        let at = self.pending?;
        if self.limit.is_some_and(|limit| at > limit) {
            return None;
        }
        self.pending = None;
        self.now = at;
        Some(at)
    }
}

impl TimerPort for VirtualClock {
    fn now(&self) -> SimTime {
        self.now
    }

    fn schedule_at(&mut self, at: SimTime) {
        debug_assert!(self.pending.is_none(), "a fire is already pending");
        debug_assert!(at >= self.now, "cannot schedule in the past");
        self.pending = Some(at);
    }

    fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
