use std::fmt;

use serde::Serialize;

/// Lifecycle of a submission job.
///
/// `Idle → Scheduled → Firing → {Scheduled | Done}`. A job with no attempts
/// goes from `Idle` straight to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobPhase {
    Idle,
    Scheduled,
    Firing,
    Done,
}

impl fmt::Display for JobPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobPhase::Idle => write!(f, "IDLE"),
            JobPhase::Scheduled => write!(f, "SCHEDULED"),
            JobPhase::Firing => write!(f, "FIRING"),
            JobPhase::Done => write!(f, "DONE"),
        }
    }
}

/// Mutable scheduling state, owned by one job and touched only on its fire
/// path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JobState {
    pub phase: JobPhase,
    pub remaining_attempts: u64,
}

impl Default for JobState {
    fn default() -> Self {
        Self {
            phase: JobPhase::Idle,
            remaining_attempts: 0,
        }
    }
}

impl JobState {
    pub fn is_done(&self) -> bool {
        self.phase == JobPhase::Done
    }
}
