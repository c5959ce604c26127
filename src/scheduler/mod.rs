mod clock;
mod job;
mod state;

pub use clock::{SimTime, VirtualClock};
pub use job::{JobReport, SubmissionJob, run_job};
pub use state::JobState;
