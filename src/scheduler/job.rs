use tracing::{debug, info, warn};

use super::clock::{TimerPort, VirtualClock};
use super::state::{JobPhase, JobState};
use crate::config::SubmissionConfig;
use crate::exchange::{HttpExchange, Transport};
use crate::stats::{MetricsSink, StatsAccumulator, Summary};
use crate::submission::SubmitPayload;

/// Result of tearing a job down.
#[derive(Debug)]
pub struct JobReport<S> {
    pub summary: Summary,
    pub sink: S,
    /// Whether every configured attempt fired before teardown.
    pub completed: bool,
}

/// A periodic submitter.
///
/// The host calls [`start`](Self::start) once, [`fire`](Self::fire) each time
/// the timer it was handed goes off, and [`finish`](Self::finish) at teardown.
/// Attempt outcomes never change the schedule: exactly `repeats` attempts
/// fire unless the job is torn down first.
pub struct SubmissionJob<T, S> {
    name: String,
    config: SubmissionConfig,
    exchange: HttpExchange<T>,
    stats: StatsAccumulator,
    sink: S,
    state: JobState,
}

impl<T: Transport, S: MetricsSink> SubmissionJob<T, S> {
    pub fn new(
        name: impl Into<String>,
        config: SubmissionConfig,
        exchange: HttpExchange<T>,
        sink: S,
    ) -> Self {
        let name = name.into();
        Self {
            stats: StatsAccumulator::new(name.clone()),
            name,
            config,
            exchange,
            sink,
            state: JobState::default(),
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn stats(&self) -> &StatsAccumulator {
        &self.stats
    }

    pub fn start(&mut self, timer: &mut impl TimerPort) {
        if self.state.phase != JobPhase::Idle {
            warn!(job = %self.name, phase = %self.state.phase, "start ignored, job already started");
            return;
        }

        if self.config.repeats < 0 {
            warn!(job = %self.name, repeats = self.config.repeats, "negative repeats, treating as 0");
        }
        let attempts = self.config.attempts();
        if attempts == 0 {
            info!(job = %self.name, "no attempts configured");
            self.state.phase = JobPhase::Done;
            return;
        }

        let first = self.config.start_at();
        info!(
            job = %self.name,
            attempts,
            start_at = %first,
            period_ms = self.config.period_ms,
            endpoint = self.exchange.endpoint(),
            "submission job started"
        );
        self.state.remaining_attempts = attempts;
        self.state.phase = JobPhase::Scheduled;
        timer.schedule_at(first);
    }

    /// Run one attempt at `timer.now()` and schedule the next one.
    pub async fn fire(&mut self, timer: &mut impl TimerPort) -> JobPhase {
        if self.state.phase != JobPhase::Scheduled || self.state.remaining_attempts == 0 {
            warn!(job = %self.name, phase = %self.state.phase, "unexpected fire ignored");
            return self.state.phase;
        }

        let now = timer.now();
        self.state.phase = JobPhase::Firing;
        debug!(job = %self.name, at = %now, remaining = self.state.remaining_attempts, "firing");

        let payload = SubmitPayload::from(&self.config);
        let outcome = self.exchange.send(&payload).await;
        self.stats.record(&outcome, now, &mut self.sink);

        self.state.remaining_attempts -= 1;
        if self.state.remaining_attempts > 0 {
            timer.schedule_at(now + self.config.period());
            self.state.phase = JobPhase::Scheduled;
        } else {
            self.state.phase = JobPhase::Done;
        }
        self.state.phase
    }

    /// Tear the job down, cancelling any pending fire, and emit the summary.
    pub fn finish(mut self, timer: &mut impl TimerPort) -> JobReport<S> {
        let completed = self.state.is_done();
        if !completed && timer.cancel() {
            info!(
                job = %self.name,
                remaining = self.state.remaining_attempts,
                "cancelled pending fire at teardown"
            );
        }
        self.state.phase = JobPhase::Done;

        let summary = self.stats.finish(&mut self.sink);
        info!(
            job = %self.name,
            sent_total = summary.sent_total,
            ok_total = summary.ok_total,
            success_rate_final = summary.success_rate_final,
            "submission job finished"
        );

        JobReport {
            summary,
            sink: self.sink,
            completed,
        }
    }
}

/// Drive a job on `clock` until it is done or the clock's limit is reached.
/// `on_fire` sees the job after every attempt.
pub async fn run_job<T, S>(
    mut job: SubmissionJob<T, S>,
    clock: &mut VirtualClock,
    mut on_fire: impl FnMut(&SubmissionJob<T, S>),
) -> JobReport<S>
where
    T: Transport,
    S: MetricsSink,
{
    job.start(clock);
    while clock.advance().is_some() {
        job.fire(clock).await;
        on_fire(&job);
    }
    if let Some(next) = clock.pending() {
        debug!(job = %job.name, next_fire = %next, "time limit reached");
    }
    job.finish(clock)
}
