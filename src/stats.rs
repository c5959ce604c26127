//! Running counters for a submission job and the metrics they emit.
//!
//! Every attempt produces `sent` and `successRate` samples at the attempt's
//! virtual time, plus a `gasUsed` sample when the gas value is known. The gas
//! series is therefore sparse. Teardown emits the three summary scalars once.

use serde::Serialize;

use crate::exchange::AttemptOutcome;
use crate::scheduler::SimTime;

pub const SENT: &str = "sent";
pub const SUCCESS_RATE: &str = "successRate";
pub const GAS_USED: &str = "gasUsed";
pub const SENT_TOTAL: &str = "sentTotal";
pub const OK_TOTAL: &str = "okTotal";
pub const SUCCESS_RATE_FINAL: &str = "successRateFinal";

/// One point of a time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    /// `<metric>:<series>`, unique per job instance.
    pub name: String,
    pub metric: &'static str,
    pub series: String,
    pub time: SimTime,
    pub value: f64,
}

/// One-shot value recorded at teardown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scalar {
    pub series: String,
    pub name: &'static str,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub sent_total: u64,
    pub ok_total: u64,
    pub success_rate_final: f64,
}

/// Destination for samples and scalars.
pub trait MetricsSink {
    fn record_sample(&mut self, sample: Sample);
    fn record_scalar(&mut self, scalar: Scalar);
}

/// Keeps everything in memory, in emission order.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MemorySink {
    pub samples: Vec<Sample>,
    pub scalars: Vec<Scalar>,
}

#[cfg(test)]
impl MemorySink {
    pub fn series<'a>(&'a self, metric: &'a str) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| s.metric == metric)
    }

    pub fn scalar(&self, name: &str) -> Option<f64> {
        self.scalars.iter().find(|s| s.name == name).map(|s| s.value)
    }
}

impl MetricsSink for MemorySink {
    fn record_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    fn record_scalar(&mut self, scalar: Scalar) {
        self.scalars.push(scalar);
    }
}

#[derive(Debug, Clone)]
pub struct StatsAccumulator {
    series: String,
    sent: u64,
    ok: u64,
}

impl StatsAccumulator {
    pub fn new(series: impl Into<String>) -> Self {
        Self {
            series: series.into(),
            sent: 0,
            ok: 0,
        }
    }

    pub fn sent_count(&self) -> u64 {
        self.sent
    }

    pub fn ok_count(&self) -> u64 {
        self.ok
    }

    /// `ok / sent`, or `0.0` before the first attempt. Never cached.
    pub fn success_rate(&self) -> f64 {
        if self.sent > 0 {
            self.ok as f64 / self.sent as f64
        } else {
            0.0
        }
    }

    /// Count one attempt and emit its samples at `at`.
    pub fn record(&mut self, outcome: &AttemptOutcome, at: SimTime, sink: &mut impl MetricsSink) {
        self.sent += 1;
        if outcome.success {
            self.ok += 1;
        }

        sink.record_sample(self.sample(SENT, at, self.sent as f64));
        sink.record_sample(self.sample(SUCCESS_RATE, at, self.success_rate()));
        if let Some(gas) = outcome.gas_used {
            sink.record_sample(self.sample(GAS_USED, at, gas as f64));
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            sent_total: self.sent,
            ok_total: self.ok,
            success_rate_final: self.success_rate(),
        }
    }

    /// Emit the summary scalars. Call once, at teardown.
    pub fn finish(&self, sink: &mut impl MetricsSink) -> Summary {
        let summary = self.summary();
        for (name, value) in [
            (SENT_TOTAL, summary.sent_total as f64),
            (OK_TOTAL, summary.ok_total as f64),
            (SUCCESS_RATE_FINAL, summary.success_rate_final),
        ] {
            sink.record_scalar(Scalar {
                series: self.series.clone(),
                name,
                value,
            });
        }
        summary
    }

    fn sample(&self, metric: &'static str, time: SimTime, value: f64) -> Sample {
        Sample {
            name: format!("{metric}:{}", self.series),
            metric,
            series: self.series.clone(),
            time,
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FailureKind, TransportError};

    fn ok(gas: Option<u64>) -> AttemptOutcome {
        AttemptOutcome {
            success: true,
            gas_used: gas,
            http_status: Some(200),
            transport_error: None,
            failure: None,
        }
    }

    fn rejected() -> AttemptOutcome {
        AttemptOutcome {
            success: false,
            gas_used: None,
            http_status: Some(200),
            transport_error: None,
            failure: Some(FailureKind::Protocol),
        }
    }

    #[test]
    fn empty_accumulator_has_zero_rate() {
        let stats = StatsAccumulator::new("job");
        assert_eq!(stats.sent_count(), 0);
        assert_eq!(stats.success_rate(), 0.0);
        assert_eq!(
            stats.summary(),
            Summary {
                sent_total: 0,
                ok_total: 0,
                success_rate_final: 0.0
            }
        );
    }

    #[test]
    fn counts_and_rate_follow_outcomes() {
        let mut stats = StatsAccumulator::new("job");
        let mut sink = MemorySink::default();
        let outcomes = [ok(Some(1)), rejected(), ok(None), rejected()];

        for (i, outcome) in outcomes.iter().enumerate() {
            stats.record(outcome, SimTime::from_millis(i as u64), &mut sink);
            assert_eq!(stats.sent_count(), i as u64 + 1);
            assert!(stats.ok_count() <= stats.sent_count());
            assert_eq!(
                stats.success_rate(),
                stats.ok_count() as f64 / stats.sent_count() as f64
            );
        }

        assert_eq!(stats.ok_count(), 2);
        assert_eq!(stats.success_rate(), 0.5);
    }

    #[test]
    fn emits_samples_at_attempt_time() {
        let mut stats = StatsAccumulator::new("net.a");
        let mut sink = MemorySink::default();
        let at = SimTime::from_millis(2500);
        stats.record(&ok(Some(21000)), at, &mut sink);

        assert_eq!(sink.samples.len(), 3);
        assert!(sink.samples.iter().all(|s| s.time == at));
        assert_eq!(sink.samples[0].name, "sent:net.a");
        assert_eq!(sink.samples[0].value, 1.0);
        assert_eq!(sink.samples[1].name, "successRate:net.a");
        assert_eq!(sink.samples[1].value, 1.0);
        assert_eq!(sink.samples[2].name, "gasUsed:net.a");
        assert_eq!(sink.samples[2].value, 21000.0);
    }

    #[test]
    fn gas_series_is_sparse() {
        let mut stats = StatsAccumulator::new("job");
        let mut sink = MemorySink::default();
        stats.record(&ok(Some(10)), SimTime::ZERO, &mut sink);
        stats.record(&ok(None), SimTime::ZERO, &mut sink);
        stats.record(&ok(Some(0)), SimTime::ZERO, &mut sink);

        let gas: Vec<f64> = sink.series(GAS_USED).map(|s| s.value).collect();
        assert_eq!(gas, vec![10.0, 0.0]);
        assert_eq!(sink.series(SENT).count(), 3);
        assert_eq!(sink.series(SUCCESS_RATE).count(), 3);
    }

    #[test]
    fn transport_failure_counts_without_gas() {
        let mut stats = StatsAccumulator::new("job");
        let mut sink = MemorySink::default();
        let outcome = AttemptOutcome::transport_failure(&TransportError::Timeout);
        stats.record(&outcome, SimTime::ZERO, &mut sink);

        assert_eq!(stats.sent_count(), 1);
        assert_eq!(stats.ok_count(), 0);
        assert_eq!(sink.series(GAS_USED).count(), 0);
    }

    #[test]
    fn finish_emits_summary_scalars() {
        let mut stats = StatsAccumulator::new("job");
        let mut sink = MemorySink::default();
        stats.record(&ok(None), SimTime::ZERO, &mut sink);
        stats.record(&ok(None), SimTime::ZERO, &mut sink);
        stats.record(&rejected(), SimTime::ZERO, &mut sink);
        stats.record(&ok(None), SimTime::ZERO, &mut sink);

        let summary = stats.finish(&mut sink);
        assert_eq!(summary.sent_total, 4);
        assert_eq!(summary.ok_total, 3);
        assert_eq!(summary.success_rate_final, 0.75);
        assert_eq!(sink.scalar(SENT_TOTAL), Some(4.0));
        assert_eq!(sink.scalar(OK_TOTAL), Some(3.0));
        assert_eq!(sink.scalar(SUCCESS_RATE_FINAL), Some(0.75));
        assert!(sink.scalars.iter().all(|s| s.series == "job"));
    }
}
