//! JSON run report: the time series and scalars of one job, in the shape
//! the plotting scripts read (`<metric>:<series>` names, time in seconds).

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::SubmitterError;
use crate::scheduler::JobReport;
use crate::stats::{MemorySink, Sample, Scalar, Summary};

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub job: String,
    pub endpoint: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub completed: bool,
    pub summary: Summary,
    pub samples: Vec<Sample>,
    pub scalars: Vec<Scalar>,
}

impl RunReport {
    pub fn new(
        job: &str,
        endpoint: &str,
        started_at: DateTime<Utc>,
        report: JobReport<MemorySink>,
    ) -> Self {
        Self {
            job: job.to_string(),
            endpoint: endpoint.to_string(),
            started_at,
            finished_at: Utc::now(),
            completed: report.completed,
            summary: report.summary,
            samples: report.sink.samples,
            scalars: report.sink.scalars,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<(), SubmitterError> {
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::AttemptOutcome;
    use crate::scheduler::SimTime;
    use crate::stats::StatsAccumulator;

    fn job_report() -> JobReport<MemorySink> {
        let mut stats = StatsAccumulator::new("net.a");
        let mut sink = MemorySink::default();
        let outcome = AttemptOutcome {
            success: true,
            gas_used: Some(21000),
            http_status: Some(200),
            transport_error: None,
            failure: None,
        };
        stats.record(&outcome, SimTime::from_millis(1500), &mut sink);
        let summary = stats.finish(&mut sink);
        JobReport {
            summary,
            sink,
            completed: true,
        }
    }

    #[test]
    fn report_serializes_series_and_summary() {
        let report = RunReport::new("net.a", "http://127.0.0.1:4000/submit", Utc::now(), job_report());
        let value = serde_json::to_value(&report).unwrap();

        assert_eq!(value["job"], "net.a");
        assert_eq!(value["completed"], true);
        assert_eq!(value["summary"]["sentTotal"], 1);
        assert_eq!(value["summary"]["successRateFinal"], 1.0);
        assert_eq!(value["samples"].as_array().unwrap().len(), 3);
        assert_eq!(value["samples"][2]["name"], "gasUsed:net.a");
        assert_eq!(value["samples"][2]["time"], 1.5);
        assert_eq!(value["scalars"][0]["name"], "sentTotal");
    }

    #[test]
    fn write_to_creates_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");
        let report = RunReport::new("net.a", "http://x/submit", Utc::now(), job_report());

        report.write_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(value["summary"]["okTotal"], 1);
    }

    #[test]
    fn write_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("run.json");
        let report = RunReport::new("net.a", "http://x/submit", Utc::now(), job_report());
        assert!(matches!(report.write_to(&path), Err(SubmitterError::Io(_))));
    }
}
