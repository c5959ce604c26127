mod cli;
mod config;
mod error;
mod exchange;
mod logger;
mod report;
mod scheduler;
mod stats;
mod submission;
mod ui;

use std::path::Path;

use anyhow::Result;
use chrono::Utc;
use clap::Parser;

use cli::{Cli, Command};
use config::SubmitterConfig;
use exchange::{HttpExchange, ReqwestTransport};
use report::RunReport;
use scheduler::{SubmissionJob, VirtualClock, run_job};
use stats::MemorySink;
use submission::{SubmitPayload, parse_response};
use ui::RunProgress;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dispatch(Cli::parse()).await
}

async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Run(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            config.validate()?;
            let level = if cli.verbose { "debug" } else { config.log_level.as_str() };
            logger::initialize(level, config.log_format);
            run(&config, args.output.as_deref()).await?;
        }
        Command::Payload(args) => {
            let mut config = load_config(cli.config.as_deref())?;
            args.apply(&mut config);
            let body = SubmitPayload::from(&config.submission).to_body()?;
            println!("{body}");
        }
        Command::Parse { body } => {
            ui::print_parsed(&parse_response(&body));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<SubmitterConfig> {
    match path {
        Some(path) => SubmitterConfig::load_from(path),
        None => SubmitterConfig::load(),
    }
}

async fn run(config: &SubmitterConfig, output: Option<&Path>) -> Result<()> {
    let started_at = Utc::now();
    let exchange = HttpExchange::new(ReqwestTransport::new(), &config.endpoint, config.timeout());
    let job = SubmissionJob::new(
        &config.name,
        config.submission.clone(),
        exchange,
        MemorySink::default(),
    );

    let progress = RunProgress::start(&config.name, config.submission.attempts());
    let mut clock = VirtualClock::with_limit(config.sim_time_limit());
    let report = run_job(job, &mut clock, |job| progress.tick(job.stats(), job.state())).await;
    progress.complete(&report.summary, report.completed);

    if let Some(path) = output {
        RunReport::new(&config.name, &config.endpoint, started_at, report).write_to(path)?;
        println!("  report written to {}", path.display());
    }

    Ok(())
}
