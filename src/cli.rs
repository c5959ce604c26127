//! Interface de linha de comando do submitter baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (run, payload, parse)
//! e flags globais (--config, --verbose). As flags de submissão sobrescrevem
//! os valores de `submitter.toml`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::SubmitterConfig;

/// Submitter periódico de votos/resultados em tempo virtual.
#[derive(Debug, Parser)]
#[command(name = "submitter", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Caminho para o arquivo de configuração (padrão: `submitter.toml`).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Executa um job de submissão até o fim em tempo virtual.
    Run(RunArgs),

    /// Mostra o corpo da requisição que `run` enviaria.
    Payload(SubmissionArgs),

    /// Extrai `ok` e `gasUsed` de um corpo de resposta.
    Parse {
        /// Corpo bruto da resposta.
        body: String,
    },
}

/// Sobrescritas dos parâmetros do job.
#[derive(Debug, Clone, Default, Args)]
pub struct SubmissionArgs {
    #[arg(long)]
    pub start_at_ms: Option<u64>,

    #[arg(long)]
    pub period_ms: Option<u64>,

    #[arg(long, allow_negative_numbers = true)]
    pub repeats: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub score: Option<i64>,

    #[arg(long)]
    pub reveal: Option<bool>,

    #[arg(long, allow_negative_numbers = true)]
    pub model_idx: Option<i64>,

    #[arg(long, allow_negative_numbers = true)]
    pub from_idx: Option<i64>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub submission: SubmissionArgs,

    /// URL do endpoint de submissão.
    #[arg(long)]
    pub endpoint: Option<String>,

    /// Horizonte de tempo virtual em milissegundos.
    #[arg(long)]
    pub sim_time_limit_ms: Option<u64>,

    /// Arquivo onde gravar o relatório JSON da execução.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

impl SubmissionArgs {
    pub fn apply(&self, config: &mut SubmitterConfig) {
        let sub = &mut config.submission;
        if let Some(v) = self.start_at_ms {
            sub.start_at_ms = v;
        }
        if let Some(v) = self.period_ms {
            sub.period_ms = v;
        }
        if let Some(v) = self.repeats {
            sub.repeats = v;
        }
        if let Some(v) = self.score {
            sub.score = v;
        }
        if let Some(v) = self.reveal {
            sub.reveal = v;
        }
        if let Some(v) = self.model_idx {
            sub.model_idx = v;
        }
        if let Some(v) = self.from_idx {
            sub.from_idx = v;
        }
    }
}

impl RunArgs {
    pub fn apply(&self, config: &mut SubmitterConfig) {
        self.submission.apply(config);
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(limit) = self.sim_time_limit_ms {
            config.sim_time_limit_ms = Some(limit);
        }
    }
}
