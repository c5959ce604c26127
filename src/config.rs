//! Configuração do submitter carregada a partir de `submitter.toml`.
//!
//! A struct [`SubmitterConfig`] contém os parâmetros do processo e a tabela
//! `[submission]` ([`SubmissionConfig`]) com os parâmetros do job.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `SUBMITTER_ENDPOINT` tem precedência sobre o arquivo.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;

use crate::error::SubmitterError;
use crate::scheduler::SimTime;

pub const DEFAULT_CONFIG_FILE: &str = "submitter.toml";
pub const ENDPOINT_ENV: &str = "SUBMITTER_ENDPOINT";

/// Formato de saída dos logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Configuração de nível superior carregada de `submitter.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitterConfig {
    /// Nome da instância do job; prefixa as séries de métricas.
    #[serde(default = "default_name")]
    pub name: String,

    /// URL completa do endpoint de submissão.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Timeout de cada requisição em milissegundos (relógio real).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Nível de log quando `RUST_LOG` não está definido.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Horizonte opcional de tempo virtual, em milissegundos.
    #[serde(default)]
    pub sim_time_limit_ms: Option<u64>,

    #[serde(default)]
    pub submission: SubmissionConfig,
}

/// Parâmetros imutáveis de um job de submissão.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SubmissionConfig {
    /// Instante virtual do primeiro disparo, em milissegundos.
    #[serde(default)]
    pub start_at_ms: u64,

    /// Intervalo virtual entre disparos, em milissegundos. Zero é permitido.
    #[serde(default)]
    pub period_ms: u64,

    /// Número de tentativas. Valores `<= 0` não disparam nada.
    #[serde(default)]
    pub repeats: i64,

    #[serde(default)]
    pub score: i64,

    #[serde(default = "default_reveal")]
    pub reveal: bool,

    #[serde(default)]
    pub model_idx: i64,

    #[serde(default)]
    pub from_idx: i64,
}

// Valor padrão para o nome do job: "submitter".
fn default_name() -> String {
    "submitter".to_string()
}

// Valor padrão para o endpoint: o bridge local.
fn default_endpoint() -> String {
    "http://127.0.0.1:4000/submit".to_string()
}

// Valor padrão para o timeout: 5000ms.
fn default_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_reveal() -> bool {
    true
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            start_at_ms: 0,
            period_ms: 0,
            repeats: 0,
            score: 0,
            reveal: default_reveal(),
            model_idx: 0,
            from_idx: 0,
        }
    }
}

impl SubmissionConfig {
    pub fn start_at(&self) -> SimTime {
        SimTime::from_millis(self.start_at_ms)
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    /// Número efetivo de tentativas; negativos contam como zero.
    pub fn attempts(&self) -> u64 {
        u64::try_from(self.repeats).unwrap_or(0)
    }
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            sim_time_limit_ms: None,
            submission: SubmissionConfig::default(),
        }
    }
}

impl SubmitterConfig {
    /// Carrega a configuração de `submitter.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Carrega a configuração de um caminho explícito.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str::<SubmitterConfig>(&contents).map_err(SubmitterError::from)?
        } else {
            Self::default()
        };

        // Variável de ambiente tem precedência sobre o arquivo para o endpoint.
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV)
            && !endpoint.is_empty()
        {
            config.endpoint = endpoint;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SubmitterError> {
        if self.endpoint.trim().is_empty() {
            return Err(SubmitterError::Config("endpoint must not be empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(SubmitterError::Config("timeout_ms must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn sim_time_limit(&self) -> Option<SimTime> {
        self.sim_time_limit_ms.map(SimTime::from_millis)
    }
}
