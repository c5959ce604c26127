use thiserror::Error;

#[derive(Debug, Error)]
pub enum SubmitterError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures of the transport layer. None of these abort a job: each one is
/// folded into a failed attempt with unknown gas.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP client initialisation failed: {0}")]
    ClientInit(String),

    #[error("payload encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Classifies a failed attempt for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FailureKind {
    /// The request never produced an HTTP response.
    Transport,
    /// A response arrived but was not a 200 carrying the success token.
    Protocol,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureKind::Transport => write!(f, "Transport"),
            FailureKind::Protocol => write!(f, "Protocol"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_display() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");
        let err = TransportError::Network("connection refused".into());
        assert_eq!(err.to_string(), "network error: connection refused");
    }

    #[test]
    fn config_error_display() {
        let err = SubmitterError::Config("endpoint must not be empty".into());
        assert_eq!(err.to_string(), "Config error: endpoint must not be empty");
    }

    #[test]
    fn failure_kind_display() {
        assert_eq!(FailureKind::Transport.to_string(), "Transport");
        assert_eq!(FailureKind::Protocol.to_string(), "Protocol");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransportError>();
        assert_send_sync::<SubmitterError>();
    }
}
