//! One request/response exchange against the submission endpoint.
//!
//! [`HttpExchange`] owns the fixed target, header and timeout, delegates the
//! wire work to an injectable [`Transport`], and classifies the result into an
//! [`AttemptOutcome`]. It never returns an error: every failure becomes a
//! failed outcome plus a diagnostic.

mod client;

use std::time::Duration;

use tracing::warn;

use crate::error::{FailureKind, TransportError};
use crate::submission::{SubmitPayload, parse_response};

pub use client::ReqwestTransport;

const JSON_HEADERS: &[(&str, &str)] = &[("Content-Type", "application/json")];
const SNIPPET_CHARS: usize = 256;

/// A POST as seen by the transport capability.
#[derive(Debug, Clone, Copy)]
pub struct PostRequest<'a> {
    pub url: &'a str,
    pub headers: &'a [(&'a str, &'a str)],
    pub body: &'a str,
    pub timeout: Duration,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Capability that can perform a single POST.
///
/// `Ok` means the transport completed and produced a status; any status,
/// including non-2xx, is reported through [`RawResponse`].
pub trait Transport {
    async fn post(&self, req: &PostRequest<'_>) -> Result<RawResponse, TransportError>;
}

/// Per-attempt result handed to the statistics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptOutcome {
    pub success: bool,
    pub gas_used: Option<u64>,
    pub http_status: Option<u16>,
    pub transport_error: Option<String>,
    pub failure: Option<FailureKind>,
}

impl AttemptOutcome {
    pub fn transport_failure(err: &TransportError) -> Self {
        Self {
            success: false,
            gas_used: None,
            http_status: None,
            transport_error: Some(err.to_string()),
            failure: Some(FailureKind::Transport),
        }
    }

    /// Success requires HTTP 200 and the success token. The gas value is
    /// reported whenever the body carries one, even on failure.
    pub fn from_response(resp: &RawResponse) -> Self {
        let parsed = parse_response(&resp.body);
        let success = resp.status == 200 && parsed.ok;
        Self {
            success,
            gas_used: parsed.gas_used,
            http_status: Some(resp.status),
            transport_error: None,
            failure: (!success).then_some(FailureKind::Protocol),
        }
    }
}

pub struct HttpExchange<T> {
    transport: T,
    endpoint: String,
    timeout: Duration,
}

impl<T: Transport> HttpExchange<T> {
    pub fn new(transport: T, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            transport,
            endpoint: endpoint.into(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    #[cfg(test)]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Perform one exchange. Not retried.
    pub async fn send(&self, payload: &SubmitPayload) -> AttemptOutcome {
        let body = match payload.to_body() {
            Ok(body) => body,
            Err(err) => {
                let err = TransportError::from(err);
                warn!(status = 0, error = %err, resp = "", "submission failed");
                return AttemptOutcome::transport_failure(&err);
            }
        };

        let request = PostRequest {
            url: &self.endpoint,
            headers: JSON_HEADERS,
            body: &body,
            timeout: self.timeout,
        };

        match self.transport.post(&request).await {
            Ok(resp) => {
                let outcome = AttemptOutcome::from_response(&resp);
                if !outcome.success {
                    warn!(
                        status = resp.status,
                        error = "none",
                        resp = snippet(&resp.body),
                        "submission failed"
                    );
                }
                outcome
            }
            Err(err) => {
                warn!(status = 0, error = %err, resp = "", "submission failed");
                AttemptOutcome::transport_failure(&err)
            }
        }
    }
}

fn snippet(body: &str) -> &str {
    body.char_indices()
        .nth(SNIPPET_CHARS)
        .map(|(idx, _)| &body[..idx])
        .unwrap_or(body)
}
