use reqwest::Client;
use reqwest::redirect::Policy;
use tracing::error;

use super::{PostRequest, RawResponse, Transport};
use crate::error::TransportError;

/// [`Transport`] backed by `reqwest`.
///
/// A client that fails to build is kept as an error so that every attempt
/// made through it is counted as a failed submission instead of aborting.
/// Redirects are not followed: the endpoint's own status is what gets judged.
pub struct ReqwestTransport {
    client: Result<Client, String>,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .redirect(Policy::none())
            .build()
            .map_err(|err| {
                error!(error = %err, "failed to build HTTP client");
                err.to_string()
            });
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for ReqwestTransport {
    async fn post(&self, req: &PostRequest<'_>) -> Result<RawResponse, TransportError> {
        let client = self
            .client
            .as_ref()
            .map_err(|msg| TransportError::ClientInit(msg.clone()))?;

        let mut builder = client
            .post(req.url)
            .timeout(req.timeout)
            .body(req.body.to_owned());
        for (name, value) in req.headers {
            builder = builder.header(*name, *value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(RawResponse { status, body })
    }
}
