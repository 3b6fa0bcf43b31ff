//! HTTP transport abstraction

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::error::Result;

/// Status and body of an HTTP response
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response status
    pub status: StatusCode,
    /// Raw response body
    pub body: Vec<u8>,
}

/// Performs a single HTTP POST.
///
/// Implementations are shared between concurrent calls and must not keep
/// per-request state.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `url` and return the response, whatever its status
    ///
    /// # Errors
    /// Returns an error only if no response was received.
    async fn post(&self, url: &Url, content_type: &str, body: Vec<u8>) -> Result<HttpResponse>;
}

/// [`HttpTransport`] backed by a `reqwest::Client`
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Transport with reqwest's default client settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a client that gives up after `timeout`
    ///
    /// # Errors
    /// Returns an error if the TLS backend cannot be initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, body), fields(url = %url, bytes = body.len()))]
    async fn post(&self, url: &Url, content_type: &str, body: Vec<u8>) -> Result<HttpResponse> {
        let response = self
            .client
            .post(url.clone())
            .header(CONTENT_TYPE, content_type)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!(%status, bytes = body.len(), "response received");

        Ok(HttpResponse { status, body })
    }
}
