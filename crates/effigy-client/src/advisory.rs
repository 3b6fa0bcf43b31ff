//! Advisory service client

use std::fmt;
use std::sync::Arc;

use effigy_api::{AdvisoryRequest, AdvisoryResponse};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::diagnostics::{DiagnosticSink, StderrSink};
use crate::error::{ClientError, Result};
use crate::transport::{HttpTransport, ReqwestTransport};

/// The efigy.io oneshot endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.efigy.io/apple/oneshot";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Client for the advisory service
///
/// Each [`call`](Self::call) is one POST with no retry. Cloning is cheap and
/// clones share the transport.
#[derive(Clone)]
pub struct AdvisoryClient {
    transport: Arc<dyn HttpTransport>,
    endpoint: Url,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl AdvisoryClient {
    /// Create a client for the default endpoint using `reqwest`
    ///
    /// # Errors
    /// Returns an error if the endpoint URL is invalid.
    pub fn new() -> Result<Self> {
        Self::with_transport(Arc::new(ReqwestTransport::new()))
    }

    /// Create a client for the default endpoint with a custom transport
    ///
    /// # Errors
    /// Returns an error if the endpoint URL is invalid.
    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Result<Self> {
        Ok(Self {
            transport,
            endpoint: Url::parse(DEFAULT_ENDPOINT)?,
            diagnostics: Arc::new(StderrSink),
        })
    }

    /// Point the client at a different endpoint
    ///
    /// # Errors
    /// Returns an error if `endpoint` is not a valid URL.
    pub fn with_endpoint(mut self, endpoint: impl AsRef<str>) -> Result<Self> {
        self.endpoint = Url::parse(endpoint.as_ref())?;
        Ok(self)
    }

    /// Send error bodies somewhere other than stderr
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Endpoint this client posts to
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Ask the advisory service for the latest versions
    ///
    /// # Errors
    /// - [`ClientError::Http`] / [`ClientError::Transport`] if the request
    ///   could not be completed
    /// - [`ClientError::Status`] for any status other than 200; the body is
    ///   copied to the diagnostic sink first
    /// - [`ClientError::Decode`] if a 200 body is not an advisory response
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    pub async fn call(&self, request: &AdvisoryRequest) -> Result<AdvisoryResponse> {
        let body = serde_json::to_vec(request)?;

        debug!(bytes = body.len(), "posting advisory request");

        let response = self
            .transport
            .post(&self.endpoint, JSON_CONTENT_TYPE, body)
            .await?;

        if response.status != StatusCode::OK {
            warn!(
                status = response.status.as_u16(),
                bytes = response.body.len(),
                "advisory API returned an error"
            );
            self.diagnostics.write_body(&response.body);
            return Err(ClientError::Status(response.status));
        }

        serde_json::from_slice(&response.body).map_err(ClientError::Decode)
    }
}

impl fmt::Debug for AdvisoryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdvisoryClient")
            .field("endpoint", &self.endpoint.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::diagnostics::MemorySink;
    use crate::transport::HttpResponse;

    /// Returns one canned response and records what was posted
    struct CannedTransport {
        status: StatusCode,
        body: &'static str,
        posted: Mutex<Vec<(String, String, Vec<u8>)>>,
    }

    impl CannedTransport {
        fn new(status: StatusCode, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body,
                posted: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for CannedTransport {
        async fn post(&self, url: &Url, content_type: &str, body: Vec<u8>) -> Result<HttpResponse> {
            self.posted
                .lock()
                .unwrap()
                .push((url.to_string(), content_type.to_string(), body));
            Ok(HttpResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct Unreachable;

    #[async_trait]
    impl HttpTransport for Unreachable {
        async fn post(&self, _url: &Url, _content_type: &str, _body: Vec<u8>) -> Result<HttpResponse> {
            Err(ClientError::Transport("dns error: no such host".into()))
        }
    }

    const ADVISORY: &str = r#"{"latest_efi_version":{"msg":"1.2.3"}, "latest_os_version":{"msg":"10.1"}, "latest_build_number":{"msg":"B100"}}"#;

    fn request() -> AdvisoryRequest {
        AdvisoryRequest {
            build_number: "19H2".into(),
            rom_version: "426.0.0.0.0".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_endpoint() {
        let client = AdvisoryClient::new().unwrap();
        assert_eq!(client.endpoint().as_str(), DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_invalid_endpoint() {
        let client = AdvisoryClient::new().unwrap().with_endpoint("not a url");
        assert!(matches!(client, Err(ClientError::Url(_))));
    }

    #[tokio::test]
    async fn test_call_posts_compact_json() {
        let transport = CannedTransport::new(StatusCode::OK, ADVISORY);
        let client = AdvisoryClient::with_transport(transport.clone()).unwrap();

        let response = client.call(&request()).await.unwrap();
        assert_eq!(response.latest_efi_version.msg, "1.2.3");
        assert_eq!(response.latest_os_version.msg, "10.1");
        assert_eq!(response.latest_build_number.msg, "B100");

        let posted = transport.posted.lock().unwrap();
        assert_eq!(posted.len(), 1);
        let (url, content_type, body) = &posted[0];
        assert_eq!(url, DEFAULT_ENDPOINT);
        assert_eq!(content_type, "application/json");

        let sent: serde_json::Value = serde_json::from_slice(body).unwrap();
        assert_eq!(sent["build_num"], "19H2");
        assert_eq!(sent["rom_ver"], "426.0.0.0.0");
        assert!(!body.contains(&b'\n'));
    }

    #[tokio::test]
    async fn test_error_status_writes_diagnostics() {
        let sink = MemorySink::new();
        let client = AdvisoryClient::with_transport(CannedTransport::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "upstream unavailable",
        ))
        .unwrap()
        .with_diagnostics(Arc::new(sink.clone()));

        let err = client.call(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("503"));
        assert_eq!(sink.contents(), b"upstream unavailable");
    }

    #[tokio::test]
    async fn test_non_200_success_is_still_an_error() {
        let sink = MemorySink::new();
        let client = AdvisoryClient::with_transport(CannedTransport::new(StatusCode::ACCEPTED, ""))
            .unwrap()
            .with_diagnostics(Arc::new(sink.clone()));

        let err = client.call(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(202));
    }

    #[tokio::test]
    async fn test_unknown_status_message() {
        let status = StatusCode::from_u16(599).unwrap();
        let client = AdvisoryClient::with_transport(CannedTransport::new(status, ""))
            .unwrap()
            .with_diagnostics(Arc::new(MemorySink::new()));

        let err = client.call(&request()).await.unwrap_err();
        assert_eq!(err.status(), Some(599));
        assert!(err.to_string().starts_with("advisory API returned status 599"));
        assert!(!err.to_string().ends_with(' '));
    }

    #[tokio::test]
    async fn test_malformed_body_is_rejected() {
        let sink = MemorySink::new();
        let client = AdvisoryClient::with_transport(CannedTransport::new(StatusCode::OK, "<html>"))
            .unwrap()
            .with_diagnostics(Arc::new(sink.clone()));

        let err = client.call(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Decode(_)));
        assert!(sink.contents().is_empty());
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let client = AdvisoryClient::with_transport(Arc::new(Unreachable)).unwrap();

        let err = client.call(&request()).await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(msg) if msg.contains("dns")));
    }
}
