//! reqwest-backed transport with automatic retries.

use crate::retry::{with_retry, RetryConfig};
use crate::transport::{HttpRequest, Method, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use osm_api_core::{TransportError, TransportResult};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection(err.to_string())
    } else {
        TransportError::Other(err.into())
    }
}

/// Transport over a pooled [`reqwest::Client`].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    retry: RetryConfig,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout and retry policy.
    pub fn new() -> TransportResult<Self> {
        Self::builder().build()
    }

    /// Create a builder.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::new()
    }

    /// Wrap an existing client.
    pub fn with_client(client: Client, retry: RetryConfig) -> Self {
        Self { client, retry }
    }

    /// Get a reference to the underlying client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get a reference to the retry config.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry
    }

    async fn send_once(&self, request: &HttpRequest) -> TransportResult<Bytes> {
        debug!(method = %request.method, url = %request.url, "Making HTTP request");

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Put => reqwest::Method::PUT,
        };
        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let response = check_response(response).await?;
        response.bytes().await.map_err(map_reqwest_error)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn request(&self, request: &HttpRequest) -> TransportResult<Bytes> {
        with_retry(&self.retry, || self.send_once(request)).await
    }

    fn name(&self) -> &str {
        "reqwest"
    }
}

/// Turn a non-success response into a status error.
async fn check_response(response: Response) -> TransportResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let retry_after = parse_retry_after(&response);
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status,
        body,
        retry_after,
    })
}

/// Parse Retry-After header.
fn parse_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    client: Option<Client>,
    timeout: Option<Duration>,
    retry: Option<RetryConfig>,
}

impl ReqwestTransportBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client. The timeout setting is ignored.
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the retry policy.
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Build the transport.
    pub fn build(self) -> TransportResult<ReqwestTransport> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
                .build()
                .map_err(map_reqwest_error)?,
        };

        Ok(ReqwestTransport {
            client,
            retry: self.retry.unwrap_or_default(),
        })
    }
}
