//! In-memory transport for tests.

use crate::transport::{HttpRequest, Transport};
use async_trait::async_trait;
use bytes::Bytes;
use osm_api_core::{TransportError, TransportResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// Transport that replays queued responses in order and records every
/// request it sees.
///
/// Clones share the same queue and log, so a test can keep one handle and
/// give another to the client.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    responses: Arc<Mutex<VecDeque<TransportResult<Bytes>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MemoryTransport {
    /// Create a new memory transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn push_response(&self, body: impl Into<Bytes>) {
        self.responses.lock().push_back(Ok(body.into()));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Recorded requests, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Number of queued responses not yet consumed.
    pub fn pending(&self) -> usize {
        self.responses.lock().len()
    }

    /// Clear all queued responses and recorded requests.
    pub fn clear(&self) {
        self.responses.lock().clear();
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn request(&self, request: &HttpRequest) -> TransportResult<Bytes> {
        self.requests.lock().push(request.clone());

        let next = self.responses.lock().pop_front();
        next.unwrap_or_else(|| {
            Err(TransportError::connection(format!(
                "no queued response for {}",
                request.url
            )))
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_transport() {
        let transport = MemoryTransport::new();
        transport.push_response("first");
        transport.push_error(TransportError::status(404, ""));

        let request = HttpRequest::get("https://example.org/api/0.6/node/1");
        let body = transport.request(&request).await.unwrap();
        assert_eq!(&body[..], b"first");

        let err = transport.request(&request).await.unwrap_err();
        assert_eq!(err.status_code(), Some(404));

        assert_eq!(transport.request_count(), 2);
        assert_eq!(transport.requests()[0].url, request.url);
    }

    #[tokio::test]
    async fn test_empty_queue_is_connection_error() {
        let transport = MemoryTransport::new();
        let err = transport
            .request(&HttpRequest::get("https://example.org/"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Connection(_)));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let transport = MemoryTransport::new();
        let handle = transport.clone();
        handle.push_response("shared");

        transport
            .request(&HttpRequest::get("https://example.org/"))
            .await
            .unwrap();
        assert_eq!(handle.request_count(), 1);
        assert_eq!(handle.pending(), 0);

        handle.clear();
        assert_eq!(transport.request_count(), 0);
    }
}
