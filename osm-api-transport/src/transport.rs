//! The transport port.
//!
//! The client never opens sockets itself. Every request goes through a
//! [`Transport`], which is free to pool connections, enforce timeouts and
//! retry; the client only sees the final body or the final error.

use async_trait::async_trait;
use bytes::Bytes;
use osm_api_core::TransportResult;
use std::fmt;
use std::sync::Arc;

/// HTTP methods the port carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET.
    Get,
    /// PUT.
    Put,
}

impl Method {
    /// The method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request handed to a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header name/value pairs, in the order they are sent.
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    /// Create a request without headers.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    /// Create a GET request.
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    /// Add a header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value, ignoring ASCII case of the name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Performs HTTP requests for the client.
///
/// Implementations report any non-success status as
/// [`TransportError::Status`](osm_api_core::TransportError::Status) and
/// return the response body otherwise.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform a request and return the response body.
    async fn request(&self, request: &HttpRequest) -> TransportResult<Bytes>;

    /// A short name identifying the implementation.
    fn name(&self) -> &str;
}

/// Shared transport handle.
pub type BoxedTransport = Arc<dyn Transport>;

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request(&self, request: &HttpRequest) -> TransportResult<Bytes> {
        (**self).request(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = HttpRequest::get("https://example.org/api/capabilities")
            .header("User-Agent", "test/1.0")
            .header("Accept", "application/xml");

        assert_eq!(request.method, Method::Get);
        assert_eq!(request.headers.len(), 2);
        assert_eq!(request.header_value("user-agent"), Some("test/1.0"));
        assert_eq!(request.header_value("x-missing"), None);
    }

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Put.as_str(), "PUT");
    }
}
