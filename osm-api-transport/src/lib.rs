//! # osm-api-transport
//!
//! The HTTP seam of osm-api.
//!
//! The client talks to the network only through the [`Transport`] trait.
//! This crate provides:
//!
//! - [`ReqwestTransport`]: pooled HTTPS over reqwest with retry and timeouts
//! - [`MemoryTransport`]: queued canned responses for tests
//! - [`RetryConfig`] and [`with_retry`]: the retry policy used by transports
//!
//! ## Example
//!
//! ```rust
//! use osm_api_transport::{HttpRequest, MemoryTransport, Transport};
//!
//! # tokio_test::block_on(async {
//! let transport = MemoryTransport::new();
//! transport.push_response("<osm/>");
//!
//! let body = transport
//!     .request(&HttpRequest::get("https://example.org/api/capabilities"))
//!     .await
//!     .unwrap();
//! assert_eq!(&body[..], b"<osm/>");
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

#[cfg(feature = "reqwest")]
pub mod http;
pub mod memory;
pub mod retry;
pub mod transport;

#[cfg(feature = "reqwest")]
pub use http::{ReqwestTransport, ReqwestTransportBuilder, DEFAULT_TIMEOUT};
pub use memory::MemoryTransport;
pub use retry::{with_retry, RetryCondition, RetryConfig, WaitStrategy};
pub use transport::{BoxedTransport, HttpRequest, Method, Transport};

/// Prelude for common imports.
pub mod prelude {
    #[cfg(feature = "reqwest")]
    pub use crate::http::ReqwestTransport;
    pub use crate::memory::MemoryTransport;
    pub use crate::retry::RetryConfig;
    pub use crate::transport::{HttpRequest, Transport};
}
