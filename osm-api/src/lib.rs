//! # osm-api - Typed async client for the OpenStreetMap API
//!
//! osm-api reads nodes, ways, relations, changesets and element histories
//! from an OpenStreetMap API server. It negotiates the server's
//! capabilities before the first data request and decodes every response
//! into immutable, strongly typed entities.
//!
//! ## Quick Start
//!
//! ```ignore
//! use osm_api::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = OsmClient::new()?;
//!
//!     let way = client.get_way(25978036).await?;
//!     println!("highway={} with {} nodes", &way.tags()["highway"], way.nodes().len());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `reqwest` | HTTPS transport over reqwest with retries | ✅ |
//!
//! Without `reqwest`, supply your own [`Transport`].
//!
//! ## Architecture
//!
//! - [`osm_api_core`] - Errors, entity model, versions, bounding boxes
//! - [`osm_api_transport`] - The transport trait, retry policy and transports
//! - [`osm_api_client`] - Config store, XML decoding, capabilities and the client
//!
//! ## Testing without a network
//!
//! ```rust
//! use osm_api::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let transport = MemoryTransport::new();
//! let client = OsmClient::with_transport(transport.clone());
//!
//! let err = client.get_history_str("note", 1).await.unwrap_err();
//! assert!(matches!(err, OsmError::InvalidElementType(_)));
//! assert_eq!(transport.request_count(), 0);
//! # });
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Core types.
pub use osm_api_core as core;

/// Transports.
pub use osm_api_transport as transport;

/// The client.
pub use osm_api_client as client;

// ============================================================================
// Type Re-exports
// ============================================================================

// Errors
pub use osm_api_core::{OsmError, OsmResult, TransportError, TransportResult};

// Model
pub use osm_api_core::{
    bbox_to_min_max, ApiVersion, BoundingBox, Changeset, ConfigKey, ElementInfo, ElementType,
    Entity, Member, MemberType, Node, Relation, Tags, Way,
};

// Transport
pub use osm_api_transport::{
    BoxedTransport, HttpRequest, MemoryTransport, Method, RetryCondition, RetryConfig, Transport,
    WaitStrategy,
};

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub use osm_api_transport::ReqwestTransport;

// Client
pub use osm_api_client::{
    Capabilities, Config, OsmClient, OsmClientBuilder, OsmDocument, ServiceStatus,
};

// ============================================================================
// Prelude Module
// ============================================================================

/// Convenient prelude for common imports.
///
/// ```ignore
/// use osm_api::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::prelude::*;
    pub use crate::client::prelude::*;

    pub use crate::transport::{MemoryTransport, RetryConfig, Transport};

    #[cfg(feature = "reqwest")]
    pub use crate::transport::ReqwestTransport;
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
