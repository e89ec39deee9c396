//! # osm-api-client
//!
//! Read client for the OpenStreetMap API.
//!
//! [`OsmClient`] negotiates server capabilities on first use, checks the
//! configured API version against them, and decodes `<osm>` responses into
//! the entity types of `osm-api-core`.
//!
//! ## Example
//!
//! ```rust
//! use osm_api_client::OsmClient;
//! use osm_api_transport::MemoryTransport;
//!
//! # tokio_test::block_on(async {
//! let transport = MemoryTransport::new();
//! transport.push_response(
//!     r#"<osm><api><version minimum="0.6" maximum="0.6"/><area maximum="0.25"/>
//!        <waynodes maximum="2000"/><timeout seconds="300"/></api></osm>"#,
//! );
//! transport.push_response(r#"<osm><node id="1" lat="52.5" lon="13.4"/></osm>"#);
//!
//! let client = OsmClient::with_transport(transport);
//! let node = client.get_node(1).await.unwrap();
//! assert_eq!(node.lat(), "52.5");
//! # });
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod capabilities;
pub mod client;
pub mod config;
pub mod decode;
pub mod document;
pub mod xml;

pub use capabilities::{Capabilities, ServiceStatus};
pub use client::{OsmClient, OsmClientBuilder};
pub use config::{Config, DEFAULT_SERVER, DEFAULT_USER_AGENT};
pub use document::OsmDocument;
pub use xml::{XmlElement, XmlError};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::capabilities::Capabilities;
    pub use crate::client::{OsmClient, OsmClientBuilder};
    pub use crate::document::OsmDocument;
}
