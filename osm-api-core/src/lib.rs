//! # osm-api-core
//!
//! Core types, errors and geometry helpers for the osm-api client.
//!
//! This crate provides the foundational types used throughout osm-api:
//!
//! - **Errors**: the [`OsmError`] taxonomy and the [`TransportError`] reported by transports
//! - **Elements**: the closed [`ElementType`] enumeration
//! - **Model**: immutable [`Node`], [`Way`], [`Relation`] and [`Changeset`] values
//! - **Versions**: numerically ordered [`ApiVersion`]
//! - **Config keys**: the closed [`ConfigKey`] set
//! - **Geometry**: [`bbox_to_min_max`] and [`BoundingBox`]
//!
//! ## Example
//!
//! ```rust
//! use osm_api_core::{bbox_to_min_max, ElementType};
//!
//! let bbox = bbox_to_min_max("52.28", "0.07", "52.26", "0.03").unwrap();
//! assert_eq!(bbox.to_query(), "0.03,52.26,0.07,52.28");
//!
//! assert!("note".parse::<ElementType>().is_err());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod element;
pub mod errors;
pub mod geometry;
pub mod model;
pub mod version;

// Re-exports for convenience
pub use config::ConfigKey;
pub use element::{ElementType, MemberType};
pub use errors::{OsmError, OsmResult, TransportError, TransportResult};
pub use geometry::{bbox_to_min_max, BoundingBox};
pub use model::{Changeset, ElementInfo, Entity, Member, Node, Relation, Tags, Way};
pub use version::{ApiVersion, DEFAULT_API_VERSION};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::config::ConfigKey;
    pub use crate::element::{ElementType, MemberType};
    pub use crate::errors::{OsmError, OsmResult, TransportError};
    pub use crate::geometry::{bbox_to_min_max, BoundingBox};
    pub use crate::model::{Changeset, Entity, Member, Node, Relation, Tags, Way};
    pub use crate::version::ApiVersion;
}
