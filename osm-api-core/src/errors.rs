//! Error types for osm-api.
//!
//! Every failure a client call can produce is a variant of [`OsmError`].
//! Transport failures keep their own type, [`TransportError`], so that
//! transport implementations do not need to know about the rest of the
//! taxonomy.

use crate::element::ElementType;
use std::time::Duration;
use thiserror::Error;

/// The main error type for osm-api operations.
#[derive(Error, Debug)]
pub enum OsmError {
    /// A configuration key outside the recognised set.
    #[error("Unknown config parameter '{0}'")]
    UnknownConfigParameter(String),

    /// A recognised configuration key was given a value it cannot hold.
    #[error("Invalid value for config parameter '{key}': {reason}")]
    InvalidConfigValue {
        /// The configuration key.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The configured API version is outside the range the server supports.
    #[error("Unsupported API version {requested} (server supports {min} to {max})")]
    UnsupportedApiVersion {
        /// The configured version.
        requested: String,
        /// Minimum version advertised by the server.
        min: String,
        /// Maximum version advertised by the server.
        max: String,
    },

    /// An element type outside node, way, relation and changeset.
    #[error("Invalid Element Type '{0}'")]
    InvalidElementType(String),

    /// Element ids are positive integers.
    #[error("Invalid element id {0}: ids must be positive")]
    InvalidId(u64),

    /// The transport failed or the server answered with a non-success status.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The capabilities document lacks a required field.
    #[error("Malformed capabilities document: {0}")]
    MalformedCapabilities(String),

    /// A response did not match the schema of the expected element.
    #[error("Malformed {expected} response: {reason}")]
    MalformedResponse {
        /// The element (or document) type that was expected.
        expected: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A well-formed response that does not contain the requested element.
    #[error("{element_type} {id} not found")]
    ElementNotFound {
        /// Requested element type.
        element_type: ElementType,
        /// Requested id.
        id: u64,
    },

    /// A bounding box larger than the server allows.
    #[error("Bounding box area {computed} exceeds the maximum of {allowed} square degrees")]
    BboxTooLarge {
        /// Area of the requested box in square degrees.
        computed: f64,
        /// Maximum area advertised by the server.
        allowed: f64,
    },

    /// A coordinate that is not a decimal number in range.
    #[error("Invalid coordinate '{0}'")]
    InvalidCoordinate(String),
}

impl OsmError {
    /// Create a malformed response error.
    pub fn malformed(expected: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            expected: expected.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config value error.
    pub fn invalid_config(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Check if this error means the element does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }

    /// Check if this error came from the transport.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias using OsmError.
pub type OsmResult<T> = std::result::Result<T, OsmError>;

/// Errors reported by a transport implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
        /// Retry-After header value.
        retry_after: Option<Duration>,
    },

    /// The request timed out.
    #[error("Request timed out")]
    Timeout,

    /// The connection could not be established or was dropped.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl TransportError {
    /// Create a status error.
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
            retry_after: None,
        }
    }

    /// Create a connection error.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Get the HTTP status if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get the suggested retry-after duration.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Status { retry_after, .. } => *retry_after,
            _ => None,
        }
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_config_message() {
        let err = OsmError::UnknownConfigParameter("api".to_string());
        assert_eq!(err.to_string(), "Unknown config parameter 'api'");
    }

    #[test]
    fn test_invalid_element_type_message() {
        let err = OsmError::InvalidElementType("note".to_string());
        assert!(err.to_string().starts_with("Invalid Element Type"));
    }

    #[test]
    fn test_not_found() {
        let err = OsmError::ElementNotFound {
            element_type: ElementType::Way,
            id: 7,
        };
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "way 7 not found");
    }

    #[test]
    fn test_transport_conversion() {
        let err: OsmError = TransportError::status(503, "down").into();
        assert!(err.is_transport());
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(TransportError::status(410, "gone").status_code(), Some(410));
        assert_eq!(TransportError::Timeout.status_code(), None);
    }
}
