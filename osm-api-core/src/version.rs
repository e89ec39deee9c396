//! API version numbers.

use crate::errors::OsmError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The API version the library speaks by default.
pub const DEFAULT_API_VERSION: &str = "0.6";

/// A `major.minor` API version.
///
/// Versions compare numerically, so `0.10` is newer than `0.6`, but
/// display as the text they were parsed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion {
    major: u32,
    minor: u32,
    raw: String,
}

impl ApiVersion {
    /// Major component.
    #[must_use]
    pub fn major(&self) -> u32 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub fn minor(&self) -> u32 {
        self.minor
    }

    /// The version as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Check whether this version lies in `[min, max]`.
    #[must_use]
    pub fn is_within(&self, min: &ApiVersion, max: &ApiVersion) -> bool {
        self >= min && self <= max
    }
}

impl Default for ApiVersion {
    fn default() -> Self {
        Self {
            major: 0,
            minor: 6,
            raw: DEFAULT_API_VERSION.to_string(),
        }
    }
}

impl FromStr for ApiVersion {
    type Err = OsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let invalid = || OsmError::invalid_config("api_version", format!("'{s}' is not a major.minor version"));

        let (major, minor) = match raw.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (raw, "0"),
        };
        let major = major.parse::<u32>().map_err(|_| invalid())?;
        let minor = minor.parse::<u32>().map_err(|_| invalid())?;

        Ok(Self {
            major,
            minor,
            raw: raw.to_string(),
        })
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = OsmError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.raw
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl PartialEq for ApiVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ApiVersion {}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}
