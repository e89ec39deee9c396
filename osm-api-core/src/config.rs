//! Configuration keys.
//!
//! The set of keys is closed. Code that knows the key at compile time uses
//! [`ConfigKey`] directly; string keys coming from outside (option maps,
//! environment, user input) go through [`ConfigKey::from_str`], which is the
//! only place an unknown key can be reported.

use crate::errors::OsmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A recognised configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigKey {
    /// Base URL of the API server.
    Server,
    /// API version requested in entity URLs.
    ApiVersion,
    /// Value of the `User-Agent` header.
    UserAgent,
    /// The transport used to reach the server.
    Adapter,
}

impl ConfigKey {
    /// All keys, in snapshot order.
    pub const ALL: [ConfigKey; 4] = [
        ConfigKey::Server,
        ConfigKey::ApiVersion,
        ConfigKey::UserAgent,
        ConfigKey::Adapter,
    ];

    /// The key as written in option maps.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::ApiVersion => "api_version",
            Self::UserAgent => "user_agent",
            Self::Adapter => "adapter",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = OsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| OsmError::UnknownConfigParameter(s.to_string()))
    }
}
