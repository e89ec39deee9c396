use super::{ElementInfo, Tags};
use serde::{Deserialize, Serialize};

/// A point on the map.
///
/// Latitude and longitude are kept as the decimal strings the server sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    info: ElementInfo,
    lat: String,
    lon: String,
    #[serde(default)]
    tags: Tags,
}

impl Node {
    /// Create a node without tags.
    #[must_use]
    pub fn new(info: ElementInfo, lat: impl Into<String>, lon: impl Into<String>) -> Self {
        Self {
            info,
            lat: lat.into(),
            lon: lon.into(),
            tags: Tags::new(),
        }
    }

    /// Latitude as sent by the server.
    #[must_use]
    pub fn lat(&self) -> &str {
        &self.lat
    }

    /// Longitude as sent by the server.
    #[must_use]
    pub fn lon(&self) -> &str {
        &self.lon
    }

    /// `(lat, lon)` as floating point, for callers doing geometry.
    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.parse().ok()?;
        let lon = self.lon.parse().ok()?;
        Some((lat, lon))
    }
}

element_accessors!(Node);
