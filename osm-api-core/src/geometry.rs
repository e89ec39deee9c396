//! Bounding box normalisation.
//!
//! Coordinates stay decimal strings from input to output. They are parsed
//! only to compare them, so the text a caller passes in is exactly the text
//! that ends up in a request URL.

use crate::errors::{OsmError, OsmResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned box in latitude/longitude space.
///
/// Invariant: `min_lat <= max_lat` and `min_lon <= max_lon`, compared
/// numerically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    min_lat: String,
    min_lon: String,
    max_lat: String,
    max_lon: String,
}

// Deserialized boxes are normalised like any other input.
#[derive(Deserialize)]
struct RawBoundingBox {
    min_lat: String,
    min_lon: String,
    max_lat: String,
    max_lon: String,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = OsmError;

    fn try_from(raw: RawBoundingBox) -> Result<Self, Self::Error> {
        bbox_to_min_max(&raw.min_lat, &raw.min_lon, &raw.max_lat, &raw.max_lon)
    }
}

/// Normalise two opposite corners, given in any order, into a box.
///
/// # Example
///
/// ```rust
/// use osm_api_core::geometry::bbox_to_min_max;
///
/// let bbox = bbox_to_min_max("52.28", "0.0767326", "52.26", "0.0327873").unwrap();
/// assert_eq!(bbox.min_lat(), "52.26");
/// assert_eq!(bbox.min_lon(), "0.0327873");
/// assert_eq!(bbox.max_lat(), "52.28");
/// assert_eq!(bbox.max_lon(), "0.0767326");
/// ```
pub fn bbox_to_min_max(lat_a: &str, lon_a: &str, lat_b: &str, lon_b: &str) -> OsmResult<BoundingBox> {
    let lat_a_value = parse_coordinate(lat_a, 90.0)?;
    let lon_a_value = parse_coordinate(lon_a, 180.0)?;
    let lat_b_value = parse_coordinate(lat_b, 90.0)?;
    let lon_b_value = parse_coordinate(lon_b, 180.0)?;

    let (min_lat, max_lat) = if lat_a_value <= lat_b_value {
        (lat_a, lat_b)
    } else {
        (lat_b, lat_a)
    };
    let (min_lon, max_lon) = if lon_a_value <= lon_b_value {
        (lon_a, lon_b)
    } else {
        (lon_b, lon_a)
    };

    Ok(BoundingBox {
        min_lat: min_lat.to_string(),
        min_lon: min_lon.to_string(),
        max_lat: max_lat.to_string(),
        max_lon: max_lon.to_string(),
    })
}

fn parse_coordinate(value: &str, limit: f64) -> OsmResult<f64> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| OsmError::InvalidCoordinate(value.to_string()))?;
    if !parsed.is_finite() || parsed.abs() > limit {
        return Err(OsmError::InvalidCoordinate(value.to_string()));
    }
    Ok(parsed)
}

// Every constructor runs parse_coordinate first, so the fallback is never taken.
fn numeric(value: &str) -> f64 {
    value.trim().parse().unwrap_or(f64::NAN)
}

impl BoundingBox {
    /// Minimum latitude.
    #[must_use]
    pub fn min_lat(&self) -> &str {
        &self.min_lat
    }

    /// Minimum longitude.
    #[must_use]
    pub fn min_lon(&self) -> &str {
        &self.min_lon
    }

    /// Maximum latitude.
    #[must_use]
    pub fn max_lat(&self) -> &str {
        &self.max_lat
    }

    /// Maximum longitude.
    #[must_use]
    pub fn max_lon(&self) -> &str {
        &self.max_lon
    }

    /// The four bounds as `(min_lat, min_lon, max_lat, max_lon)`.
    #[must_use]
    pub fn as_tuple(&self) -> (&str, &str, &str, &str) {
        (&self.min_lat, &self.min_lon, &self.max_lat, &self.max_lon)
    }

    /// Area in square degrees.
    #[must_use]
    pub fn area(&self) -> f64 {
        let height = numeric(&self.max_lat) - numeric(&self.min_lat);
        let width = numeric(&self.max_lon) - numeric(&self.min_lon);
        height * width
    }

    /// Fail with [`OsmError::BboxTooLarge`] when the area exceeds `allowed`.
    pub fn check_area(&self, allowed: f64) -> OsmResult<()> {
        let computed = self.area();
        if computed > allowed {
            return Err(OsmError::BboxTooLarge { computed, allowed });
        }
        Ok(())
    }

    /// Render the `bbox` query parameter: `min_lon,min_lat,max_lon,max_lat`.
    #[must_use]
    pub fn to_query(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) - ({}, {})",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}
