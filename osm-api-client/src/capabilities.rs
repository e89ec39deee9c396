//! Server capabilities.
//!
//! `GET /api/capabilities` advertises the API versions a server speaks and
//! the limits it enforces. The client fetches it once and keeps the parsed
//! [`Capabilities`] for its lifetime.

use crate::xml::{self, XmlElement};
use osm_api_core::{ApiVersion, OsmError, OsmResult};
use std::time::Duration;

/// Operational state of the server's subsystems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    /// Database state, usually `online`, `readonly` or `offline`.
    pub database: String,
    /// API state.
    pub api: String,
    /// GPS trace subsystem state.
    pub gpx: String,
}

impl ServiceStatus {
    /// Whether the API accepts reads.
    pub fn is_api_readable(&self) -> bool {
        matches!(self.api.as_str(), "online" | "readonly")
    }
}

/// The limits and version range a server advertises.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    min_version: ApiVersion,
    max_version: ApiVersion,
    timeout_seconds: u64,
    max_waynodes: u64,
    max_area: f64,
    tracepoints_per_page: Option<u64>,
    changeset_max_elements: Option<u64>,
    relation_max_members: Option<u64>,
    note_area_max: Option<f64>,
    status: Option<ServiceStatus>,
}

impl Capabilities {
    /// Parse a capabilities document.
    pub fn from_xml(body: &[u8]) -> OsmResult<Self> {
        let root = xml::parse_bytes(body).map_err(|e| OsmError::MalformedCapabilities(e.to_string()))?;
        if root.name() != "osm" {
            return Err(OsmError::MalformedCapabilities(format!(
                "expected <osm> root, found <{}>",
                root.name()
            )));
        }
        let api = root
            .child("api")
            .ok_or_else(|| OsmError::MalformedCapabilities("missing <api> element".to_string()))?;

        let min_version = version(api, "minimum")?;
        let max_version = version(api, "maximum")?;
        let timeout_seconds = whole(required_number(api, "timeout", "seconds")?, "timeout")?;
        let max_waynodes = whole(required_number(api, "waynodes", "maximum")?, "waynodes")?;
        let max_area = required_number(api, "area", "maximum")?;

        let status = api.child("status").map(|status| ServiceStatus {
            database: status.attr("database").unwrap_or("unknown").to_string(),
            api: status.attr("api").unwrap_or("unknown").to_string(),
            gpx: status.attr("gpx").unwrap_or("unknown").to_string(),
        });

        Ok(Self {
            min_version,
            max_version,
            timeout_seconds,
            max_waynodes,
            max_area,
            tracepoints_per_page: optional_whole(api, "tracepoints", "per_page")?,
            changeset_max_elements: optional_whole(api, "changesets", "maximum_elements")?,
            relation_max_members: optional_whole(api, "relationmembers", "maximum")?,
            note_area_max: optional_number(api, "note_area", "maximum")?,
            status,
        })
    }

    /// Oldest supported API version.
    pub fn min_version(&self) -> &ApiVersion {
        &self.min_version
    }

    /// Newest supported API version.
    pub fn max_version(&self) -> &ApiVersion {
        &self.max_version
    }

    /// Check whether a version is in the supported range.
    pub fn supports(&self, version: &ApiVersion) -> bool {
        version.is_within(&self.min_version, &self.max_version)
    }

    /// Request timeout the server enforces, in seconds.
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Request timeout as a duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Maximum number of nodes in a way.
    pub fn max_elements(&self) -> u64 {
        self.max_waynodes
    }

    /// Maximum bounding box area for map requests, in square degrees.
    pub fn max_bbox_area(&self) -> f64 {
        self.max_area
    }

    /// GPS points per trace page.
    pub fn tracepoints_per_page(&self) -> Option<u64> {
        self.tracepoints_per_page
    }

    /// Maximum number of edits in one changeset.
    pub fn changeset_max_elements(&self) -> Option<u64> {
        self.changeset_max_elements
    }

    /// Maximum number of members in one relation.
    pub fn relation_max_members(&self) -> Option<u64> {
        self.relation_max_members
    }

    /// Maximum bounding box area for note queries.
    pub fn note_area_max(&self) -> Option<f64> {
        self.note_area_max
    }

    /// Subsystem status, if advertised.
    pub fn status(&self) -> Option<&ServiceStatus> {
        self.status.as_ref()
    }
}

fn version(api: &XmlElement, attr: &str) -> OsmResult<ApiVersion> {
    let value = api
        .child("version")
        .and_then(|element| element.attr(attr))
        .ok_or_else(|| OsmError::MalformedCapabilities(format!("missing version {attr}")))?;
    value
        .parse()
        .map_err(|_| OsmError::MalformedCapabilities(format!("version {attr} '{value}' is not a version")))
}

fn optional_number(api: &XmlElement, element: &str, attr: &str) -> OsmResult<Option<f64>> {
    let Some(value) = api.child(element).and_then(|e| e.attr(attr)) else {
        return Ok(None);
    };
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() && number >= 0.0 => Ok(Some(number)),
        _ => Err(OsmError::MalformedCapabilities(format!(
            "<{element} {attr}> is not numeric: '{value}'"
        ))),
    }
}

fn required_number(api: &XmlElement, element: &str, attr: &str) -> OsmResult<f64> {
    optional_number(api, element, attr)?
        .ok_or_else(|| OsmError::MalformedCapabilities(format!("missing <{element} {attr}>")))
}

fn optional_whole(api: &XmlElement, element: &str, attr: &str) -> OsmResult<Option<u64>> {
    optional_number(api, element, attr)?
        .map(|number| whole(number, element))
        .transpose()
}

// Limits may be written as floats ("300.0"); they must still be whole.
fn whole(number: f64, element: &str) -> OsmResult<u64> {
    if number.fract() != 0.0 {
        return Err(OsmError::MalformedCapabilities(format!(
            "<{element}> limit {number} is not a whole number"
        )));
    }
    Ok(number as u64)
}
