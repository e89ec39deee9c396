//! Element type enumerations.

use crate::errors::OsmError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kinds of object the API serves by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// An ordered list of members with roles.
    Relation,
    /// A group of edits.
    Changeset,
}

impl ElementType {
    /// All element types, in API order.
    pub const ALL: [ElementType; 4] = [
        ElementType::Node,
        ElementType::Way,
        ElementType::Relation,
        ElementType::Changeset,
    ];

    /// The name used in URLs and XML element names.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
            Self::Changeset => "changeset",
        }
    }

    /// The plural path segment used by multi-fetch requests.
    #[must_use]
    pub fn plural(&self) -> &'static str {
        match self {
            Self::Node => "nodes",
            Self::Way => "ways",
            Self::Relation => "relations",
            Self::Changeset => "changesets",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = OsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "node" => Ok(Self::Node),
            "way" => Ok(Self::Way),
            "relation" => Ok(Self::Relation),
            "changeset" => Ok(Self::Changeset),
            other => Err(OsmError::InvalidElementType(other.to_string())),
        }
    }
}

/// The kinds of element a relation may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    /// Member is a node.
    Node,
    /// Member is a way.
    Way,
    /// Member is another relation.
    Relation,
}

impl MemberType {
    /// The name used in `<member type="..">`.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

impl fmt::Display for MemberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<MemberType> for ElementType {
    fn from(member: MemberType) -> Self {
        match member {
            MemberType::Node => Self::Node,
            MemberType::Way => Self::Way,
            MemberType::Relation => Self::Relation,
        }
    }
}

impl FromStr for MemberType {
    type Err = OsmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match ElementType::from_str(s)? {
            ElementType::Node => Ok(Self::Node),
            ElementType::Way => Ok(Self::Way),
            ElementType::Relation => Ok(Self::Relation),
            ElementType::Changeset => Err(OsmError::InvalidElementType(s.to_string())),
        }
    }
}
