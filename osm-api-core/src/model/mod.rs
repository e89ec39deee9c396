//! Entity model.
//!
//! Entities are immutable values decoded from a server response. Each
//! variant owns its data outright; nothing is shared between requests.

/// Generates the metadata accessors shared by nodes, ways and relations.
macro_rules! element_accessors {
    ($ty:ty) => {
        impl $ty {
            /// Element id.
            #[must_use]
            pub fn id(&self) -> u64 {
                self.info.id
            }

            /// All metadata.
            #[must_use]
            pub fn info(&self) -> &$crate::model::ElementInfo {
                &self.info
            }

            /// Version number, if the server sent one.
            #[must_use]
            pub fn version(&self) -> Option<u64> {
                self.info.version
            }

            /// Changeset id, if the server sent one.
            #[must_use]
            pub fn changeset(&self) -> Option<u64> {
                self.info.changeset
            }

            /// Creation time of this version.
            #[must_use]
            pub fn timestamp(&self) -> Option<chrono::DateTime<chrono::Utc>> {
                self.info.timestamp
            }

            /// Editor display name.
            #[must_use]
            pub fn user(&self) -> Option<&str> {
                self.info.user.as_deref()
            }

            /// Whether this version is visible (not deleted).
            #[must_use]
            pub fn is_visible(&self) -> bool {
                self.info.visible
            }

            /// Tags.
            #[must_use]
            pub fn tags(&self) -> &$crate::model::Tags {
                &self.tags
            }

            /// Replace the tags.
            #[must_use]
            pub fn with_tags(mut self, tags: $crate::model::Tags) -> Self {
                self.tags = tags;
                self
            }
        }
    };
}

mod changeset;
mod node;
mod relation;
mod tags;
mod way;

pub use changeset::Changeset;
pub use node::Node;
pub use relation::{Member, Relation};
pub use tags::Tags;
pub use way::Way;

use crate::element::ElementType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata shared by nodes, ways and relations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementInfo {
    /// Element id. Always positive.
    pub id: u64,
    /// Version of this element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u64>,
    /// Changeset that produced this version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changeset: Option<u64>,
    /// When this version was created.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Display name of the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// User id of the editor.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<u64>,
    /// False for deleted versions in a history.
    pub visible: bool,
}

impl ElementInfo {
    /// Create metadata carrying only an id.
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            id,
            version: None,
            changeset: None,
            timestamp: None,
            user: None,
            uid: None,
            visible: true,
        }
    }

    /// Set the version.
    #[must_use]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the changeset id.
    #[must_use]
    pub fn with_changeset(mut self, changeset: u64) -> Self {
        self.changeset = Some(changeset);
        self
    }

    /// Set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Set the editor.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>, uid: Option<u64>) -> Self {
        self.user = Some(user.into());
        self.uid = uid;
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }
}

/// Any entity the API returns by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Entity {
    /// A node.
    Node(Node),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
    /// A changeset.
    Changeset(Changeset),
}

impl Entity {
    /// The entity's id.
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Node(node) => node.id(),
            Self::Way(way) => way.id(),
            Self::Relation(relation) => relation.id(),
            Self::Changeset(changeset) => changeset.id(),
        }
    }

    /// Which variant this is.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Node(_) => ElementType::Node,
            Self::Way(_) => ElementType::Way,
            Self::Relation(_) => ElementType::Relation,
            Self::Changeset(_) => ElementType::Changeset,
        }
    }

    /// The entity's tags.
    #[must_use]
    pub fn tags(&self) -> &Tags {
        match self {
            Self::Node(node) => node.tags(),
            Self::Way(way) => way.tags(),
            Self::Relation(relation) => relation.tags(),
            Self::Changeset(changeset) => changeset.tags(),
        }
    }

    /// Borrow as a node.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Borrow as a way.
    #[must_use]
    pub fn as_way(&self) -> Option<&Way> {
        match self {
            Self::Way(way) => Some(way),
            _ => None,
        }
    }

    /// Borrow as a relation.
    #[must_use]
    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Self::Relation(relation) => Some(relation),
            _ => None,
        }
    }

    /// Borrow as a changeset.
    #[must_use]
    pub fn as_changeset(&self) -> Option<&Changeset> {
        match self {
            Self::Changeset(changeset) => Some(changeset),
            _ => None,
        }
    }
}

impl From<Node> for Entity {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Way> for Entity {
    fn from(way: Way) -> Self {
        Self::Way(way)
    }
}

impl From<Relation> for Entity {
    fn from(relation: Relation) -> Self {
        Self::Relation(relation)
    }
}

impl From<Changeset> for Entity {
    fn from(changeset: Changeset) -> Self {
        Self::Changeset(changeset)
    }
}
