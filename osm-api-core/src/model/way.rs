use super::{ElementInfo, Tags};
use serde::{Deserialize, Serialize};

/// An ordered list of node references.
///
/// A node may appear more than once; a closed way repeats its first node at
/// the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Way {
    info: ElementInfo,
    nodes: Vec<u64>,
    #[serde(default)]
    tags: Tags,
}

impl Way {
    /// Create a way without tags.
    #[must_use]
    pub fn new(info: ElementInfo, nodes: Vec<u64>) -> Self {
        Self {
            info,
            nodes,
            tags: Tags::new(),
        }
    }

    /// Node ids in document order.
    #[must_use]
    pub fn nodes(&self) -> &[u64] {
        &self.nodes
    }

    /// Whether the way starts and ends at the same node.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.nodes.len() > 2 && self.nodes.first() == self.nodes.last()
    }
}

element_accessors!(Way);
