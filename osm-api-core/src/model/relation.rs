use super::{ElementInfo, Tags};
use crate::element::MemberType;
use serde::{Deserialize, Serialize};

/// One entry of a relation's member list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    /// Kind of the referenced element.
    #[serde(rename = "type")]
    pub member_type: MemberType,
    /// Id of the referenced element.
    #[serde(rename = "ref")]
    pub reference: u64,
    /// Role of the member; empty when none was given.
    pub role: String,
}

impl Member {
    /// Create a member.
    #[must_use]
    pub fn new(member_type: MemberType, reference: u64, role: impl Into<String>) -> Self {
        Self {
            member_type,
            reference,
            role: role.into(),
        }
    }
}

/// An ordered list of members with roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    info: ElementInfo,
    members: Vec<Member>,
    #[serde(default)]
    tags: Tags,
}

impl Relation {
    /// Create a relation without tags.
    #[must_use]
    pub fn new(info: ElementInfo, members: Vec<Member>) -> Self {
        Self {
            info,
            members,
            tags: Tags::new(),
        }
    }

    /// Members in document order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        &self.members
    }

    /// Members of one kind, in document order.
    pub fn members_of(&self, member_type: MemberType) -> impl Iterator<Item = &Member> {
        self.members
            .iter()
            .filter(move |member| member.member_type == member_type)
    }
}

element_accessors!(Relation);
