use super::Tags;
use crate::geometry::BoundingBox;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A group of edits made together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    id: u64,
    created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    closed_at: Option<DateTime<Utc>>,
    open: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bbox: Option<BoundingBox>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changes_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comments_count: Option<u64>,
    #[serde(default)]
    tags: Tags,
}

impl Changeset {
    /// Create an open changeset.
    #[must_use]
    pub fn new(id: u64, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at,
            closed_at: None,
            open: true,
            user: None,
            uid: None,
            bbox: None,
            changes_count: None,
            comments_count: None,
            tags: Tags::new(),
        }
    }

    /// Mark the changeset closed at the given time.
    #[must_use]
    pub fn with_closed_at(mut self, closed_at: DateTime<Utc>) -> Self {
        self.closed_at = Some(closed_at);
        self.open = false;
        self
    }

    /// Set the open flag as reported by the server.
    #[must_use]
    pub fn with_open(mut self, open: bool) -> Self {
        self.open = open;
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>, uid: Option<u64>) -> Self {
        self.user = Some(user.into());
        self.uid = uid;
        self
    }

    /// Set the bounding box of the edits.
    #[must_use]
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Set the change and comment counters.
    #[must_use]
    pub fn with_counts(mut self, changes: Option<u64>, comments: Option<u64>) -> Self {
        self.changes_count = changes;
        self.comments_count = comments;
        self
    }

    /// Replace the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    /// Changeset id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// When the changeset was opened.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the changeset was closed, if it is.
    #[must_use]
    pub fn closed_at(&self) -> Option<DateTime<Utc>> {
        self.closed_at
    }

    /// Whether the changeset still accepts edits.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Author display name.
    #[must_use]
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Author user id.
    #[must_use]
    pub fn uid(&self) -> Option<u64> {
        self.uid
    }

    /// Area touched by the edits. Empty changesets have none.
    #[must_use]
    pub fn bbox(&self) -> Option<&BoundingBox> {
        self.bbox.as_ref()
    }

    /// Number of edits, when the server reports it.
    #[must_use]
    pub fn changes_count(&self) -> Option<u64> {
        self.changes_count
    }

    /// Number of discussion comments, when the server reports it.
    #[must_use]
    pub fn comments_count(&self) -> Option<u64> {
        self.comments_count
    }

    /// Tags; `comment` usually carries the edit summary.
    #[must_use]
    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    /// The `comment` tag.
    #[must_use]
    pub fn comment(&self) -> Option<&str> {
        self.tags.get("comment")
    }
}
