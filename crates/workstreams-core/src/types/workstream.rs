//! Workstream records: named clusters of related achievements.
//!
//! A workstream is the durable output of clustering. It carries a provider-
//! or fallback-generated name, a centroid summarizing its members in
//! embedding space, and a soft `archived` flag. Archiving is the only way a
//! workstream ever leaves the active set; records are never deleted, so
//! history and manual re-activation stay possible.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::constants::naming;

/// A named cluster of achievements with its embedding-space centroid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Workstream {
    /// Unique workstream identifier
    pub id: Uuid,

    /// Corpus this workstream belongs to
    pub corpus_id: Uuid,

    /// Display name, at most [`naming::MAX_NAME_LEN`] characters
    pub name: String,

    /// Longer summary, at most [`naming::MAX_DESCRIPTION_LEN`] characters
    pub description: String,

    /// Mean of member embeddings; `None` until first computed
    pub centroid: Option<Vec<f32>>,

    /// Cached member count, maintained by assignment writes
    pub member_count: usize,

    /// Soft-retirement flag; archived workstreams are never matched against
    pub archived: bool,

    /// When the workstream was created
    pub created_at: DateTime<Utc>,

    /// When the centroid was last recomputed; `None` until first computed
    pub centroid_updated_at: Option<DateTime<Utc>>,
}

impl Workstream {
    /// Create an active workstream with no centroid yet.
    ///
    /// Name and description are truncated to their caps on the way in, so a
    /// record can never be constructed over-length.
    pub fn new(corpus_id: Uuid, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            corpus_id,
            name: truncate_chars(name.into(), naming::MAX_NAME_LEN),
            description: truncate_chars(description.into(), naming::MAX_DESCRIPTION_LEN),
            centroid: None,
            member_count: 0,
            archived: false,
            created_at: Utc::now(),
            centroid_updated_at: None,
        }
    }

    /// Whether this workstream participates in matching and maintenance.
    pub fn is_active(&self) -> bool {
        !self.archived
    }

    /// Soft-retire this workstream.
    pub fn archive(&mut self) {
        self.archived = true;
    }

    /// Replace the centroid and stamp the update time.
    pub fn set_centroid(&mut self, centroid: Vec<f32>, now: DateTime<Utc>) {
        self.centroid = Some(centroid);
        self.centroid_updated_at = Some(now);
    }
}

/// Truncate to at most `max` characters, respecting char boundaries.
fn truncate_chars(s: String, max: usize) -> String {
    if s.chars().count() <= max {
        s
    } else {
        s.chars().take(max).collect()
    }
}
