//! Embedded achievement items, the clustering unit of the corpus.
//!
//! An achievement is a short description of completed work ("Shipped the
//! billing migration", "Fixed the retry storm in ingest") that has already
//! been embedded into a dense vector by an upstream
//! [`EmbeddingProvider`](crate::traits::EmbeddingProvider). Clustering only
//! ever sees items that carry a vector; un-embedded items are invisible to
//! this crate.
//!
//! # Assignment provenance
//!
//! Every workstream assignment records who made it. Automated runs write
//! [`AssignmentSource::Ai`]; manual moves by a person write
//! [`AssignmentSource::User`]. Full reclustering clears and rewrites only
//! AI-sourced assignments, so user curation survives every automated pass.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a workstream assignment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentSource {
    /// Written by an automated clustering or assignment pass.
    Ai,
    /// Written by a person; never overwritten by automated passes.
    User,
}

impl std::fmt::Display for AssignmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentSource::Ai => write!(f, "ai"),
            AssignmentSource::User => write!(f, "user"),
        }
    }
}

/// An achievement with its embedding vector and current assignment state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddedAchievement {
    /// Unique achievement identifier
    pub id: Uuid,

    /// Corpus this achievement belongs to
    pub corpus_id: Uuid,

    /// Short human-readable title; feeds the naming path
    pub title: String,

    /// Dense embedding vector attached by the embedding pipeline
    pub embedding: Vec<f32>,

    /// Current workstream assignment, if any
    pub workstream_id: Option<Uuid>,

    /// Provenance of the current assignment; `None` when unassigned
    pub assignment_source: Option<AssignmentSource>,

    /// When the achievement was recorded
    pub created_at: DateTime<Utc>,
}

impl EmbeddedAchievement {
    /// Create an unassigned achievement with a fresh id.
    pub fn new(corpus_id: Uuid, title: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            corpus_id,
            title: title.into(),
            embedding,
            workstream_id: None,
            assignment_source: None,
            created_at: Utc::now(),
        }
    }

    /// Whether the achievement currently belongs to a workstream.
    pub fn is_assigned(&self) -> bool {
        self.workstream_id.is_some()
    }

    /// Whether the current assignment was made by a person.
    ///
    /// User assignments are immune to automated clearing.
    pub fn is_user_assigned(&self) -> bool {
        matches!(self.assignment_source, Some(AssignmentSource::User))
    }

    /// Record an assignment to `workstream_id` with the given provenance.
    pub fn assign(&mut self, workstream_id: Uuid, source: AssignmentSource) {
        self.workstream_id = Some(workstream_id);
        self.assignment_source = Some(source);
    }

    /// Drop the current assignment, leaving the achievement unassigned.
    pub fn clear_assignment(&mut self) {
        self.workstream_id = None;
        self.assignment_source = None;
    }
}
