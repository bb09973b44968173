//! NamingProvider trait: generated names and descriptions for workstreams.
//!
//! After a full run produces anonymous clusters, each one is handed a small
//! sample of member achievements and asked for a human-readable label. The
//! production implementation calls a language model; tests and offline runs
//! use the stubs in [`crate::stubs`].
//!
//! Naming is best-effort. A provider failure for one cluster never fails
//! the run; the service falls back to a title-derived name and keeps going.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WorkstreamResult;
use crate::types::EmbeddedAchievement;

/// The slice of an achievement a naming provider gets to see.
///
/// Providers see titles and timestamps only; embeddings and ids stay
/// inside the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementSummary {
    /// The achievement's title
    pub title: String,
    /// When the achievement was recorded
    pub created_at: DateTime<Utc>,
}

impl From<&EmbeddedAchievement> for AchievementSummary {
    fn from(item: &EmbeddedAchievement) -> Self {
        Self {
            title: item.title.clone(),
            created_at: item.created_at,
        }
    }
}

/// A generated workstream label.
///
/// Length caps are enforced when the label is applied to a workstream
/// record, so providers may return whatever their model produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkstreamLabel {
    /// Short display name
    pub name: String,
    /// One-to-two sentence summary of the cluster's theme
    pub description: String,
}

/// Produces names and descriptions for clustered achievements.
#[async_trait]
pub trait NamingProvider: Send + Sync {
    /// Generate a label for a cluster from a sample of its members.
    ///
    /// # Arguments
    /// * `sample` - Up to the naming sample cap of representative members,
    ///   nearest to the cluster centroid first
    ///
    /// # Errors
    /// - `WorkstreamError::NamingProvider` - Provider unavailable or the
    ///   response was unusable; the caller substitutes a fallback label
    async fn name_workstream(
        &self,
        sample: &[AchievementSummary],
    ) -> WorkstreamResult<WorkstreamLabel>;
}
