//! Per-corpus clustering run metadata.
//!
//! One record per corpus, overwritten after every full clustering run. The
//! reclustering policy reads it to decide whether the next trigger warrants
//! another full run or just incremental assignment; absence of a record
//! means the corpus has never been clustered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Snapshot of the most recent full clustering run for a corpus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusteringMetadata {
    /// Corpus the run covered
    pub corpus_id: Uuid,

    /// When the run completed
    pub clustered_at: DateTime<Utc>,

    /// Number of embedded items in the corpus at run time
    pub item_count: usize,

    /// Scan radius the chosen attempt used (includes the boundary buffer)
    pub epsilon: f32,

    /// Neighborhood size the run used
    pub min_pts: usize,

    /// Number of workstreams the run produced
    pub cluster_count: usize,

    /// Number of items left unassigned by the run
    pub outlier_count: usize,
}

impl ClusteringMetadata {
    /// Items added to the corpus since this run, saturating at zero.
    ///
    /// Deletions can make the current count smaller than the recorded one;
    /// shrinkage is not growth, so it reads as zero.
    pub fn items_added_since(&self, current_item_count: usize) -> usize {
        current_item_count.saturating_sub(self.item_count)
    }

    /// Whole days elapsed since this run at `now`.
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        now.signed_duration_since(self.clustered_at).num_days()
    }
}
