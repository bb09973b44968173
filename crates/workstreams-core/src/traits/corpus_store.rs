//! CorpusStore trait: persistence boundary for clustering.
//!
//! Everything the clustering service reads or writes goes through this
//! trait: embedded achievements, workstream records, and the per-corpus
//! metadata snapshot left behind by each full run. Implementations own
//! their own consistency; the service serializes whole reclustering runs
//! per corpus above this layer.
//!
//! # Design Philosophy
//!
//! - Reads return owned values; the service mutates copies and writes back
//! - Assignment writes are item-granular so user assignments survive
//!   automated bulk clears
//! - Archiving is the only retirement path, records are never deleted
//! - Missing-row outcomes are `Ok(false)` or `Ok(None)`, not errors

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::WorkstreamResult;
use crate::types::{AssignmentSource, ClusteringMetadata, EmbeddedAchievement, Workstream};

/// Storage operations underneath the workstream service.
#[async_trait]
pub trait CorpusStore: Send + Sync {
    // ==================== Achievements ====================

    /// Fetch every embedded achievement in a corpus.
    ///
    /// Items without an embedding vector never appear here; upstream
    /// ingestion embeds before anything reaches clustering.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn items_for_corpus(&self, corpus_id: Uuid) -> WorkstreamResult<Vec<EmbeddedAchievement>>;

    /// Fetch the current members of one workstream.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn items_for_workstream(
        &self,
        workstream_id: Uuid,
    ) -> WorkstreamResult<Vec<EmbeddedAchievement>>;

    /// Fetch one achievement by id.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn get_item(&self, id: Uuid) -> WorkstreamResult<Option<EmbeddedAchievement>>;

    /// Point an item at a workstream, recording who made the assignment.
    ///
    /// # Returns
    /// `true` if the item existed and was updated, `false` if unknown.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn assign_item(
        &self,
        item_id: Uuid,
        workstream_id: Uuid,
        source: AssignmentSource,
    ) -> WorkstreamResult<bool>;

    /// Clear every AI-sourced assignment in a corpus.
    ///
    /// User-sourced assignments are left untouched; this is the guarantee
    /// that makes full reclustering safe to run over curated corpora.
    ///
    /// # Returns
    /// The number of assignments cleared.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn clear_ai_assignments(&self, corpus_id: Uuid) -> WorkstreamResult<usize>;

    // ==================== Workstreams ====================

    /// Fetch the active (non-archived) workstreams of a corpus.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn active_workstreams(&self, corpus_id: Uuid) -> WorkstreamResult<Vec<Workstream>>;

    /// Fetch one workstream by id, archived or not.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn get_workstream(&self, id: Uuid) -> WorkstreamResult<Option<Workstream>>;

    /// Insert a workstream, or replace the stored record wholesale if the
    /// id already exists.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn upsert_workstream(&self, workstream: Workstream) -> WorkstreamResult<()>;

    /// Soft-retire a workstream.
    ///
    /// # Returns
    /// `true` if the workstream existed, `false` if unknown.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn archive_workstream(&self, id: Uuid) -> WorkstreamResult<bool>;

    // ==================== Run Metadata ====================

    /// Fetch the last full run's metadata for a corpus, if any.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn get_metadata(&self, corpus_id: Uuid) -> WorkstreamResult<Option<ClusteringMetadata>>;

    /// Overwrite the metadata snapshot for a corpus.
    ///
    /// Each corpus keeps exactly one snapshot, the one describing the most
    /// recent full run.
    ///
    /// # Errors
    /// - `WorkstreamError::Store` - Backend failure
    async fn put_metadata(&self, metadata: ClusteringMetadata) -> WorkstreamResult<()>;
}

/// Convenience queries derivable from the base trait.
///
/// Implementations may override these with backend-native queries.
#[async_trait]
pub trait CorpusStoreExt: CorpusStore {
    /// Number of embedded achievements in a corpus.
    async fn corpus_size(&self, corpus_id: Uuid) -> WorkstreamResult<usize> {
        Ok(self.items_for_corpus(corpus_id).await?.len())
    }

    /// Items in a corpus with no workstream assignment.
    async fn unassigned_items(
        &self,
        corpus_id: Uuid,
    ) -> WorkstreamResult<Vec<EmbeddedAchievement>> {
        let items = self.items_for_corpus(corpus_id).await?;
        Ok(items.into_iter().filter(|i| !i.is_assigned()).collect())
    }
}

impl<T: CorpusStore + ?Sized> CorpusStoreExt for T {}
