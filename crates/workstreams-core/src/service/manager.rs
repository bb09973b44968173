//! WorkstreamManager: orchestration of clustering over a corpus.
//!
//! # Architecture
//!
//! The manager is the only writer of workstreams and assignments. Every
//! mutating entry point takes the per-corpus lock from
//! [`CorpusLocks`](super::locks::CorpusLocks), reads a snapshot through
//! [`CorpusStore`], runs the pure clustering code, and writes the results
//! back.
//!
//! # Full reclustering
//!
//! A full run rebuilds the corpus from scratch:
//!
//! 1. Refuse corpora under the minimum viable size
//! 2. Cluster all embedded items with [`DensityClusterer`]
//! 3. Compute a centroid and a representative naming sample per cluster
//! 4. Label every cluster concurrently; provider failures degrade that
//!    one cluster to a title-derived fallback name
//! 5. Archive the previous workstream generation and clear AI-sourced
//!    assignments; user-sourced assignments and their items are never
//!    touched
//! 6. Persist the new generation, its memberships, and a metadata
//!    snapshot for the next policy decision
//!
//! # Incremental assignment
//!
//! Between full runs, unassigned items are matched against active
//! centroids and accepted only within the acceptance radius. Workstreams
//! that gain members get their centroids recomputed immediately.

use std::sync::Arc;

use chrono::Utc;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::clustering::{
    centroid, decide, propose_assignments, ClusteringParams, DensityClusterer, ReclusterDecision,
    ReclusterStrategy,
};
use crate::config::constants::corpus;
use crate::error::{WorkstreamError, WorkstreamResult};
use crate::traits::{AchievementSummary, CorpusStore, NamingProvider};
use crate::types::{AssignmentSource, ClusteringMetadata, EmbeddedAchievement, Workstream};

use super::locks::CorpusLocks;
use super::naming::{representative_sample, resolve_label};

/// Outcome of a full reclustering run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullRunReport {
    /// Corpus the run covered
    pub corpus_id: Uuid,
    /// Workstreams created by this run, in cluster order
    pub workstream_ids: Vec<Uuid>,
    /// Items left outside every cluster
    pub outlier_count: usize,
    /// Scan radius the chosen attempt used
    pub epsilon: f32,
    /// Embedded items clustered
    pub item_count: usize,
    /// AI-sourced assignments cleared before rebuilding
    pub cleared_assignments: usize,
}

impl FullRunReport {
    /// Number of workstreams the run created.
    pub fn cluster_count(&self) -> usize {
        self.workstream_ids.len()
    }
}

/// Outcome of an incremental assignment pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncrementalReport {
    /// Corpus the pass covered
    pub corpus_id: Uuid,
    /// Items newly assigned to a workstream
    pub assigned: usize,
    /// Items that cleared no acceptance radius
    pub unassigned: usize,
    /// Workstreams that gained members and had centroids recomputed
    pub touched_workstreams: Vec<Uuid>,
}

/// What a policy-driven reclustering call did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ReclusterOutcome {
    /// A full rebuild ran
    Full(FullRunReport),
    /// An incremental pass ran
    Incremental(IncrementalReport),
}

/// A policy decision together with the work it triggered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReclusterReport {
    /// The decision that chose the strategy
    pub decision: ReclusterDecision,
    /// What actually happened
    pub outcome: ReclusterOutcome,
}

/// One labeled cluster staged for persistence.
struct ClusterDraft {
    members: Vec<EmbeddedAchievement>,
    centroid: Vec<f32>,
    sample: Vec<AchievementSummary>,
}

/// Orchestrates clustering, naming, and centroid maintenance for corpora.
pub struct WorkstreamManager {
    store: Arc<dyn CorpusStore>,
    naming: Arc<dyn NamingProvider>,
    locks: CorpusLocks,
}

impl WorkstreamManager {
    /// Create a manager over the given store and naming provider.
    pub fn new(store: Arc<dyn CorpusStore>, naming: Arc<dyn NamingProvider>) -> Self {
        Self {
            store,
            naming,
            locks: CorpusLocks::new(),
        }
    }

    /// Run the reclustering policy for a corpus and execute its choice.
    ///
    /// # Errors
    ///
    /// - [`WorkstreamError::InsufficientData`] - Policy chose a full run
    ///   but the corpus is under the minimum viable size
    /// - [`WorkstreamError::Store`] - Backend failure
    pub async fn decide_and_recluster(&self, corpus_id: Uuid) -> WorkstreamResult<ReclusterReport> {
        let lock = self.locks.for_corpus(corpus_id);
        let _guard = lock.lock().await;

        let items = self.store.items_for_corpus(corpus_id).await?;
        let metadata = self.store.get_metadata(corpus_id).await?;
        let decision = decide(items.len(), metadata.as_ref(), Utc::now());
        info!(
            corpus_id = %corpus_id,
            strategy = %decision.strategy,
            reason = %decision.reason,
            "Recluster decision"
        );

        let outcome = match decision.strategy {
            ReclusterStrategy::Full => {
                ReclusterOutcome::Full(self.recluster_full_locked(corpus_id, items).await?)
            }
            ReclusterStrategy::Incremental => {
                ReclusterOutcome::Incremental(self.apply_incremental_locked(corpus_id).await?)
            }
        };

        Ok(ReclusterReport { decision, outcome })
    }

    /// Force a full reclustering run, bypassing the policy.
    ///
    /// # Errors
    ///
    /// - [`WorkstreamError::InsufficientData`] - Fewer embedded items than
    ///   the minimum viable corpus size
    /// - [`WorkstreamError::Store`] - Backend failure
    pub async fn recluster_full(&self, corpus_id: Uuid) -> WorkstreamResult<FullRunReport> {
        let lock = self.locks.for_corpus(corpus_id);
        let _guard = lock.lock().await;

        let items = self.store.items_for_corpus(corpus_id).await?;
        self.recluster_full_locked(corpus_id, items).await
    }

    /// Force an incremental assignment pass, bypassing the policy.
    ///
    /// # Errors
    ///
    /// - [`WorkstreamError::Store`] - Backend failure
    pub async fn apply_incremental(&self, corpus_id: Uuid) -> WorkstreamResult<IncrementalReport> {
        let lock = self.locks.for_corpus(corpus_id);
        let _guard = lock.lock().await;

        self.apply_incremental_locked(corpus_id).await
    }

    /// Recompute one workstream's centroid from its current members.
    ///
    /// A workstream left with no members is archived instead.
    ///
    /// # Errors
    ///
    /// - [`WorkstreamError::InvalidParameter`] - Unknown workstream id
    /// - [`WorkstreamError::Store`] - Backend failure
    pub async fn update_centroid(&self, workstream_id: Uuid) -> WorkstreamResult<()> {
        let ws = self.require_workstream(workstream_id).await?;
        let lock = self.locks.for_corpus(ws.corpus_id);
        let _guard = lock.lock().await;

        self.update_centroid_locked(workstream_id).await
    }

    /// Move one achievement into another workstream on a user's behalf.
    ///
    /// The assignment is recorded as user-sourced, which shields it from
    /// every later automated pass. Both affected workstreams get their
    /// centroids recomputed. Validation runs against state read under the
    /// corpus lock.
    ///
    /// # Errors
    ///
    /// - [`WorkstreamError::InvalidParameter`] - Unknown item or
    ///   workstream, cross-corpus move, or an archived target
    /// - [`WorkstreamError::Store`] - Backend failure
    pub async fn reassign_item(
        &self,
        item_id: Uuid,
        target_workstream_id: Uuid,
    ) -> WorkstreamResult<()> {
        // Bootstrap read, only to learn which corpus lock to take.
        let corpus_id = self.require_item(item_id).await?.corpus_id;
        let lock = self.locks.for_corpus(corpus_id);
        let _guard = lock.lock().await;

        // Re-read both sides under the lock; pre-lock snapshots can go
        // stale against a concurrent run over the same corpus.
        let item = self.require_item(item_id).await?;
        let target = self.require_workstream(target_workstream_id).await?;
        if target.corpus_id != item.corpus_id {
            return Err(WorkstreamError::invalid_parameter(
                "achievement and target workstream belong to different corpora",
            ));
        }
        if !target.is_active() {
            return Err(WorkstreamError::invalid_parameter(
                "cannot reassign into an archived workstream",
            ));
        }

        let previous = item.workstream_id;
        self.store
            .assign_item(item_id, target_workstream_id, AssignmentSource::User)
            .await?;

        if let Some(previous_id) = previous {
            if previous_id != target_workstream_id {
                self.update_centroid_locked(previous_id).await?;
            }
        }
        self.update_centroid_locked(target_workstream_id).await?;

        info!(
            item_id = %item_id,
            from = ?previous,
            to = %target_workstream_id,
            "Achievement reassigned by user"
        );
        Ok(())
    }

    // ==================== Internals (corpus lock held) ====================

    async fn recluster_full_locked(
        &self,
        corpus_id: Uuid,
        items: Vec<EmbeddedAchievement>,
    ) -> WorkstreamResult<FullRunReport> {
        let item_count = items.len();
        if item_count < corpus::MIN_ITEMS_FOR_CLUSTERING {
            return Err(WorkstreamError::insufficient_data(
                corpus::MIN_ITEMS_FOR_CLUSTERING,
                item_count,
            ));
        }

        let params = ClusteringParams::for_corpus_size(item_count);
        let embeddings: Vec<Vec<f32>> = items.iter().map(|item| item.embedding.clone()).collect();
        let run = DensityClusterer::new(params).fit(&embeddings)?;

        // Stage every cluster before touching storage. User-assigned items
        // are spoken for and take no part in the new generation.
        let mut drafts: Vec<ClusterDraft> = Vec::with_capacity(run.cluster_count());
        for cluster in &run.clusters {
            let members: Vec<EmbeddedAchievement> = cluster
                .iter()
                .map(|&idx| items[idx].clone())
                .filter(|item| !item.is_user_assigned())
                .collect();
            if members.is_empty() {
                continue;
            }
            let member_vectors: Vec<Vec<f32>> =
                members.iter().map(|m| m.embedding.clone()).collect();
            let cluster_centroid = centroid(&member_vectors)?;
            let sample = representative_sample(&members, &cluster_centroid)?;
            drafts.push(ClusterDraft {
                members,
                centroid: cluster_centroid,
                sample,
            });
        }

        // All clusters are labeled concurrently; resolve_label absorbs
        // provider failures, so the run itself cannot fail here.
        let labels = join_all(drafts.iter().map(|draft| {
            resolve_label(self.naming.as_ref(), &draft.sample, draft.members.len())
        }))
        .await;

        let previous = self.store.active_workstreams(corpus_id).await?;
        for ws in &previous {
            self.store.archive_workstream(ws.id).await?;
        }
        let cleared = self.store.clear_ai_assignments(corpus_id).await?;

        let now = Utc::now();
        let mut workstream_ids = Vec::with_capacity(drafts.len());
        for (draft, label) in drafts.into_iter().zip(labels) {
            let mut ws = Workstream::new(corpus_id, label.name, label.description);
            ws.set_centroid(draft.centroid, now);
            ws.member_count = draft.members.len();
            let ws_id = ws.id;
            self.store.upsert_workstream(ws).await?;
            for member in &draft.members {
                self.store
                    .assign_item(member.id, ws_id, AssignmentSource::Ai)
                    .await?;
            }
            workstream_ids.push(ws_id);
        }

        let metadata = ClusteringMetadata {
            corpus_id,
            clustered_at: now,
            item_count,
            epsilon: run.epsilon,
            min_pts: params.min_pts,
            cluster_count: workstream_ids.len(),
            outlier_count: run.outlier_count,
        };
        self.store.put_metadata(metadata).await?;

        info!(
            corpus_id = %corpus_id,
            items = item_count,
            workstreams = workstream_ids.len(),
            outliers = run.outlier_count,
            archived = previous.len(),
            cleared_assignments = cleared,
            epsilon = %format!("{:.4}", run.epsilon),
            "Full reclustering run complete"
        );

        Ok(FullRunReport {
            corpus_id,
            workstream_ids,
            outlier_count: run.outlier_count,
            epsilon: run.epsilon,
            item_count,
            cleared_assignments: cleared,
        })
    }

    async fn apply_incremental_locked(
        &self,
        corpus_id: Uuid,
    ) -> WorkstreamResult<IncrementalReport> {
        let items = self.store.items_for_corpus(corpus_id).await?;
        let unassigned: Vec<EmbeddedAchievement> =
            items.iter().filter(|item| !item.is_assigned()).cloned().collect();
        let active = self.store.active_workstreams(corpus_id).await?;

        let params = ClusteringParams::for_corpus_size(items.len());
        let plan = propose_assignments(&unassigned, &active, &params)?;

        for proposal in &plan.assignments {
            self.store
                .assign_item(proposal.item_id, proposal.workstream_id, AssignmentSource::Ai)
                .await?;
        }

        let touched = plan.touched_workstreams();
        for &ws_id in &touched {
            self.update_centroid_locked(ws_id).await?;
        }

        info!(
            corpus_id = %corpus_id,
            candidates = unassigned.len(),
            assigned = plan.assigned_count(),
            unassigned = plan.unassigned.len(),
            touched = touched.len(),
            "Incremental assignment pass complete"
        );

        Ok(IncrementalReport {
            corpus_id,
            assigned: plan.assigned_count(),
            unassigned: plan.unassigned.len(),
            touched_workstreams: touched,
        })
    }

    async fn update_centroid_locked(&self, workstream_id: Uuid) -> WorkstreamResult<()> {
        let mut ws = self.require_workstream(workstream_id).await?;
        let members = self.store.items_for_workstream(workstream_id).await?;

        if members.is_empty() {
            self.store.archive_workstream(workstream_id).await?;
            info!(
                workstream_id = %workstream_id,
                "Workstream emptied out, archived"
            );
            return Ok(());
        }

        let member_vectors: Vec<Vec<f32>> = members.iter().map(|m| m.embedding.clone()).collect();
        let new_centroid = centroid(&member_vectors)?;
        ws.set_centroid(new_centroid, Utc::now());
        ws.member_count = members.len();
        self.store.upsert_workstream(ws).await?;
        Ok(())
    }

    async fn require_workstream(&self, id: Uuid) -> WorkstreamResult<Workstream> {
        self.store.get_workstream(id).await?.ok_or_else(|| {
            WorkstreamError::invalid_parameter(format!("unknown workstream {id}"))
        })
    }

    async fn require_item(&self, id: Uuid) -> WorkstreamResult<EmbeddedAchievement> {
        self.store.get_item(id).await?.ok_or_else(|| {
            WorkstreamError::invalid_parameter(format!("unknown achievement {id}"))
        })
    }
}
