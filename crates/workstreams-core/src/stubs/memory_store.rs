//! In-memory stub implementation of [`CorpusStore`].
//!
//! # ⚠️ TEST ONLY - DO NOT USE IN PRODUCTION ⚠️
//!
//! `InMemoryCorpusStore` is a thread-safe in-memory store for unit and
//! integration tests. Every query is a full table scan and nothing survives
//! drop. Production deployments wire the service to a database-backed
//! implementation of the same trait.
//!
//! Reads return items and workstreams in creation order so tests see
//! stable cluster numbering run to run.

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::error::WorkstreamResult;
use crate::traits::CorpusStore;
use crate::types::{AssignmentSource, ClusteringMetadata, EmbeddedAchievement, Workstream};

/// In-memory implementation of [`CorpusStore`].
///
/// # ⚠️ TEST ONLY ⚠️
///
/// O(n) scans, no persistence. Thread-safe via `DashMap`, so it can sit
/// behind an `Arc` in concurrent service tests.
#[derive(Debug, Default)]
pub struct InMemoryCorpusStore {
    /// Achievement storage keyed by item id
    items: DashMap<Uuid, EmbeddedAchievement>,

    /// Workstream storage keyed by workstream id
    workstreams: DashMap<Uuid, Workstream>,

    /// One metadata snapshot per corpus
    metadata: DashMap<Uuid, ClusteringMetadata>,
}

impl InMemoryCorpusStore {
    /// Create a new empty in-memory store.
    ///
    /// # Warning
    ///
    /// For **testing only**: O(n) scans, no persistence.
    pub fn new() -> Self {
        info!("Creating InMemoryCorpusStore (TEST ONLY - O(n) scans, no persistence)");
        Self::default()
    }

    /// Seed one achievement.
    pub fn insert_item(&self, item: EmbeddedAchievement) {
        self.items.insert(item.id, item);
    }

    /// Seed a batch of achievements.
    pub fn insert_items(&self, items: impl IntoIterator<Item = EmbeddedAchievement>) {
        for item in items {
            self.insert_item(item);
        }
    }

    /// Every workstream of a corpus, archived ones included.
    pub fn all_workstreams(&self, corpus_id: Uuid) -> Vec<Workstream> {
        let mut all: Vec<Workstream> = self
            .workstreams
            .iter()
            .filter(|entry| entry.corpus_id == corpus_id)
            .map(|entry| entry.clone())
            .collect();
        sort_workstreams(&mut all);
        all
    }
}

fn sort_items(items: &mut [EmbeddedAchievement]) {
    items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

fn sort_workstreams(workstreams: &mut [Workstream]) {
    workstreams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl CorpusStore for InMemoryCorpusStore {
    async fn items_for_corpus(&self, corpus_id: Uuid) -> WorkstreamResult<Vec<EmbeddedAchievement>> {
        let mut items: Vec<EmbeddedAchievement> = self
            .items
            .iter()
            .filter(|entry| entry.corpus_id == corpus_id)
            .map(|entry| entry.clone())
            .collect();
        sort_items(&mut items);
        Ok(items)
    }

    async fn items_for_workstream(
        &self,
        workstream_id: Uuid,
    ) -> WorkstreamResult<Vec<EmbeddedAchievement>> {
        let mut items: Vec<EmbeddedAchievement> = self
            .items
            .iter()
            .filter(|entry| entry.workstream_id == Some(workstream_id))
            .map(|entry| entry.clone())
            .collect();
        sort_items(&mut items);
        Ok(items)
    }

    async fn get_item(&self, id: Uuid) -> WorkstreamResult<Option<EmbeddedAchievement>> {
        Ok(self.items.get(&id).map(|entry| entry.clone()))
    }

    async fn assign_item(
        &self,
        item_id: Uuid,
        workstream_id: Uuid,
        source: AssignmentSource,
    ) -> WorkstreamResult<bool> {
        match self.items.get_mut(&item_id) {
            Some(mut entry) => {
                entry.assign(workstream_id, source);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_ai_assignments(&self, corpus_id: Uuid) -> WorkstreamResult<usize> {
        let mut cleared = 0;
        for mut entry in self.items.iter_mut() {
            if entry.corpus_id == corpus_id
                && entry.assignment_source == Some(AssignmentSource::Ai)
            {
                entry.clear_assignment();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn active_workstreams(&self, corpus_id: Uuid) -> WorkstreamResult<Vec<Workstream>> {
        let mut active: Vec<Workstream> = self
            .workstreams
            .iter()
            .filter(|entry| entry.corpus_id == corpus_id && entry.is_active())
            .map(|entry| entry.clone())
            .collect();
        sort_workstreams(&mut active);
        Ok(active)
    }

    async fn get_workstream(&self, id: Uuid) -> WorkstreamResult<Option<Workstream>> {
        Ok(self.workstreams.get(&id).map(|entry| entry.clone()))
    }

    async fn upsert_workstream(&self, workstream: Workstream) -> WorkstreamResult<()> {
        self.workstreams.insert(workstream.id, workstream);
        Ok(())
    }

    async fn archive_workstream(&self, id: Uuid) -> WorkstreamResult<bool> {
        match self.workstreams.get_mut(&id) {
            Some(mut entry) => {
                entry.archive();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_metadata(&self, corpus_id: Uuid) -> WorkstreamResult<Option<ClusteringMetadata>> {
        Ok(self.metadata.get(&corpus_id).map(|entry| entry.clone()))
    }

    async fn put_metadata(&self, metadata: ClusteringMetadata) -> WorkstreamResult<()> {
        self.metadata.insert(metadata.corpus_id, metadata);
        Ok(())
    }
}
