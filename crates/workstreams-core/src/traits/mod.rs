//! Trait contracts between the clustering service and its dependencies.
//!
//! # Traits
//!
//! - [`CorpusStore`]: persistence for achievements, workstreams, and run
//!   metadata
//! - [`NamingProvider`]: generated labels for freshly clustered workstreams
//! - [`EmbeddingProvider`]: text-to-vector contract shared with ingestion
//!
//! In-memory implementations of all three live in [`crate::stubs`].

mod corpus_store;
mod embedding_provider;
mod naming_provider;

pub use corpus_store::{CorpusStore, CorpusStoreExt};
pub use embedding_provider::EmbeddingProvider;
pub use naming_provider::{AchievementSummary, NamingProvider, WorkstreamLabel};
