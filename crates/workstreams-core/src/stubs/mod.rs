//! In-memory stub implementations of the crate's traits.
//!
//! # ⚠️ TEST ONLY - DO NOT USE IN PRODUCTION ⚠️
//!
//! - [`InMemoryCorpusStore`]: DashMap-backed [`CorpusStore`](crate::traits::CorpusStore)
//! - [`StubNamingProvider`] / [`FailingNamingProvider`] /
//!   [`RecordingNamingProvider`]: scripted
//!   [`NamingProvider`](crate::traits::NamingProvider)s
//! - [`StubEmbeddingProvider`]: hash-seeded deterministic
//!   [`EmbeddingProvider`](crate::traits::EmbeddingProvider)

mod embedding;
mod memory_store;
mod naming;

pub use embedding::{StubEmbeddingProvider, STUB_EMBEDDING_DIMENSIONS};
pub use memory_store::InMemoryCorpusStore;
pub use naming::{FailingNamingProvider, RecordingNamingProvider, StubNamingProvider};
