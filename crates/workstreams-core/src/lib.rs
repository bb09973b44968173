//! Workstreams Core Library
//!
//! Groups embedded achievement items into named, durable workstreams using
//! density-based clustering over cosine distance.
//!
//! # Architecture
//!
//! This crate defines:
//! - Domain types (`EmbeddedAchievement`, `Workstream`, `ClusteringMetadata`)
//! - Pure clustering: distance primitives, data-driven epsilon estimation,
//!   a multi-attempt density clusterer, the full-versus-incremental policy,
//!   and nearest-centroid incremental assignment
//! - Core traits (`CorpusStore`, `NamingProvider`, `EmbeddingProvider`)
//! - The `WorkstreamManager` service orchestrating runs, naming, and
//!   centroid maintenance, serialized per corpus
//! - In-memory stubs for all three traits, for tests and offline runs
//!
//! # Example
//!
//! ```
//! use workstreams_core::clustering::{ClusteringParams, DensityClusterer};
//!
//! let params = ClusteringParams::for_corpus_size(40);
//! let clusterer = DensityClusterer::new(params);
//!
//! let embeddings = vec![vec![1.0_f32, 0.0]; 25];
//! let run = clusterer.fit(&embeddings).unwrap();
//! assert_eq!(run.labels.len(), 25);
//! ```

pub mod clustering;
pub mod config;
pub mod error;
pub mod service;
pub mod stubs;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use error::{WorkstreamError, WorkstreamResult};
pub use service::WorkstreamManager;
pub use types::{AssignmentSource, EmbeddedAchievement, Workstream};
