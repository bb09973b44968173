//! Density-based clustering over achievement embeddings.
//!
//! # Architecture
//!
//! The pipeline runs bottom-up through this module:
//!
//! 1. [`cosine_distance`] / [`centroid`]: vector primitives for the whole
//!    crate
//! 2. [`estimate_epsilon`]: data-driven neighborhood radius from the
//!    k-distance distribution
//! 3. [`DensityClusterer`]: multi-attempt density scan that refines the
//!    radius until the partition is balanced, then filters undersized
//!    clusters
//! 4. [`decide`]: full-versus-incremental policy from corpus growth and
//!    staleness
//! 5. [`propose_assignments`]: incremental nearest-centroid matching for
//!    new items between full runs
//!
//! Everything here is pure computation over in-memory slices. Persistence
//! and orchestration live in [`crate::service`].

mod assign;
mod dbscan;
mod distance;
mod engine;
mod epsilon;
mod params;
mod policy;

pub use assign::{propose_assignments, AssignmentPlan, AssignmentProposal};
pub use dbscan::NOISE;
pub use distance::{centroid, cosine_distance};
pub use engine::{ClusterRun, DensityClusterer};
pub use epsilon::estimate_epsilon;
pub use params::{clustering_defaults, ClusteringParams};
pub use policy::{decide, ReclusterDecision, ReclusterStrategy};
