//! Domain types for achievement clustering.
//!
//! - [`EmbeddedAchievement`]: the clustering unit, an achievement with its
//!   embedding vector and assignment provenance
//! - [`Workstream`]: a named cluster with centroid and soft-archive flag
//! - [`ClusteringMetadata`]: per-corpus snapshot of the last full run

mod achievement;
mod metadata;
mod workstream;

pub use achievement::{AssignmentSource, EmbeddedAchievement};
pub use metadata::ClusteringMetadata;
pub use workstream::Workstream;
