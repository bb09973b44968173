//! Configuration for workstreams-core.
//!
//! Currently constants-only: the clustering pipeline is parameterized by
//! [`crate::clustering::ClusteringParams`] derived from corpus size, and the
//! remaining tunables are compile-time constants in [`constants`].

pub mod constants;
