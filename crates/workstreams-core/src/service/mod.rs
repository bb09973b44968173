//! Orchestration: policy-driven runs, naming, and centroid maintenance.
//!
//! [`WorkstreamManager`] is the crate's write path. It composes the pure
//! clustering code under [`crate::clustering`] with a
//! [`CorpusStore`](crate::traits::CorpusStore) and a
//! [`NamingProvider`](crate::traits::NamingProvider), serializing all
//! mutation per corpus so concurrent triggers cannot tear a run apart.

mod locks;
mod manager;
mod naming;

#[cfg(test)]
mod tests;

pub use manager::{
    FullRunReport, IncrementalReport, ReclusterOutcome, ReclusterReport, WorkstreamManager,
};
