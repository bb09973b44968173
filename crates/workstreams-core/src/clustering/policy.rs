//! Full-versus-incremental reclustering policy.
//!
//! Full reclustering is expensive and disruptive (workstreams are archived
//! and rebuilt), so triggers go through this policy first. The decision is
//! a pure function of corpus size, the last run's metadata, and the clock;
//! callers inject `now` so the policy stays deterministic under test.
//!
//! Checks run in a fixed order and the first hit wins:
//!
//! 1. No metadata: the corpus has never been clustered, run full
//! 2. Growth since the last run at or past 10% of the prior count: full
//! 3. Growth at or past the absolute threshold (50 items): full
//! 4. Last run older than 30 days: full
//! 5. Otherwise: incremental assignment into existing workstreams

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::constants::policy;
use crate::types::ClusteringMetadata;

/// How the next reclustering trigger should be served.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReclusterStrategy {
    /// Rebuild all workstreams from scratch.
    Full,
    /// Assign new items into existing workstreams, leave the rest alone.
    Incremental,
}

impl std::fmt::Display for ReclusterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReclusterStrategy::Full => write!(f, "full"),
            ReclusterStrategy::Incremental => write!(f, "incremental"),
        }
    }
}

/// A policy decision with its human-readable justification.
///
/// The reason string ends up in logs and run reports; tests match on its
/// stable prefixes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReclusterDecision {
    /// The chosen strategy
    pub strategy: ReclusterStrategy,
    /// Why this strategy was chosen
    pub reason: String,
}

impl ReclusterDecision {
    /// Whether this decision calls for a full rebuild.
    pub fn is_full(&self) -> bool {
        self.strategy == ReclusterStrategy::Full
    }

    fn full(reason: impl Into<String>) -> Self {
        Self {
            strategy: ReclusterStrategy::Full,
            reason: reason.into(),
        }
    }

    fn incremental(reason: impl Into<String>) -> Self {
        Self {
            strategy: ReclusterStrategy::Incremental,
            reason: reason.into(),
        }
    }
}

/// Decide how a reclustering trigger for a corpus should be served.
///
/// # Arguments
///
/// * `corpus_size` - Current number of embedded items in the corpus
/// * `metadata` - Last full run's record, if the corpus has one
/// * `now` - Decision time, injected for determinism
pub fn decide(
    corpus_size: usize,
    metadata: Option<&ClusteringMetadata>,
    now: DateTime<Utc>,
) -> ReclusterDecision {
    let meta = match metadata {
        Some(meta) => meta,
        None => return ReclusterDecision::full("initial clustering"),
    };

    let prior = meta.item_count;
    let growth = meta.items_added_since(corpus_size);

    if growth > 0 && growth as f64 >= prior as f64 * policy::GROWTH_RATIO {
        return ReclusterDecision::full(format!(
            "corpus grew by {} items since last run ({}% of prior {})",
            growth,
            (growth as f64 * 100.0 / prior.max(1) as f64).round() as u64,
            prior,
        ));
    }

    if growth >= policy::GROWTH_ABSOLUTE {
        return ReclusterDecision::full(format!(
            "{} new items since last run reaches the absolute threshold of {}",
            growth,
            policy::GROWTH_ABSOLUTE,
        ));
    }

    let age_days = meta.age_days(now);
    if age_days > policy::MAX_AGE_DAYS {
        return ReclusterDecision::full(format!(
            "last full run was {} days ago, past the {} day limit",
            age_days,
            policy::MAX_AGE_DAYS,
        ));
    }

    ReclusterDecision::incremental(format!(
        "corpus stable: {} new items, last full run {} days ago",
        growth, age_days,
    ))
}
