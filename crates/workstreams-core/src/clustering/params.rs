//! Clustering parameters derived from corpus size.
//!
//! Parameters are never user-supplied: callers hand the pipeline a corpus
//! and the profile is chosen from its size. Two profiles exist, split at
//! [`corpus::SMALL_CORPUS_LIMIT`] items; they differ only in the outlier
//! threshold, which loosens slightly for dense corpora.

use serde::{Deserialize, Serialize};

use crate::config::constants::corpus;
use crate::error::{WorkstreamError, WorkstreamResult};

/// Parameters for a density clustering run.
///
/// # Example
///
/// ```
/// use workstreams_core::clustering::{ClusteringParams, clustering_defaults};
///
/// // Use defaults
/// let params = clustering_defaults();
/// assert_eq!(params.min_pts, 3);
///
/// // Or derive from corpus size
/// let params = ClusteringParams::for_corpus_size(250);
/// assert_eq!(params.outlier_threshold, 0.65);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusteringParams {
    /// Neighborhood size: a core point needs at least this many points
    /// (itself included) within epsilon.
    pub min_pts: usize,

    /// Minimum members for a cluster to survive size filtering.
    pub min_cluster_size: usize,

    /// Incremental-assignment strictness in [0, 1]. An item joins a
    /// workstream only when its centroid distance is under
    /// `1.0 - outlier_threshold`.
    pub outlier_threshold: f32,
}

impl Default for ClusteringParams {
    fn default() -> Self {
        Self {
            min_pts: corpus::MIN_PTS,
            min_cluster_size: corpus::MIN_CLUSTER_SIZE,
            outlier_threshold: corpus::SMALL_CORPUS_OUTLIER_THRESHOLD,
        }
    }
}

impl ClusteringParams {
    /// Select the parameter profile for a corpus of `n_items` embedded items.
    ///
    /// Corpora below [`corpus::SMALL_CORPUS_LIMIT`] use the strict outlier
    /// threshold; larger corpora loosen it, everything else is shared.
    pub fn for_corpus_size(n_items: usize) -> Self {
        let outlier_threshold = if n_items < corpus::SMALL_CORPUS_LIMIT {
            corpus::SMALL_CORPUS_OUTLIER_THRESHOLD
        } else {
            corpus::LARGE_CORPUS_OUTLIER_THRESHOLD
        };

        Self {
            min_pts: corpus::MIN_PTS,
            min_cluster_size: corpus::MIN_CLUSTER_SIZE,
            outlier_threshold,
        }
    }

    /// Set the neighborhood size.
    ///
    /// Value is NOT automatically clamped - use validate() to check.
    #[must_use]
    pub fn with_min_pts(mut self, min_pts: usize) -> Self {
        self.min_pts = min_pts;
        self
    }

    /// Set the minimum surviving cluster size.
    ///
    /// Value is NOT automatically clamped - use validate() to check.
    #[must_use]
    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    /// Set the outlier threshold.
    ///
    /// Value is NOT automatically clamped - use validate() to check.
    #[must_use]
    pub fn with_outlier_threshold(mut self, threshold: f32) -> Self {
        self.outlier_threshold = threshold;
        self
    }

    /// Validate parameters.
    ///
    /// Fails fast with descriptive error messages.
    ///
    /// # Errors
    ///
    /// Returns `WorkstreamError::InvalidParameter` if:
    /// - min_pts < 2
    /// - min_cluster_size < 2
    /// - outlier_threshold outside [0, 1] or not finite
    pub fn validate(&self) -> WorkstreamResult<()> {
        if self.min_pts < 2 {
            return Err(WorkstreamError::invalid_parameter(format!(
                "min_pts must be >= 2, got {}. A density neighborhood of one point is meaningless.",
                self.min_pts
            )));
        }

        if self.min_cluster_size < 2 {
            return Err(WorkstreamError::invalid_parameter(format!(
                "min_cluster_size must be >= 2, got {}. A cluster needs at least 2 members.",
                self.min_cluster_size
            )));
        }

        if !self.outlier_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.outlier_threshold)
        {
            return Err(WorkstreamError::invalid_parameter(format!(
                "outlier_threshold must be in [0, 1], got {}",
                self.outlier_threshold
            )));
        }

        Ok(())
    }

    /// Acceptance radius for incremental assignment.
    ///
    /// Items join a workstream when their centroid distance is strictly
    /// under this value.
    #[inline]
    pub fn acceptance_radius(&self) -> f32 {
        1.0 - self.outlier_threshold
    }
}

/// Get default clustering parameters (the small-corpus profile).
pub fn clustering_defaults() -> ClusteringParams {
    ClusteringParams::default()
}
