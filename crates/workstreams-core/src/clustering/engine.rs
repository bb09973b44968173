//! Multi-attempt density clustering engine.
//!
//! Wraps the single-pass density scan with the machinery that makes it
//! usable on real achievement corpora:
//!
//! 1. Estimate the scan radius from the k-distance distribution, widened by
//!    a small buffer to offset the strict region test
//! 2. Scan up to [`refinement::MAX_ATTEMPTS`] times, tightening the radius
//!    each attempt, and score every attempt
//! 3. Keep the best-scoring attempt, stopping early once an attempt is
//!    balanced (no dominant cluster, enough clusters)
//! 4. Adaptively raise the minimum cluster size when the chosen attempt
//!    fragments into too many clusters
//! 5. Drop undersized clusters, demoting their members to outliers
//!
//! The score rewards attempts that land near the target cluster count and
//! coverage, and heavily penalizes a single cluster dominating the corpus.
//! One mega-cluster holding everything is the classic failure mode of
//! density scanning on text embeddings; the tightening rescans exist to
//! break it up.

use serde::{Deserialize, Serialize};

use crate::config::constants::{epsilon as eps_cfg, refinement};
use crate::error::{WorkstreamError, WorkstreamResult};

use super::dbscan::{dbscan_scan, NOISE};
use super::epsilon::estimate_epsilon;
use super::params::ClusteringParams;

/// Outcome of a clustering run.
///
/// `clusters` holds member indices into the input embedding slice; `labels`
/// is the parallel per-point view with [`NOISE`] marking outliers. The two
/// are always consistent: `labels[i] == c` exactly when
/// `clusters[c]` contains `i`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClusterRun {
    /// Member indices per surviving cluster
    pub clusters: Vec<Vec<usize>>,

    /// Per-point labels: cluster index or [`NOISE`]
    pub labels: Vec<i32>,

    /// Scan radius of the chosen attempt (buffer included)
    pub epsilon: f32,

    /// Number of points left unassigned
    pub outlier_count: usize,
}

impl ClusterRun {
    /// The empty run: no points, no clusters, zero epsilon.
    pub fn empty() -> Self {
        Self {
            clusters: Vec::new(),
            labels: Vec::new(),
            epsilon: 0.0,
            outlier_count: 0,
        }
    }

    /// Number of surviving clusters.
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Number of points assigned to some cluster.
    pub fn assigned_count(&self) -> usize {
        self.labels.len() - self.outlier_count
    }
}

/// One scored scan attempt.
struct AttemptOutcome {
    labels: Vec<i32>,
    epsilon: f32,
    cluster_count: usize,
    assigned: usize,
    largest: usize,
    score: f32,
}

impl AttemptOutcome {
    /// Score a raw scan against the target shape.
    ///
    /// Three penalty terms, all negative:
    /// - distance from the target cluster count
    /// - dominance of the largest cluster (largest / assigned)
    /// - distance from the target coverage (assigned / total)
    fn evaluate(labels: Vec<i32>, epsilon: f32, total_points: usize) -> Self {
        let mut sizes: Vec<usize> = Vec::new();
        for &label in &labels {
            if label == NOISE {
                continue;
            }
            let cid = label as usize;
            if cid >= sizes.len() {
                sizes.resize(cid + 1, 0);
            }
            sizes[cid] += 1;
        }

        let cluster_count = sizes.len();
        let assigned: usize = sizes.iter().sum();
        let largest = sizes.iter().copied().max().unwrap_or(0);

        let dominance = if assigned > 0 {
            largest as f32 / assigned as f32
        } else {
            0.0
        };
        let coverage = if total_points > 0 {
            assigned as f32 / total_points as f32
        } else {
            0.0
        };

        let score = -refinement::COUNT_WEIGHT
            * (cluster_count as f32 - refinement::TARGET_CLUSTER_COUNT).abs()
            - refinement::DOMINANCE_WEIGHT * dominance
            - refinement::COVERAGE_WEIGHT * (coverage - refinement::TARGET_COVERAGE).abs();

        Self {
            labels,
            epsilon,
            cluster_count,
            assigned,
            largest,
            score,
        }
    }

    /// Whether this attempt is already balanced enough to stop rescanning:
    /// no cluster holds half the assigned points, and the corpus split into
    /// a healthy number of clusters.
    fn is_balanced(&self) -> bool {
        (self.largest as f32) < refinement::EARLY_STOP_DOMINANCE * self.assigned as f32
            && self.cluster_count >= refinement::EARLY_STOP_MIN_CLUSTERS
    }
}

/// Density clusterer with radius estimation and rescan refinement.
///
/// # Example
///
/// ```
/// use workstreams_core::clustering::{ClusteringParams, DensityClusterer};
///
/// let clusterer = DensityClusterer::new(ClusteringParams::for_corpus_size(40));
/// let embeddings = vec![
///     vec![1.0, 0.0],
///     vec![0.99, 0.01],
///     vec![0.98, 0.02],
///     vec![0.0, 1.0],
///     vec![0.01, 0.99],
///     vec![0.02, 0.98],
/// ];
///
/// let run = clusterer.fit(&embeddings).unwrap();
/// assert_eq!(run.labels.len(), 6);
/// ```
pub struct DensityClusterer {
    params: ClusteringParams,
}

impl DensityClusterer {
    /// Create a clusterer with the given parameters.
    pub fn new(params: ClusteringParams) -> Self {
        Self { params }
    }

    /// Create a clusterer with default (small-corpus) parameters.
    pub fn with_defaults() -> Self {
        Self::new(ClusteringParams::default())
    }

    /// Cluster a corpus of embeddings.
    ///
    /// # Arguments
    ///
    /// * `embeddings` - Embedding vectors, all the same dimension
    ///
    /// # Returns
    ///
    /// A [`ClusterRun`] with surviving clusters, per-point labels, the
    /// chosen scan radius, and the outlier count. An empty corpus yields
    /// [`ClusterRun::empty`], not an error.
    ///
    /// # Errors
    ///
    /// - `WorkstreamError::DimensionMismatch` if embeddings differ in length
    /// - `WorkstreamError::InvalidParameter` if the parameters fail validation
    pub fn fit(&self, embeddings: &[Vec<f32>]) -> WorkstreamResult<ClusterRun> {
        let n = embeddings.len();
        if n == 0 {
            tracing::debug!("Empty corpus, returning empty run");
            return Ok(ClusterRun::empty());
        }

        self.params.validate()?;

        let dim = embeddings[0].len();
        for v in embeddings.iter() {
            if v.len() != dim {
                return Err(WorkstreamError::dimension_mismatch(dim, v.len()));
            }
        }

        let base_epsilon =
            estimate_epsilon(embeddings, self.params.min_pts) + eps_cfg::BOUNDARY_BUFFER;

        // Attempt 0 scans at the estimated radius; later attempts tighten it.
        let mut chosen = self.scan_attempt(embeddings, base_epsilon, 0);
        if !chosen.is_balanced() {
            for attempt in 1..refinement::MAX_ATTEMPTS {
                let outcome = self.scan_attempt(embeddings, base_epsilon, attempt);
                let balanced = outcome.is_balanced();
                if outcome.score > chosen.score {
                    chosen = outcome;
                }
                if balanced {
                    break;
                }
            }
        }

        let run = self.finalize(chosen, n);

        tracing::info!(
            points = n,
            clusters = run.cluster_count(),
            outliers = run.outlier_count,
            epsilon = %format!("{:.4}", run.epsilon),
            "Clustering run complete"
        );

        Ok(run)
    }

    /// Scan once at the attempt's tightened radius and score the outcome.
    fn scan_attempt(
        &self,
        embeddings: &[Vec<f32>],
        base_epsilon: f32,
        attempt: usize,
    ) -> AttemptOutcome {
        let scan_epsilon = base_epsilon * refinement::TIGHTEN_FACTOR.powi(attempt as i32);
        let labels = dbscan_scan(embeddings, scan_epsilon, self.params.min_pts);
        let outcome = AttemptOutcome::evaluate(labels, scan_epsilon, embeddings.len());

        tracing::debug!(
            attempt = attempt,
            epsilon = %format!("{:.4}", scan_epsilon),
            clusters = outcome.cluster_count,
            assigned = outcome.assigned,
            largest = outcome.largest,
            score = %format!("{:.2}", outcome.score),
            "Scan attempt evaluated"
        );

        outcome
    }

    /// Apply size filtering to the chosen attempt and build the final run.
    fn finalize(&self, chosen: AttemptOutcome, n: usize) -> ClusterRun {
        // Group member indices by raw cluster id (ids are contiguous).
        let mut raw_clusters: Vec<Vec<usize>> = Vec::new();
        for (idx, &label) in chosen.labels.iter().enumerate() {
            if label == NOISE {
                continue;
            }
            let cid = label as usize;
            if cid >= raw_clusters.len() {
                raw_clusters.resize_with(cid + 1, Vec::new);
            }
            raw_clusters[cid].push(idx);
        }

        // Heavily fragmented outcomes get a raised size floor so only the
        // largest clusters survive. Raising one step at a time drops whole
        // size ties together rather than picking arbitrary winners.
        let mut effective_min = self.params.min_cluster_size;
        if raw_clusters.len() > refinement::MAX_RAW_CLUSTERS {
            let target = (n / refinement::ITEMS_PER_TARGET_CLUSTER).clamp(
                refinement::ADAPTIVE_TARGET_MIN,
                refinement::ADAPTIVE_TARGET_MAX,
            );
            while raw_clusters
                .iter()
                .filter(|c| c.len() >= effective_min)
                .count()
                > target
            {
                effective_min += 1;
            }

            tracing::debug!(
                raw_clusters = raw_clusters.len(),
                target = target,
                effective_min = effective_min,
                "Adaptive size filter raised the minimum cluster size"
            );
        }

        let mut clusters: Vec<Vec<usize>> = Vec::new();
        let mut labels = vec![NOISE; n];
        for members in raw_clusters {
            if members.len() < effective_min {
                continue; // members fall back to outliers
            }
            let new_id = clusters.len() as i32;
            for &idx in &members {
                labels[idx] = new_id;
            }
            clusters.push(members);
        }

        let outlier_count = labels.iter().filter(|&&l| l == NOISE).count();
        let assigned = n - outlier_count;

        // Degenerate-outcome diagnostics, mirrored on the raw-scan warning:
        // a single surviving cluster holding most of the corpus means the
        // rescans never managed to break the blob apart.
        if n > 10 && assigned > 0 {
            if let Some(largest) = clusters.iter().map(Vec::len).max() {
                if largest * 2 > assigned {
                    tracing::warn!(
                        largest_cluster = largest,
                        assigned = assigned,
                        total_points = n,
                        pct = (largest * 100) / assigned,
                        epsilon = %format!("{:.4}", chosen.epsilon),
                        "Mega-cluster: largest cluster holds {}% of assigned points",
                        (largest * 100) / assigned
                    );
                }
            }
        }

        ClusterRun {
            clusters,
            labels,
            epsilon: chosen.epsilon,
            outlier_count,
        }
    }
}
