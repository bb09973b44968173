//! Neighborhood radius (epsilon) estimation from k-distance statistics.
//!
//! Density scanning needs a radius that matches the local geometry of the
//! corpus. A fixed radius that works for one team's embedding distribution
//! collapses another's into a single blob, so the radius is estimated per
//! run from the data:
//!
//! 1. For each point, compute the distance to its k-th nearest neighbor
//! 2. Sort those k-distances ascending
//! 3. Take the 40th percentile as the estimate
//! 4. Clamp into a range known to behave for normalized text embeddings
//!
//! The percentile sits deliberately below the classic k-distance elbow:
//! achievement corpora are small and noisy, and an elbow read off a few
//! hundred points over-merges. Corpora with fewer points than k skip the
//! whole procedure and use a fixed permissive radius.

use rayon::prelude::*;

use crate::config::constants::epsilon;

use super::distance::cosine_distance_prevalidated;

/// Estimate the scan radius for a corpus of embeddings.
///
/// Embeddings must share a dimension; the clustering engine validates this
/// before calling. The per-point k-distance pass is O(n^2) pairwise and runs
/// on the rayon thread pool.
///
/// # Arguments
///
/// * `embeddings` - Equal-dimension embedding vectors
/// * `k` - Neighborhood size, normally `min_pts`
///
/// # Returns
///
/// Estimated epsilon in `[epsilon::MIN, epsilon::MAX]`, or exactly
/// [`epsilon::SMALL_CORPUS_DEFAULT`] when the corpus has fewer than `k`
/// points (or `k` is zero) and a k-distance distribution does not exist.
pub fn estimate_epsilon(embeddings: &[Vec<f32>], k: usize) -> f32 {
    let n = embeddings.len();
    if k == 0 || n < k {
        tracing::debug!(
            points = n,
            k = k,
            epsilon = epsilon::SMALL_CORPUS_DEFAULT,
            "Corpus below neighborhood size, using fixed permissive epsilon"
        );
        return epsilon::SMALL_CORPUS_DEFAULT;
    }

    // Distance to each point's k-th nearest neighbor. With exactly k points
    // every point has only k-1 neighbors, so the index clamps to the last.
    let mut k_distances: Vec<f32> = (0..n)
        .into_par_iter()
        .map(|i| {
            let mut distances: Vec<f32> = (0..n)
                .filter(|&j| j != i)
                .map(|j| cosine_distance_prevalidated(&embeddings[i], &embeddings[j]))
                .collect();

            distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

            let idx = (k - 1).min(distances.len().saturating_sub(1));
            distances.get(idx).copied().unwrap_or(f32::MAX)
        })
        .collect();

    k_distances.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let percentile_idx = ((epsilon::PERCENTILE * n as f64).floor() as usize).min(n - 1);
    let raw = k_distances[percentile_idx];
    let clamped = raw.clamp(epsilon::MIN, epsilon::MAX);

    tracing::debug!(
        points = n,
        k = k,
        percentile_idx = percentile_idx,
        raw_estimate = %format!("{:.4}", raw),
        epsilon = %format!("{:.4}", clamped),
        "Epsilon estimated from k-distance distribution"
    );

    clamped
}
