//! Vector math primitives for the clustering pipeline.
//!
//! Everything downstream (epsilon estimation, density scanning, incremental
//! assignment, centroid maintenance) is built on two operations: cosine
//! distance and elementwise-mean centroids.
//!
//! # Design Philosophy
//!
//! Distances here are cosine distances in [0.0, 2.0]:
//! - 0.0 = identical direction
//! - 1.0 = orthogonal
//! - 2.0 = opposite direction (also the zero-magnitude sentinel)
//!
//! Malformed input is a hard error, not a silent zero: mixing embedding
//! dimensionalities means the corpus is corrupt, and skipping the offending
//! vector would shift every downstream centroid unnoticed.

use crate::error::{WorkstreamError, WorkstreamResult};

/// Compute cosine distance between two dense vectors.
///
/// Distance is `1.0 - cosine_similarity`, so identical directions give 0.0
/// and opposite directions give 2.0. Zero-magnitude operands have no
/// direction to compare; they are treated as maximally distant (2.0) so they
/// never attract neighbors, and never produce NaN.
///
/// # Arguments
/// * `a` - First dense embedding as f32 slice
/// * `b` - Second dense embedding as f32 slice
///
/// # Errors
///
/// Returns `WorkstreamError::DimensionMismatch` if the slices differ in
/// length. Dimensionality is established by `a`.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> WorkstreamResult<f32> {
    if a.len() != b.len() {
        return Err(WorkstreamError::dimension_mismatch(a.len(), b.len()));
    }
    Ok(cosine_distance_prevalidated(a, b))
}

/// Cosine distance for slices already known to share a dimension.
///
/// Hot-loop variant backing the O(n^2) scans: the engine validates the whole
/// embedding set once up front, after which pairwise calls skip the length
/// check. Callers outside this crate go through [`cosine_distance`].
pub(crate) fn cosine_distance_prevalidated(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut mag_a_sq = 0.0f32;
    let mut mag_b_sq = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        mag_a_sq += x * x;
        mag_b_sq += y * y;
    }

    if mag_a_sq == 0.0 || mag_b_sq == 0.0 {
        return 2.0;
    }

    let sim = (dot / (mag_a_sq.sqrt() * mag_b_sq.sqrt())).clamp(-1.0, 1.0);
    1.0 - sim
}

/// Compute the elementwise mean of a set of vectors.
///
/// # Arguments
/// * `vectors` - Slice of equal-dimension embedding vectors
///
/// # Errors
///
/// - `WorkstreamError::EmptyInput` if `vectors` is empty
/// - `WorkstreamError::DimensionMismatch` if any vector's length differs
///   from the first vector's
pub fn centroid(vectors: &[Vec<f32>]) -> WorkstreamResult<Vec<f32>> {
    let first = vectors.first().ok_or(WorkstreamError::EmptyInput)?;
    let dim = first.len();

    let mut sums = vec![0.0f32; dim];
    for v in vectors {
        if v.len() != dim {
            return Err(WorkstreamError::dimension_mismatch(dim, v.len()));
        }
        for (acc, x) in sums.iter_mut().zip(v.iter()) {
            *acc += x;
        }
    }

    let count = vectors.len() as f32;
    for acc in sums.iter_mut() {
        *acc /= count;
    }

    Ok(sums)
}
