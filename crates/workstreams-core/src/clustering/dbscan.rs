//! Single-radius density scan (DBSCAN).
//!
//! One scan at a fixed epsilon: core points are those with at least
//! `min_pts` points (themselves included) strictly within epsilon, clusters
//! grow outward from core points by breadth-first expansion, and everything
//! unreached stays noise.
//!
//! The refinement engine owns radius selection and runs several scans at
//! tightening radii; this module is just the single pass.
//!
//! # Algorithm
//!
//! 1. For each unvisited point, query its epsilon-region
//! 2. Regions smaller than min_pts leave the point as noise (label -1)
//! 3. Core points open a new cluster and expand: neighbors join the
//!    cluster, and neighbors that are themselves core keep expanding it
//! 4. Noise points reached during expansion are claimed as border members

use std::collections::VecDeque;

use super::distance::cosine_distance_prevalidated;

/// Noise label shared by every labeling stage.
pub const NOISE: i32 = -1;

/// Run one DBSCAN pass over prevalidated equal-dimension embeddings.
///
/// Returns one label per input point: `0..k` for cluster members, [`NOISE`]
/// for unclustered points. Cluster ids are assigned in discovery order.
///
/// The region test is strictly `dist < eps`; callers widen epsilon by a
/// small buffer so points sitting exactly on the estimated radius still
/// count as neighbors.
pub(crate) fn dbscan_scan(embeddings: &[Vec<f32>], eps: f32, min_pts: usize) -> Vec<i32> {
    let n = embeddings.len();
    let mut labels = vec![NOISE; n];
    let mut visited = vec![false; n];
    let mut next_cluster = 0i32;

    for i in 0..n {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let neighbors = region_query(embeddings, i, eps);
        if neighbors.len() < min_pts {
            continue; // stays noise unless later claimed as a border point
        }

        let cluster_id = next_cluster;
        next_cluster += 1;
        labels[i] = cluster_id;

        let mut queue: VecDeque<usize> = neighbors.into();
        while let Some(j) = queue.pop_front() {
            if labels[j] == NOISE {
                labels[j] = cluster_id;
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;

            let j_neighbors = region_query(embeddings, j, eps);
            if j_neighbors.len() >= min_pts {
                queue.extend(j_neighbors);
            }
        }
    }

    labels
}

/// Indices of all points strictly within `eps` of point `i`, including `i`
/// itself (unless `i` has zero magnitude and is therefore far from
/// everything, itself included).
fn region_query(embeddings: &[Vec<f32>], i: usize, eps: f32) -> Vec<usize> {
    (0..embeddings.len())
        .filter(|&j| cosine_distance_prevalidated(&embeddings[i], &embeddings[j]) < eps)
        .collect()
}
