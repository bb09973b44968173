//! Incremental assignment of new items into existing workstreams.
//!
//! Between full reclustering runs, new achievements are matched against the
//! centroids of active workstreams. An item is accepted by its nearest
//! centroid only when the cosine distance is strictly inside the acceptance
//! radius derived from [`ClusteringParams::acceptance_radius`]; anything
//! farther stays unassigned until the next full run sweeps it up.
//!
//! This module only proposes. It never writes: archived workstreams are
//! invisible to matching, workstreams without a centroid cannot attract
//! items, and items that clear no radius are reported back untouched. The
//! caller persists accepted proposals and recomputes the affected centroids.

use uuid::Uuid;

use crate::clustering::distance::cosine_distance;
use crate::clustering::params::ClusteringParams;
use crate::error::WorkstreamResult;
use crate::types::{EmbeddedAchievement, Workstream};

/// One accepted item-to-workstream match.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentProposal {
    /// The item being placed
    pub item_id: Uuid,
    /// The workstream whose centroid won
    pub workstream_id: Uuid,
    /// Cosine distance from the item to that centroid
    pub distance: f32,
}

/// The outcome of matching a batch of items against active workstreams.
#[derive(Debug, Clone, Default)]
pub struct AssignmentPlan {
    /// Items that cleared the acceptance radius, with their matches
    pub assignments: Vec<AssignmentProposal>,
    /// Items left unassigned; picked up by the next full run
    pub unassigned: Vec<Uuid>,
}

impl AssignmentPlan {
    /// Number of items the plan places into a workstream.
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Distinct workstreams that received at least one item.
    pub fn touched_workstreams(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.assignments.iter().map(|a| a.workstream_id).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

/// Match each item against the nearest active workstream centroid.
///
/// Archived workstreams and workstreams without a centroid never
/// participate. With no eligible workstream at all, every item comes back
/// unassigned; that is a normal outcome, not an error.
///
/// # Errors
///
/// Returns [`WorkstreamError::DimensionMismatch`](crate::error::WorkstreamError::DimensionMismatch)
/// if any item embedding and centroid disagree on dimensionality.
pub fn propose_assignments(
    items: &[EmbeddedAchievement],
    workstreams: &[Workstream],
    params: &ClusteringParams,
) -> WorkstreamResult<AssignmentPlan> {
    let radius = params.acceptance_radius();
    let candidates: Vec<(&Workstream, &[f32])> = workstreams
        .iter()
        .filter(|ws| ws.is_active())
        .filter_map(|ws| ws.centroid.as_deref().map(|c| (ws, c)))
        .collect();

    let mut plan = AssignmentPlan::default();

    for item in items {
        let mut nearest: Option<(Uuid, f32)> = None;
        for (ws, centroid) in &candidates {
            let dist = cosine_distance(&item.embedding, centroid)?;
            let closer = match nearest {
                Some((_, best)) => dist < best,
                None => true,
            };
            if closer {
                nearest = Some((ws.id, dist));
            }
        }

        match nearest {
            Some((workstream_id, distance)) if distance < radius => {
                plan.assignments.push(AssignmentProposal {
                    item_id: item.id,
                    workstream_id,
                    distance,
                });
            }
            _ => plan.unassigned.push(item.id),
        }
    }

    tracing::debug!(
        items = items.len(),
        eligible_workstreams = candidates.len(),
        assigned = plan.assigned_count(),
        unassigned = plan.unassigned.len(),
        radius = %format!("{:.4}", radius),
        "Incremental assignment proposed"
    );

    Ok(plan)
}
