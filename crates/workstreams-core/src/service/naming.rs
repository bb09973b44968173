//! Naming pipeline: sampling, provider calls, and fallbacks.
//!
//! # Algorithm
//!
//! 1. Sample up to [`naming::MAX_SAMPLE_SIZE`] members per cluster,
//!    nearest to the centroid first, so the provider sees the most
//!    central work rather than edge members
//! 2. Ask the [`NamingProvider`] for a label
//! 3. On provider failure, derive a name from the most frequent title
//!    words instead; a cluster is never left nameless and a single bad
//!    provider response never fails the run
//!
//! Ties in the sample ordering break on item id, so the same cluster
//! always yields the same sample.

use tracing::{debug, warn};

use crate::clustering::cosine_distance;
use crate::config::constants::naming;
use crate::error::WorkstreamResult;
use crate::traits::{AchievementSummary, NamingProvider, WorkstreamLabel};
use crate::types::EmbeddedAchievement;

/// Pick the members a naming provider gets to see.
///
/// Nearest-to-centroid first, capped at [`naming::MAX_SAMPLE_SIZE`].
///
/// # Errors
///
/// Returns [`WorkstreamError::DimensionMismatch`](crate::error::WorkstreamError::DimensionMismatch)
/// if a member embedding disagrees with the centroid dimensionality.
pub(crate) fn representative_sample(
    members: &[EmbeddedAchievement],
    centroid: &[f32],
) -> WorkstreamResult<Vec<AchievementSummary>> {
    let mut ranked: Vec<(f32, &EmbeddedAchievement)> = Vec::with_capacity(members.len());
    for member in members {
        ranked.push((cosine_distance(&member.embedding, centroid)?, member));
    }

    ranked.sort_by(|(da, a), (db, b)| {
        da.partial_cmp(db)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.id.cmp(&b.id))
    });

    Ok(ranked
        .iter()
        .take(naming::MAX_SAMPLE_SIZE)
        .map(|(_, member)| AchievementSummary::from(*member))
        .collect())
}

/// Derive a label from title word frequencies.
///
/// Words shorter than [`naming::FALLBACK_MIN_WORD_LEN`] characters are
/// ignored; the top [`naming::FALLBACK_WORD_COUNT`] remaining words (ties
/// broken by first appearance) become the name. With no qualifying words
/// at all the name falls back to [`naming::FALLBACK_NAME`].
pub(crate) fn fallback_label(
    sample: &[AchievementSummary],
    member_count: usize,
) -> WorkstreamLabel {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for summary in sample {
        for raw in summary.title.split_whitespace() {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase();
            if word.chars().count() < naming::FALLBACK_MIN_WORD_LEN {
                continue;
            }
            match counts.iter_mut().find(|(w, _)| *w == word) {
                Some((_, count)) => *count += 1,
                None => counts.push((word, 1)),
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    let name = if counts.is_empty() {
        naming::FALLBACK_NAME.to_string()
    } else {
        counts
            .iter()
            .take(naming::FALLBACK_WORD_COUNT)
            .map(|(word, _)| capitalize(word))
            .collect::<Vec<_>>()
            .join(" ")
    };

    WorkstreamLabel {
        name,
        description: format!("Automatically grouped {member_count} related achievements"),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Obtain a label for one cluster, falling back on provider failure.
///
/// Infallible: every cluster comes out labeled one way or the other, and
/// the fallback path is always visible in the logs.
pub(crate) async fn resolve_label(
    provider: &dyn NamingProvider,
    sample: &[AchievementSummary],
    member_count: usize,
) -> WorkstreamLabel {
    match provider.name_workstream(sample).await {
        Ok(label) => {
            debug!(name = %label.name, members = member_count, "Naming provider labeled cluster");
            label
        }
        Err(err) => {
            let label = fallback_label(sample, member_count);
            warn!(
                error = %err,
                fallback_name = %label.name,
                members = member_count,
                "Naming provider failed, using title-derived fallback label"
            );
            label
        }
    }
}
