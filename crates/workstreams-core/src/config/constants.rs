//! Centralized tuning constants for the clustering pipeline.
//!
//! Every threshold that was previously a magic number lives here, grouped by
//! the stage that consumes it:
//!
//! 1. Single source of truth for all tunables
//! 2. Test consistency (tests assert against these names, not literals)
//! 3. Easy re-tuning without hunting through the pipeline
//!
//! Values were calibrated against real achievement corpora in the few-hundred
//! item range; they are deliberately conservative for smaller corpora.

/// Neighborhood radius (epsilon) estimation.
///
/// Epsilon is estimated from the distribution of k-nearest-neighbor distances
/// across the corpus, then clamped into a range known to behave well for
/// normalized text embeddings under cosine distance.
pub mod epsilon {
    /// Percentile of the sorted k-distance distribution used as the estimate.
    ///
    /// 0.4 sits below the elbow for typical achievement corpora, keeping
    /// neighborhoods tight enough that unrelated work does not merge.
    pub const PERCENTILE: f64 = 0.4;

    /// Lower clamp for the estimated epsilon.
    pub const MIN: f32 = 0.15;

    /// Upper clamp for the estimated epsilon.
    pub const MAX: f32 = 0.35;

    /// Fixed epsilon returned when the corpus has fewer points than the
    /// neighborhood size k. Too few points for a meaningful k-distance
    /// distribution; 0.6 is permissive so tiny corpora still form groups.
    pub const SMALL_CORPUS_DEFAULT: f32 = 0.6;

    /// Additive buffer applied to the estimate before scanning.
    ///
    /// The region query uses a strict `<` comparison; the buffer keeps points
    /// sitting exactly at the estimated radius inside the neighborhood.
    pub const BOUNDARY_BUFFER: f32 = 0.001;
}

/// Multi-attempt scan refinement and cluster quality scoring.
pub mod refinement {
    /// Maximum number of scan attempts per clustering run.
    pub const MAX_ATTEMPTS: usize = 3;

    /// Epsilon multiplier per attempt. Attempt `i` scans at `eps * 0.85^i`,
    /// so later attempts use tighter neighborhoods to break up blobs.
    pub const TIGHTEN_FACTOR: f32 = 0.85;

    /// Ideal number of clusters for a corpus. The score penalizes deviation.
    pub const TARGET_CLUSTER_COUNT: f32 = 10.0;

    /// Ideal fraction of items assigned to some cluster (not outliers).
    pub const TARGET_COVERAGE: f32 = 0.7;

    /// Score weight on deviation from the target cluster count.
    pub const COUNT_WEIGHT: f32 = 5.0;

    /// Score weight on dominance (largest cluster / assigned items).
    ///
    /// Heaviest weight: one mega-cluster swallowing the corpus is the
    /// failure mode this scoring exists to prevent.
    pub const DOMINANCE_WEIGHT: f32 = 100.0;

    /// Score weight on deviation from the target coverage.
    pub const COVERAGE_WEIGHT: f32 = 30.0;

    /// Early-stop dominance bound: an attempt whose largest cluster holds
    /// less than this fraction of assigned items is considered balanced.
    pub const EARLY_STOP_DOMINANCE: f32 = 0.5;

    /// Early-stop cluster-count floor, applied together with the dominance
    /// bound. Both must hold for the attempt loop to stop early.
    pub const EARLY_STOP_MIN_CLUSTERS: usize = 5;

    /// Raw cluster count above which adaptive size filtering kicks in.
    pub const MAX_RAW_CLUSTERS: usize = 25;

    /// Corpus items per cluster used to derive the adaptive target count.
    pub const ITEMS_PER_TARGET_CLUSTER: usize = 25;

    /// Lower bound of the adaptive target cluster count.
    pub const ADAPTIVE_TARGET_MIN: usize = 12;

    /// Upper bound of the adaptive target cluster count.
    pub const ADAPTIVE_TARGET_MAX: usize = 20;
}

/// Full-versus-incremental reclustering policy thresholds.
pub mod policy {
    /// Fractional corpus growth since the last full run that forces another
    /// full run. Centroids drift meaningfully past 10% growth.
    pub const GROWTH_RATIO: f64 = 0.10;

    /// Absolute number of new items since the last full run that forces a
    /// full run regardless of ratio. Large corpora hit this first.
    pub const GROWTH_ABSOLUTE: usize = 50;

    /// Age of the last full run, in days, beyond which results are stale.
    pub const MAX_AGE_DAYS: i64 = 30;
}

/// Corpus size thresholds for clustering eligibility and parameters.
pub mod corpus {
    /// Minimum embedded items for a full clustering run. Below this the run
    /// is rejected; density structure is noise at smaller sizes.
    pub const MIN_ITEMS_FOR_CLUSTERING: usize = 20;

    /// Corpus size at which parameterization switches from the small-corpus
    /// profile to the large-corpus profile.
    pub const SMALL_CORPUS_LIMIT: usize = 100;

    /// Neighborhood size (minimum points) for both profiles.
    pub const MIN_PTS: usize = 3;

    /// Minimum surviving cluster size for both profiles.
    pub const MIN_CLUSTER_SIZE: usize = 3;

    /// Outlier threshold for corpora below [`SMALL_CORPUS_LIMIT`].
    ///
    /// Incremental assignment accepts an item when its centroid distance is
    /// under `1.0 - threshold`, so higher values are stricter.
    pub const SMALL_CORPUS_OUTLIER_THRESHOLD: f32 = 0.7;

    /// Outlier threshold for corpora at or above [`SMALL_CORPUS_LIMIT`].
    /// Slightly looser: dense corpora can absorb more borderline items.
    pub const LARGE_CORPUS_OUTLIER_THRESHOLD: f32 = 0.65;
}

/// Workstream naming.
pub mod naming {
    /// Maximum number of member achievements sampled for a naming request.
    pub const MAX_SAMPLE_SIZE: usize = 15;

    /// Hard cap on workstream names, in characters.
    pub const MAX_NAME_LEN: usize = 256;

    /// Hard cap on workstream descriptions, in characters.
    pub const MAX_DESCRIPTION_LEN: usize = 1000;

    /// Name of last resort when both the provider and the word-frequency
    /// fallback produce nothing usable.
    pub const FALLBACK_NAME: &str = "Unnamed Workstream";

    /// Minimum length for a title word to count toward the fallback name.
    /// Filters "a", "the", "of" and similar glue without a stopword list.
    pub const FALLBACK_MIN_WORD_LEN: usize = 4;

    /// Number of frequent words joined into a fallback name.
    pub const FALLBACK_WORD_COUNT: usize = 3;
}
