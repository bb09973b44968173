//! Stub implementations of [`NamingProvider`].
//!
//! # ⚠️ TEST ONLY - DO NOT USE IN PRODUCTION ⚠️
//!
//! Three providers for exercising the naming path without a language model:
//!
//! - [`StubNamingProvider`]: deterministic labels derived from the sample
//! - [`FailingNamingProvider`]: scripted failures, for fallback paths
//! - [`RecordingNamingProvider`]: captures every sample it is shown

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{WorkstreamError, WorkstreamResult};
use crate::traits::{AchievementSummary, NamingProvider, WorkstreamLabel};

fn derived_label(sample: &[AchievementSummary]) -> WorkstreamLabel {
    let name = sample
        .first()
        .map(|s| format!("Stream: {}", s.title))
        .unwrap_or_else(|| "Stream: (empty sample)".to_string());
    WorkstreamLabel {
        name,
        description: format!("Grouped from {} sampled achievements", sample.len()),
    }
}

/// Deterministic naming provider for tests.
///
/// The label is a pure function of the sample, so assertions can predict
/// it exactly: the name echoes the first sampled title and the description
/// reports the sample size.
#[derive(Debug, Default)]
pub struct StubNamingProvider;

impl StubNamingProvider {
    /// Create a new stub provider.
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NamingProvider for StubNamingProvider {
    async fn name_workstream(
        &self,
        sample: &[AchievementSummary],
    ) -> WorkstreamResult<WorkstreamLabel> {
        Ok(derived_label(sample))
    }
}

/// Naming provider that fails on demand.
///
/// Constructed [`always`](Self::always), every call errors. Constructed
/// [`for_titles_containing`](Self::for_titles_containing), only samples
/// that include the marker fail and everything else succeeds like
/// [`StubNamingProvider`]. The second form drives tests where one
/// cluster's naming dies while its siblings proceed.
#[derive(Debug)]
pub struct FailingNamingProvider {
    trigger: Option<String>,
}

impl FailingNamingProvider {
    /// Fail every call.
    pub fn always() -> Self {
        Self { trigger: None }
    }

    /// Fail only when some sampled title contains `marker`.
    pub fn for_titles_containing(marker: impl Into<String>) -> Self {
        Self {
            trigger: Some(marker.into()),
        }
    }

    fn should_fail(&self, sample: &[AchievementSummary]) -> bool {
        match &self.trigger {
            None => true,
            Some(marker) => sample.iter().any(|s| s.title.contains(marker.as_str())),
        }
    }
}

#[async_trait]
impl NamingProvider for FailingNamingProvider {
    async fn name_workstream(
        &self,
        sample: &[AchievementSummary],
    ) -> WorkstreamResult<WorkstreamLabel> {
        if self.should_fail(sample) {
            return Err(WorkstreamError::naming("stub provider scripted to fail"));
        }
        Ok(derived_label(sample))
    }
}

/// Naming provider that records every sample before answering.
///
/// Samples are captured as title lists in call order, so tests can assert
/// on sample sizes and contents after a run.
#[derive(Debug, Default)]
pub struct RecordingNamingProvider {
    calls: Mutex<Vec<Vec<String>>>,
}

impl RecordingNamingProvider {
    /// Create a new recording provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The title lists shown to the provider, in call order.
    pub fn recorded_samples(&self) -> Vec<Vec<String>> {
        self.calls.lock().clone()
    }

    /// Number of naming calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl NamingProvider for RecordingNamingProvider {
    async fn name_workstream(
        &self,
        sample: &[AchievementSummary],
    ) -> WorkstreamResult<WorkstreamLabel> {
        let titles: Vec<String> = sample.iter().map(|s| s.title.clone()).collect();
        self.calls.lock().push(titles);
        Ok(derived_label(sample))
    }
}
