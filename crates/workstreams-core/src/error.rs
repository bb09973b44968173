//! Error types for workstreams-core.
//!
//! Defines the error surface for clustering, policy evaluation, and workstream
//! lifecycle operations. Errors are designed for fail-fast debugging with
//! descriptive messages: invalid vectors and undersized corpora are rejected
//! up front rather than papered over mid-run.

use thiserror::Error;

/// Workstream clustering errors.
///
/// Provides typed errors for every fallible operation in the crate.
/// Implements `std::error::Error` and `Display` via `thiserror`.
#[derive(Debug, Error)]
pub enum WorkstreamError {
    /// Corpus has too few embedded items for a full clustering run.
    #[error("Insufficient data for clustering: need at least {required} embedded items, got {actual}")]
    InsufficientData {
        /// Minimum number of embedded items required
        required: usize,
        /// Number of embedded items actually present
        actual: usize,
    },

    /// Two vectors of differing dimensionality were combined.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimensionality established by the first operand
        expected: usize,
        /// Dimensionality of the offending operand
        actual: usize,
    },

    /// An operation that requires at least one vector received none.
    #[error("Empty input: operation requires at least one vector")]
    EmptyInput,

    /// The naming provider failed to label a cluster.
    ///
    /// Non-fatal during full reclustering: the orchestrator falls back to a
    /// heuristic name and keeps going. Surfaced directly everywhere else.
    #[error("Naming provider failure: {0}")]
    NamingProvider(String),

    /// A corpus store read or write failed.
    ///
    /// Always propagated to the caller; this crate never retries writes.
    #[error("Store failure: {0}")]
    Store(String),

    /// A clustering parameter is outside its valid range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An embedding provider call failed or returned a malformed vector.
    #[error("Embedding failure: {0}")]
    Embedding(String),
}

impl WorkstreamError {
    /// Creates an `InsufficientData` error.
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// Creates a `DimensionMismatch` error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        Self::DimensionMismatch { expected, actual }
    }

    /// Creates a `NamingProvider` error from any displayable cause.
    pub fn naming(msg: impl Into<String>) -> Self {
        Self::NamingProvider(msg.into())
    }

    /// Creates a `Store` error from any displayable cause.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates an `InvalidParameter` error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Whether a full reclustering run may absorb this error and continue.
    ///
    /// Only naming failures qualify; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NamingProvider(_))
    }
}

/// Convenient Result type for workstream operations.
pub type WorkstreamResult<T> = Result<T, WorkstreamError>;
