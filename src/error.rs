//! Error types for microcluster.

use thiserror::Error;

/// Micro-cluster error types.
///
/// Every variant is a contract violation by the calling driver. Nothing in
/// the crate recovers from them internally; they are returned as soon as
/// they are detected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClusterError {
    /// A point or summary did not match the cluster's fixed dimensionality
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A statistic was requested from a summary with zero weight
    #[error("Degenerate state: {0} is undefined for a zero-weight summary")]
    DegenerateState(&'static str),

    /// A configuration value was rejected
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

/// Result type alias for microcluster operations.
pub type Result<T> = std::result::Result<T, ClusterError>;
