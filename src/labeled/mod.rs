//! Labeled layer: micro-clusters that remember which labels they absorbed.
//!
//! - [`LabeledMicroCluster`]: composes a [`MomentSummary`](crate::kernel::MomentSummary)
//!   with per-label counts and prediction-usage telemetry.
//! - [`LabelAware`]: the capability semi-supervised consumers depend on.
//! - [`PredictionTelemetry`]: prediction-usage counters kept per cluster.

pub mod cluster;
pub mod traits;

pub use cluster::LabeledMicroCluster;
pub use traits::{Label, LabelAware, PredictionTelemetry};
