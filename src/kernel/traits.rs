//! Numeric capability shared by plain and labeled summaries.

use crate::error::Result;

/// Read access to the decayed moments of a summary.
///
/// Evaluation and visualization consumers depend on this trait only, so they
/// work the same over a bare [`MomentSummary`](super::MomentSummary) or a
/// [`LabeledMicroCluster`](crate::labeled::LabeledMicroCluster).
pub trait NumericSummary {
    /// Fixed dimensionality of the summarized points.
    fn dimensions(&self) -> usize;

    /// Decayed count of absorbed points.
    fn weight(&self) -> f64;

    /// Per-dimension mean. Fails with `DegenerateState` at zero weight.
    fn center(&self) -> Result<Vec<f64>>;

    /// Per-dimension variance clamped at zero. Fails at zero weight.
    fn variance(&self) -> Result<Vec<f64>>;

    /// Radius of the summary, `0.0` when the weight is below the floor.
    fn radius(&self) -> f64;

    /// Timestamp of the most recent insertion or decay.
    fn last_update_time(&self) -> i64;
}
