//! Label capability for semi-supervised consumers.

use crate::error::Result;

/// Class label. Labels double as indices into [`LabelAware::label_votes`].
pub type Label = usize;

/// Label distribution queries used by prediction consumers.
pub trait LabelAware {
    /// Count recorded for `label`, `0` when never seen.
    fn label_count(&self, label: Label) -> u64;

    /// Label counts normalized to sum to 1, indexed by label.
    ///
    /// `Label::MAX` has no index slot and is left out of the votes.
    fn label_votes(&self) -> Vec<f64>;

    /// Label with the greatest count, smallest label on ties.
    fn majority_label(&self) -> Option<Label>;

    /// Binary membership of `point`: `1.0` or `0.0`.
    fn inclusion_probability(&self, point: &[f64]) -> Result<f64>;
}

/// Prediction-usage bookkeeping a driver keeps on each cluster.
pub trait PredictionTelemetry {
    /// Number of predictions this cluster has contributed to.
    fn times_giving_prediction(&self) -> u32;

    fn increment_times_giving_prediction(&mut self, amount: u32);

    fn set_times_giving_prediction(&mut self, amount: u32);

    fn has_given_prediction(&self) -> bool;

    fn set_has_given_prediction(&mut self);

    fn unset_has_given_prediction(&mut self);
}
