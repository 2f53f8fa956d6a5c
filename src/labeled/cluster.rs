//! LabeledMicroCluster: a [`MomentSummary`] plus the labels it has seen.
//!
//! Apart from the numeric moments, a labeled micro-cluster counts the class
//! labels of the points absorbed into it and records how often it was used
//! to give a prediction. The counts back majority and vote-based
//! classification in semi-supervised drivers.
//!
//! ```rust
//! use microcluster::{IdAllocator, KernelConfig, LabelAware, LabeledMicroCluster};
//!
//! let ids = IdAllocator::new();
//! let config = KernelConfig::default();
//!
//! let mut cluster = LabeledMicroCluster::new(&[1.0, 2.0], Some(0), 0, &config, &ids);
//! cluster.insert(&[3.0, 4.0], Some(1), 0).unwrap();
//!
//! assert_eq!(cluster.center().unwrap(), vec![2.0, 3.0]);
//! assert_eq!(cluster.label_votes(), vec![0.5, 0.5]);
//! assert_eq!(cluster.majority_label(), Some(0)); // ties go to the smallest label
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::traits::{Label, LabelAware, PredictionTelemetry};
use crate::config::KernelConfig;
use crate::error::{ClusterError, Result};
use crate::factory::IdAllocator;
use crate::kernel::distance::check_dimensions;
use crate::kernel::{MomentSummary, NumericSummary};

/// A micro-cluster that tracks label counts and prediction usage.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledMicroCluster {
    id: u64,
    summary: MomentSummary,
    /// Count per label; absent means zero
    label_counts: BTreeMap<Label, u64>,
    inclusion_threshold: f64,
    /// Number of times this cluster has been used to give a prediction
    times_giving_prediction: u32,
    has_given_prediction: bool,
}

impl LabeledMicroCluster {
    /// Start a cluster from a single point, counting its label if present.
    ///
    /// As with [`MomentSummary::new`], `config` must already pass
    /// [`KernelConfig::validate`]; [`ClusterFactory`](crate::ClusterFactory)
    /// checks it once up front.
    pub fn new(
        point: &[f64],
        label: Option<Label>,
        timestamp: i64,
        config: &KernelConfig,
        ids: &IdAllocator,
    ) -> Self {
        let mut label_counts = BTreeMap::new();
        if let Some(label) = label {
            label_counts.insert(label, 1);
        }
        let cluster = Self {
            id: ids.next_id(),
            summary: MomentSummary::new(point, timestamp, config),
            label_counts,
            inclusion_threshold: config.inclusion_threshold,
            times_giving_prediction: 0,
            has_given_prediction: false,
        };
        debug!(id = cluster.id, timestamp, ?label, "labeled micro-cluster created");
        cluster
    }

    /// Copy an existing cluster under new decay parameters.
    ///
    /// Statistics, label counts and usage telemetry are inherited; the label
    /// map is deep-copied and the copy receives a fresh id.
    pub fn from_cluster(
        other: &LabeledMicroCluster,
        config: &KernelConfig,
        ids: &IdAllocator,
    ) -> Self {
        let cluster = Self {
            id: ids.next_id(),
            summary: MomentSummary::from_summary(&other.summary, config),
            label_counts: other.label_counts.clone(),
            inclusion_threshold: config.inclusion_threshold,
            times_giving_prediction: other.times_giving_prediction,
            has_given_prediction: other.has_given_prediction,
        };
        debug!(id = cluster.id, source = other.id, "labeled micro-cluster copied");
        cluster
    }

    /// Promote an unlabeled summary. Label counts start empty.
    pub fn from_summary(summary: &MomentSummary, config: &KernelConfig, ids: &IdAllocator) -> Self {
        let cluster = Self {
            id: ids.next_id(),
            summary: MomentSummary::from_summary(summary, config),
            label_counts: BTreeMap::new(),
            inclusion_threshold: config.inclusion_threshold,
            times_giving_prediction: 0,
            has_given_prediction: false,
        };
        debug!(id = cluster.id, weight = cluster.summary.weight(), "summary promoted");
        cluster
    }

    // --- Accessors ---

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn summary(&self) -> &MomentSummary {
        &self.summary
    }

    pub fn label_counts(&self) -> &BTreeMap<Label, u64> {
        &self.label_counts
    }

    pub fn inclusion_threshold(&self) -> f64 {
        self.inclusion_threshold
    }

    /// Sum of all label counts.
    pub fn total_label_count(&self) -> u64 {
        self.label_counts.values().fold(0, |acc, &c| acc.saturating_add(c))
    }

    pub fn dimensions(&self) -> usize {
        self.summary.dimensions()
    }

    pub fn weight(&self) -> f64 {
        self.summary.weight()
    }

    pub fn center(&self) -> Result<Vec<f64>> {
        self.summary.center()
    }

    pub fn variance(&self) -> Result<Vec<f64>> {
        self.summary.variance()
    }

    pub fn radius(&self) -> f64 {
        self.summary.radius()
    }

    pub fn relevance_stamp(&self) -> Result<f64> {
        self.summary.relevance_stamp()
    }

    // --- Mutation ---

    /// Absorb a point and, when labeled, count its label.
    ///
    /// Labels are untouched if the numeric update fails.
    pub fn insert(&mut self, point: &[f64], label: Option<Label>, timestamp: i64) -> Result<()> {
        self.summary.insert(point, timestamp)?;
        if let Some(label) = label {
            self.increment_label_count(label, 1);
        }
        Ok(())
    }

    /// Merge another labeled cluster: moments and label counts are summed,
    /// usage counters accumulated.
    pub fn add(&mut self, other: &LabeledMicroCluster) -> Result<()> {
        self.summary.add(&other.summary)?;
        for (&label, &count) in &other.label_counts {
            self.increment_label_count(label, count);
        }
        self.times_giving_prediction = self
            .times_giving_prediction
            .saturating_add(other.times_giving_prediction);
        self.has_given_prediction |= other.has_given_prediction;

        debug!(
            id = self.id,
            other = other.id,
            weight = self.summary.weight(),
            "labeled micro-clusters merged"
        );
        Ok(())
    }

    /// Merge an unlabeled summary. Only the moments change.
    pub fn add_summary(&mut self, other: &MomentSummary) -> Result<()> {
        self.summary.add(other)
    }

    /// Bring the moments forward to `timestamp` without absorbing a point.
    pub fn decay_to(&mut self, timestamp: i64) {
        self.summary.decay_to(timestamp);
    }

    pub fn increment_label_count(&mut self, label: Label, amount: u64) {
        let count = self.label_counts.entry(label).or_insert(0);
        *count = count.saturating_add(amount);
    }

    /// Decrease the count of `label`, stopping at zero.
    ///
    /// A label that was never counted is left absent.
    pub fn decrement_label_count(&mut self, label: Label, amount: u64) {
        match self.label_counts.get_mut(&label) {
            Some(count) if *count >= amount => *count -= amount,
            Some(count) => {
                warn!(id = self.id, label, count = *count, amount, "label count clamped at zero");
                *count = 0;
            }
            None if amount > 0 => {
                warn!(id = self.id, label, amount, "decrement of uncounted label ignored");
            }
            None => {}
        }
    }
}

impl LabelAware for LabeledMicroCluster {
    fn label_count(&self, label: Label) -> u64 {
        self.label_counts.get(&label).copied().unwrap_or(0)
    }

    /// Vector of length `max_label + 1` over the labels that fit an index.
    /// All zeros when every count is zero, empty when no indexable label
    /// was ever recorded.
    fn label_votes(&self) -> Vec<f64> {
        let indexed = || self.label_counts.range(..Label::MAX);
        let len = match indexed().next_back() {
            Some((&max_label, _)) => max_label + 1,
            None => return Vec::new(),
        };
        let mut votes = vec![0.0; len];
        let total = indexed().fold(0u64, |acc, (_, &c)| acc.saturating_add(c));
        if total == 0 {
            return votes;
        }
        for (&label, &count) in indexed() {
            votes[label] = count as f64 / total as f64;
        }
        votes
    }

    fn majority_label(&self) -> Option<Label> {
        let mut best: Option<(Label, u64)> = None;
        // Ascending iteration with a strict comparison keeps the smallest label on ties
        for (&label, &count) in &self.label_counts {
            if count > best.map_or(0, |(_, c)| c) {
                best = Some((label, count));
            }
        }
        best.map(|(label, _)| label)
    }

    /// `1.0` iff the point lies strictly closer to the center than the
    /// inclusion threshold. A zero-weight cluster includes nothing.
    fn inclusion_probability(&self, point: &[f64]) -> Result<f64> {
        check_dimensions(self.summary.dimensions(), point.len())?;
        let distance = match self.summary.distance_to_center(point) {
            Ok(d) => d,
            Err(ClusterError::DegenerateState(_)) => return Ok(0.0),
            Err(e) => return Err(e),
        };
        Ok(if distance < self.inclusion_threshold {
            1.0
        } else {
            0.0
        })
    }
}

impl PredictionTelemetry for LabeledMicroCluster {
    fn times_giving_prediction(&self) -> u32 {
        self.times_giving_prediction
    }

    fn increment_times_giving_prediction(&mut self, amount: u32) {
        self.times_giving_prediction = self.times_giving_prediction.saturating_add(amount);
    }

    fn set_times_giving_prediction(&mut self, amount: u32) {
        self.times_giving_prediction = amount;
    }

    fn has_given_prediction(&self) -> bool {
        self.has_given_prediction
    }

    fn set_has_given_prediction(&mut self) {
        self.has_given_prediction = true;
    }

    fn unset_has_given_prediction(&mut self) {
        self.has_given_prediction = false;
    }
}

impl NumericSummary for LabeledMicroCluster {
    fn dimensions(&self) -> usize {
        self.summary.dimensions()
    }

    fn weight(&self) -> f64 {
        self.summary.weight()
    }

    fn center(&self) -> Result<Vec<f64>> {
        self.summary.center()
    }

    fn variance(&self) -> Result<Vec<f64>> {
        self.summary.variance()
    }

    fn radius(&self) -> f64 {
        self.summary.radius()
    }

    fn last_update_time(&self) -> i64 {
        self.summary.last_update_time()
    }
}

// =============================================================================
// Tests
// =============================================================================
