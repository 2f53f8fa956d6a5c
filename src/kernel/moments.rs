//! MomentSummary: decayed, mergeable sufficient statistics for one micro-cluster.
//!
//! A summary keeps the weight, linear sum and squared sum of every point it
//! absorbed, plus the same moments over the points' timestamps. Mean,
//! variance and radius are reconstructed from those sums on demand, so a
//! summary never stores raw points.
//!
//! # Decay
//!
//! Before a point is absorbed, all moments are scaled by
//! `2^(-lambda * elapsed)` where `elapsed` is the time since the last
//! update. Out-of-order points (`timestamp <= last_update_time`) are absorbed
//! without decay.
//!
//! # Merging
//!
//! [`MomentSummary::add`] sums moments elementwise and does not decay.
//! Bring both sides to a common timestamp with [`MomentSummary::decay_to`]
//! first if exact weighting matters.
//!
//! ```rust
//! use microcluster::{KernelConfig, MomentSummary};
//!
//! let config = KernelConfig::default();
//! let mut summary = MomentSummary::new(&[1.0, 2.0], 0, &config);
//! summary.insert(&[3.0, 4.0], 0).unwrap();
//!
//! assert_eq!(summary.weight(), 2.0);
//! assert_eq!(summary.center().unwrap(), vec![2.0, 3.0]);
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use tracing::trace;

use super::distance::{check_dimensions, euclidean_distance, normal_quantile};
use super::traits::NumericSummary;
use crate::config::KernelConfig;
use crate::error::{ClusterError, Result};

/// Decayed first and second moments of a stream of points.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentSummary {
    /// Decayed count of absorbed points
    weight: f64,
    /// Decayed per-dimension sum of values
    linear_sum: Vec<f64>,
    /// Decayed per-dimension sum of squared values
    squared_sum: Vec<f64>,
    /// Decayed sum of absorbed timestamps
    linear_time_sum: f64,
    /// Decayed sum of squared absorbed timestamps
    squared_time_sum: f64,
    creation_time: i64,
    last_update_time: i64,

    decay_lambda: f64,
    decay_horizon: f64,
    min_weight: f64,
    radius_factor: f64,
}

impl MomentSummary {
    /// Create a summary holding a single point with weight 1.
    ///
    /// `config` must already pass [`KernelConfig::validate`]; debug builds
    /// assert it, release builds trust it.
    pub fn new(point: &[f64], timestamp: i64, config: &KernelConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated KernelConfig");
        let ts = timestamp as f64;
        Self {
            weight: 1.0,
            linear_sum: point.to_vec(),
            squared_sum: point.iter().map(|&x| x * x).collect(),
            linear_time_sum: ts,
            squared_time_sum: ts * ts,
            creation_time: timestamp,
            last_update_time: timestamp,
            decay_lambda: config.decay_lambda(),
            decay_horizon: config.decay_horizon,
            min_weight: config.min_weight,
            radius_factor: config.radius_factor,
        }
    }

    /// Create a zero-weight summary, typically used as a merge target.
    pub fn empty(dimensions: usize, timestamp: i64, config: &KernelConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated KernelConfig");
        Self {
            weight: 0.0,
            linear_sum: vec![0.0; dimensions],
            squared_sum: vec![0.0; dimensions],
            linear_time_sum: 0.0,
            squared_time_sum: 0.0,
            creation_time: timestamp,
            last_update_time: timestamp,
            decay_lambda: config.decay_lambda(),
            decay_horizon: config.decay_horizon,
            min_weight: config.min_weight,
            radius_factor: config.radius_factor,
        }
    }

    /// Copy another summary's statistics under new decay parameters.
    pub fn from_summary(other: &MomentSummary, config: &KernelConfig) -> Self {
        debug_assert!(config.validate().is_ok(), "unvalidated KernelConfig");
        Self {
            decay_lambda: config.decay_lambda(),
            decay_horizon: config.decay_horizon,
            min_weight: config.min_weight,
            radius_factor: config.radius_factor,
            ..other.clone()
        }
    }

    // --- Accessors ---

    pub fn dimensions(&self) -> usize {
        self.linear_sum.len()
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn linear_sum(&self) -> &[f64] {
        &self.linear_sum
    }

    pub fn squared_sum(&self) -> &[f64] {
        &self.squared_sum
    }

    pub fn creation_time(&self) -> i64 {
        self.creation_time
    }

    pub fn last_update_time(&self) -> i64 {
        self.last_update_time
    }

    pub fn decay_lambda(&self) -> f64 {
        self.decay_lambda
    }

    pub fn decay_horizon(&self) -> f64 {
        self.decay_horizon
    }

    pub fn min_weight(&self) -> f64 {
        self.min_weight
    }

    /// Whether the weight has reached the configured floor `m`.
    pub fn is_reliable(&self) -> bool {
        self.weight > 0.0 && self.weight >= self.min_weight
    }

    // --- Mutation ---

    /// Decay existing moments up to `timestamp`, then absorb `point` with
    /// weight 1.
    pub fn insert(&mut self, point: &[f64], timestamp: i64) -> Result<()> {
        check_dimensions(self.dimensions(), point.len())?;
        self.decay_to(timestamp);

        self.weight += 1.0;
        for ((ls, ss), &x) in self
            .linear_sum
            .iter_mut()
            .zip(self.squared_sum.iter_mut())
            .zip(point.iter())
        {
            *ls += x;
            *ss += x * x;
        }
        let ts = timestamp as f64;
        self.linear_time_sum += ts;
        self.squared_time_sum += ts * ts;

        trace!(timestamp, weight = self.weight, "point absorbed");
        Ok(())
    }

    /// Scale every moment by the decay accumulated since the last update and
    /// move `last_update_time` forward.
    ///
    /// Does nothing when `timestamp <= last_update_time`.
    pub fn decay_to(&mut self, timestamp: i64) {
        let elapsed = timestamp.saturating_sub(self.last_update_time);
        if elapsed <= 0 {
            return;
        }
        self.last_update_time = timestamp;

        let factor = self.decay_factor(elapsed);
        if factor < 1.0 {
            self.scale(factor);
            trace!(elapsed, factor, weight = self.weight, "moments decayed");
        }
    }

    /// Multiplicative decay applied over `elapsed` time units.
    ///
    /// Always in `[0, 1]`; `1.0` for non-positive elapsed time.
    pub fn decay_factor(&self, elapsed: i64) -> f64 {
        if elapsed <= 0 || self.decay_lambda == 0.0 {
            return 1.0;
        }
        (-self.decay_lambda * elapsed as f64).exp2()
    }

    /// Merge another summary into this one by summing moments.
    ///
    /// No decay is applied to either side.
    pub fn add(&mut self, other: &MomentSummary) -> Result<()> {
        check_dimensions(self.dimensions(), other.dimensions())?;

        self.weight += other.weight;
        for (ls, &o) in self.linear_sum.iter_mut().zip(other.linear_sum.iter()) {
            *ls += o;
        }
        for (ss, &o) in self.squared_sum.iter_mut().zip(other.squared_sum.iter()) {
            *ss += o;
        }
        self.linear_time_sum += other.linear_time_sum;
        self.squared_time_sum += other.squared_time_sum;
        self.creation_time = self.creation_time.min(other.creation_time);
        self.last_update_time = self.last_update_time.max(other.last_update_time);
        Ok(())
    }

    // --- Derived statistics ---

    /// Per-dimension mean: `linear_sum / weight`.
    pub fn center(&self) -> Result<Vec<f64>> {
        if self.weight <= 0.0 {
            return Err(ClusterError::DegenerateState("center"));
        }
        Ok(self.linear_sum.iter().map(|&ls| ls / self.weight).collect())
    }

    /// Per-dimension variance `squared_sum / weight - center^2`, clamped at 0.
    pub fn variance(&self) -> Result<Vec<f64>> {
        if self.weight <= 0.0 {
            return Err(ClusterError::DegenerateState("variance"));
        }
        Ok(self
            .linear_sum
            .iter()
            .zip(self.squared_sum.iter())
            .map(|(&ls, &ss)| {
                let mean = ls / self.weight;
                (ss / self.weight - mean * mean).max(0.0)
            })
            .collect())
    }

    /// Mean per-dimension standard deviation times the radius factor.
    ///
    /// Returns `0.0` for summaries lighter than the minimum weight, where the
    /// deviation is not trustworthy.
    pub fn radius(&self) -> f64 {
        if !self.is_reliable() || self.dimensions() == 0 {
            return 0.0;
        }
        match self.variance() {
            Ok(var) => {
                let deviation = var.iter().map(|v| v.sqrt()).sum::<f64>() / var.len() as f64;
                deviation * self.radius_factor
            }
            Err(_) => 0.0,
        }
    }

    /// Euclidean distance from `point` to the center.
    pub fn distance_to_center(&self, point: &[f64]) -> Result<f64> {
        check_dimensions(self.dimensions(), point.len())?;
        euclidean_distance(&self.center()?, point)
    }

    /// Age-weighted freshness of the summary.
    ///
    /// Estimates the arrival time of the most recent `m` points from the
    /// timestamp moments, assuming timestamps are normally distributed:
    /// `mu_t + sigma_t * quantile(1 - m / (2 * weight))`. Lighter summaries
    /// (`weight < 2m`) report the mean timestamp.
    ///
    /// The usual CluStream formula evaluates `quantile(m / (2 * weight))`,
    /// which lands in the oldest tail; the upper tail here is deliberate.
    pub fn relevance_stamp(&self) -> Result<f64> {
        if self.weight <= 0.0 {
            return Err(ClusterError::DegenerateState("relevance stamp"));
        }
        let mu = self.linear_time_sum / self.weight;
        if self.min_weight <= 0.0 || self.weight < 2.0 * self.min_weight {
            return Ok(mu);
        }
        let sigma = (self.squared_time_sum / self.weight - mu * mu).max(0.0).sqrt();
        Ok(mu + sigma * normal_quantile(1.0 - self.min_weight / (2.0 * self.weight)))
    }

    /// Draw `n` points from the axis-aligned Gaussian described by the
    /// center and variance.
    pub fn sample_points<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Result<Vec<Vec<f64>>> {
        let center = self.center()?;
        let variance = self.variance()?;
        let normals = center
            .iter()
            .zip(variance.iter())
            .map(|(&mean, &var)| {
                Normal::new(mean, var.sqrt())
                    .map_err(|_| ClusterError::DegenerateState("sampling distribution"))
            })
            .collect::<Result<Vec<Normal<f64>>>>()?;

        Ok((0..n)
            .map(|_| normals.iter().map(|normal| normal.sample(rng)).collect())
            .collect())
    }

    /// [`sample_points`](Self::sample_points) with a deterministic seed.
    pub fn sample_points_seeded(&self, n: usize, seed: u64) -> Result<Vec<Vec<f64>>> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.sample_points(n, &mut rng)
    }

    // --- Private helpers ---

    fn scale(&mut self, factor: f64) {
        self.weight *= factor;
        for v in self.linear_sum.iter_mut().chain(self.squared_sum.iter_mut()) {
            *v *= factor;
        }
        self.linear_time_sum *= factor;
        self.squared_time_sum *= factor;
    }
}

impl NumericSummary for MomentSummary {
    fn dimensions(&self) -> usize {
        MomentSummary::dimensions(self)
    }

    fn weight(&self) -> f64 {
        MomentSummary::weight(self)
    }

    fn center(&self) -> Result<Vec<f64>> {
        MomentSummary::center(self)
    }

    fn variance(&self) -> Result<Vec<f64>> {
        MomentSummary::variance(self)
    }

    fn radius(&self) -> f64 {
        MomentSummary::radius(self)
    }

    fn last_update_time(&self) -> i64 {
        MomentSummary::last_update_time(self)
    }
}

// =============================================================================
// Tests
// =============================================================================
