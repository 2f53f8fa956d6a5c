//! Decay and membership parameters shared by every summary a driver creates.
//!
//! The driver owns one [`KernelConfig`] and hands it to constructors; the
//! summaries copy the values they need and never mutate them.
//!
//! ```rust
//! use microcluster::KernelConfig;
//!
//! let config = KernelConfig::default()
//!     .with_half_life(1_000.0)
//!     .with_min_weight(2.0)
//!     .with_inclusion_threshold(0.5);
//! config.validate().unwrap();
//! assert!((config.decay_lambda() - 0.001).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{ClusterError, Result};

/// Default inclusion threshold (Euclidean distance to the center).
pub const DEFAULT_INCLUSION_THRESHOLD: f64 = 0.2;

/// Default multiplier applied to the mean deviation to obtain a radius.
pub const DEFAULT_RADIUS_FACTOR: f64 = 1.8;

/// Configuration for moment summaries and labeled micro-clusters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct KernelConfig {
    /// Elapsed time after which old evidence counts half. `None` disables
    /// decay.
    pub decay_half_life: Option<f64>,
    /// Minimum weight `m` below which radius is reported as zero. Also the
    /// number of "recent" points considered by the relevance stamp.
    pub min_weight: f64,
    /// Decay horizon `t`, carried for the driver's maximal-boundary logic.
    pub decay_horizon: f64,
    /// Distance to the center under which a point is considered included.
    pub inclusion_threshold: f64,
    /// Multiplier turning the mean per-dimension deviation into a radius.
    pub radius_factor: f64,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            decay_half_life: None,
            min_weight: 1.0,
            decay_horizon: 1.0,
            inclusion_threshold: DEFAULT_INCLUSION_THRESHOLD,
            radius_factor: DEFAULT_RADIUS_FACTOR,
        }
    }
}

impl KernelConfig {
    pub fn with_half_life(mut self, half_life: f64) -> Self {
        self.decay_half_life = Some(half_life);
        self
    }

    pub fn with_min_weight(mut self, m: f64) -> Self {
        self.min_weight = m;
        self
    }

    pub fn with_decay_horizon(mut self, t: f64) -> Self {
        self.decay_horizon = t;
        self
    }

    pub fn with_inclusion_threshold(mut self, threshold: f64) -> Self {
        self.inclusion_threshold = threshold;
        self
    }

    pub fn with_radius_factor(mut self, factor: f64) -> Self {
        self.radius_factor = factor;
        self
    }

    /// Decay rate `lambda` such that weights scale by `2^(-lambda * elapsed)`.
    ///
    /// Returns `0.0` (no decay) when no half-life is configured.
    pub fn decay_lambda(&self) -> f64 {
        match self.decay_half_life {
            Some(half_life) => 1.0 / half_life,
            None => 0.0,
        }
    }

    /// Check every parameter, returning the first violation found.
    pub fn validate(&self) -> Result<()> {
        if let Some(half_life) = self.decay_half_life {
            if !half_life.is_finite() || half_life <= 0.0 {
                return Err(ClusterError::InvalidConfig(format!(
                    "decay_half_life must be finite and positive, got {}",
                    half_life
                )));
            }
        }
        if !self.min_weight.is_finite() || self.min_weight < 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "min_weight must be finite and non-negative, got {}",
                self.min_weight
            )));
        }
        if !self.decay_horizon.is_finite() || self.decay_horizon <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "decay_horizon must be finite and positive, got {}",
                self.decay_horizon
            )));
        }
        if self.inclusion_threshold.is_nan() || self.inclusion_threshold <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "inclusion_threshold must be positive, got {}",
                self.inclusion_threshold
            )));
        }
        if !self.radius_factor.is_finite() || self.radius_factor <= 0.0 {
            return Err(ClusterError::InvalidConfig(format!(
                "radius_factor must be finite and positive, got {}",
                self.radius_factor
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid_and_never_decays() {
        let config = KernelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.decay_lambda(), 0.0);
        assert_eq!(config.inclusion_threshold, 0.2);
    }

    #[test]
    fn test_lambda_from_half_life() {
        let config = KernelConfig::default().with_half_life(4.0);
        assert!((config.decay_lambda() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_values() {
        let bad = [
            KernelConfig::default().with_half_life(0.0),
            KernelConfig::default().with_half_life(f64::NAN),
            KernelConfig::default().with_half_life(f64::INFINITY),
            KernelConfig::default().with_min_weight(-1.0),
            KernelConfig::default().with_decay_horizon(0.0),
            KernelConfig::default().with_inclusion_threshold(0.0),
            KernelConfig::default().with_radius_factor(f64::INFINITY),
        ];
        for config in bad {
            assert!(
                matches!(config.validate(), Err(ClusterError::InvalidConfig(_))),
                "expected rejection for {:?}",
                config
            );
        }
    }

    #[test]
    fn test_serde_round_trip() {
        let config = KernelConfig::default()
            .with_half_life(250.0)
            .with_min_weight(3.0);
        let json = serde_json::to_string(&config).unwrap();
        let back: KernelConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
