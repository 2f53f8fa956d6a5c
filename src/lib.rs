//! # microcluster: incremental micro-cluster summaries
//!
//! A micro-cluster stands in for a set of points too numerous to keep. It
//! stores decayed first and second moments, so centers, radii and freshness
//! can be reconstructed at any time, two summaries can be merged without the
//! raw data, and old evidence fades deterministically. Labeled clusters also
//! count the labels they absorbed for semi-supervised prediction.
//!
//! ## Quick Start
//!
//! ```rust
//! use microcluster::{ClusterFactory, KernelConfig, LabelAware};
//!
//! let config = KernelConfig::default()
//!     .with_half_life(500.0)
//!     .with_inclusion_threshold(0.5);
//! let factory = ClusterFactory::new(config)?;
//!
//! // The driver decides a point starts a new cluster
//! let mut cluster = factory.create(&[1.0, 2.0], Some(0), 0);
//!
//! // ... and routes later points into it
//! cluster.insert(&[1.2, 2.1], Some(0), 10)?;
//! cluster.insert(&[0.9, 1.8], None, 20)?;
//!
//! let center = cluster.center()?;
//! let votes = cluster.label_votes();
//! let included = cluster.inclusion_probability(&[1.0, 2.0])?;
//! assert_eq!(included, 1.0);
//! assert_eq!(votes, vec![1.0]);
//! # let _ = center;
//! # Ok::<(), microcluster::ClusterError>(())
//! ```
//!
//! ## Core Concepts
//!
//! - **MomentSummary**: weight, linear sum and squared sum, decayed by
//!   `2^(-lambda * elapsed)` on every insert
//! - **LabeledMicroCluster**: a summary plus label counts and usage telemetry
//! - **ClusterFactory**: shared configuration and an explicit id allocator
//! - **SharedCluster**: lock-guarded handle for consistent concurrent reads

pub mod config;
pub mod error;
pub mod factory;
pub mod kernel;
pub mod labeled;
pub mod shared;

// Re-exports for convenience
pub use config::KernelConfig;
pub use error::{ClusterError, Result};
pub use factory::{ClusterFactory, IdAllocator};
pub use kernel::{MomentSummary, NumericSummary};
pub use labeled::{Label, LabelAware, LabeledMicroCluster, PredictionTelemetry};
pub use shared::{ClusterSnapshot, SharedCluster};

#[cfg(test)]
mod tests {
    use super::*;

    /// Consumers written against the capability traits only.
    fn describe(cluster: &(impl NumericSummary + LabelAware)) -> (f64, Option<Label>) {
        (cluster.weight(), cluster.majority_label())
    }

    /// Predict through the traits and record the usage.
    fn predict<C: LabelAware + PredictionTelemetry>(cluster: &mut C) -> Option<Label> {
        let label = cluster.majority_label();
        if label.is_some() {
            cluster.increment_times_giving_prediction(1);
            cluster.set_has_given_prediction();
        }
        label
    }

    #[test]
    fn test_prediction_through_traits() {
        let factory = ClusterFactory::new(KernelConfig::default()).unwrap();
        let mut labeled = factory.create(&[0.0], Some(4), 0);
        let mut unlabeled = factory.create(&[0.0], None, 0);

        assert_eq!(predict(&mut labeled), Some(4));
        assert_eq!(predict(&mut labeled), Some(4));
        assert_eq!(labeled.times_giving_prediction(), 2);
        assert!(labeled.has_given_prediction());

        assert_eq!(predict(&mut unlabeled), None);
        assert!(!unlabeled.has_given_prediction());
    }

    #[test]
    fn test_driver_round() {
        let factory = ClusterFactory::new(KernelConfig::default().with_half_life(100.0)).unwrap();

        let mut near = factory.create(&[0.0, 0.0], Some(1), 0);
        let mut far = factory.create(&[10.0, 10.0], Some(2), 0);

        for t in 1..=20 {
            let p = [0.01 * t as f64, 0.0];
            let (target, label) = if near.inclusion_probability(&p).unwrap() == 1.0 {
                (&mut near, 1)
            } else {
                (&mut far, 2)
            };
            target.insert(&p, Some(label), t).unwrap();
        }

        // The center drifts with the points, so every point stays within 0.2 of it
        assert_eq!(near.label_votes(), vec![0.0, 1.0]);
        assert_eq!(near.total_label_count(), 21);
        assert_eq!(describe(&far), (1.0, Some(2)));

        let merged = factory.merge(&near, &far).unwrap();
        let (weight, majority) = describe(&merged);
        assert_eq!(weight, near.weight() + far.weight());
        assert_eq!(majority, Some(1));
    }

    #[test]
    fn test_stale_cluster_loses_weight() {
        let factory = ClusterFactory::new(KernelConfig::default().with_half_life(10.0)).unwrap();
        let mut fresh = factory.create(&[0.0], None, 0);
        let mut stale = factory.create(&[0.0], None, 0);
        for _ in 0..9 {
            fresh.insert(&[0.0], None, 0).unwrap();
            stale.insert(&[0.0], None, 0).unwrap();
        }

        fresh.insert(&[0.0], None, 10).unwrap();
        stale.insert(&[0.0], None, 100).unwrap();

        // 10 * 2^-1 + 1 and 10 * 2^-10 + 1
        assert!((fresh.weight() - 6.0).abs() < 1e-12);
        assert!((stale.weight() - (10.0 / 1024.0 + 1.0)).abs() < 1e-12);
    }
}
