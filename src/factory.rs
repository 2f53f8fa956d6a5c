//! Cluster construction: id allocation and a factory bundling configuration.
//!
//! Ids come from an explicit [`IdAllocator`] rather than hidden global state.
//! Share one allocator (behind an `Arc`) between every thread that creates
//! clusters for the same driver and ids stay unique.
//!
//! ```rust
//! use microcluster::{ClusterFactory, KernelConfig, LabelAware};
//!
//! let factory = ClusterFactory::new(KernelConfig::default()).unwrap();
//! let a = factory.create(&[0.0, 0.0], Some(1), 0);
//! let b = factory.create(&[0.1, 0.0], Some(2), 1);
//!
//! let merged = factory.merge(&a, &b).unwrap();
//! assert_ne!(merged.id(), a.id());
//! assert_eq!(merged.label_votes(), vec![0.0, 0.5, 0.5]);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::KernelConfig;
use crate::error::Result;
use crate::kernel::MomentSummary;
use crate::labeled::{Label, LabeledMicroCluster};

/// Monotonic, thread-safe source of cluster ids.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Allocator whose first id is `0`.
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Take the next id.
    pub fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }

    /// The id the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

/// Builds labeled micro-clusters that share one configuration and id space.
#[derive(Clone, Debug)]
pub struct ClusterFactory {
    config: KernelConfig,
    ids: Arc<IdAllocator>,
}

impl ClusterFactory {
    /// Create a factory with its own id space. Fails on invalid config.
    pub fn new(config: KernelConfig) -> Result<Self> {
        Self::with_ids(config, Arc::new(IdAllocator::new()))
    }

    /// Create a factory drawing ids from an existing allocator.
    pub fn with_ids(config: KernelConfig, ids: Arc<IdAllocator>) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ids })
    }

    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    pub fn ids(&self) -> &Arc<IdAllocator> {
        &self.ids
    }

    /// Start a new cluster from a single point.
    pub fn create(&self, point: &[f64], label: Option<Label>, timestamp: i64) -> LabeledMicroCluster {
        LabeledMicroCluster::new(point, label, timestamp, &self.config, &self.ids)
    }

    /// Copy a cluster under this factory's parameters with a fresh id.
    pub fn copy(&self, cluster: &LabeledMicroCluster) -> LabeledMicroCluster {
        LabeledMicroCluster::from_cluster(cluster, &self.config, &self.ids)
    }

    /// Promote an unlabeled summary to a labeled cluster.
    pub fn promote(&self, summary: &MomentSummary) -> LabeledMicroCluster {
        LabeledMicroCluster::from_summary(summary, &self.config, &self.ids)
    }

    /// Merge two clusters into a new logical cluster with a fresh id.
    ///
    /// Neither input is modified.
    pub fn merge(&self, a: &LabeledMicroCluster, b: &LabeledMicroCluster) -> Result<LabeledMicroCluster> {
        let mut merged = self.copy(a);
        merged.add(b)?;
        Ok(merged)
    }
}
