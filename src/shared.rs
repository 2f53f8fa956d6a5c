//! Consistent reads of a cluster that another thread is writing.
//!
//! The core types take no locks: one driver thread mutates a cluster while
//! consumers may read it. When a consumer needs the numeric and label state
//! to agree with each other, wrap the cluster in a [`SharedCluster`] and read
//! through [`SharedCluster::snapshot`], which copies every reported value
//! under one read lock.
//!
//! ```rust
//! use microcluster::{ClusterFactory, KernelConfig, SharedCluster};
//!
//! let factory = ClusterFactory::new(KernelConfig::default()).unwrap();
//! let shared = SharedCluster::new(factory.create(&[0.0, 0.0], Some(0), 0));
//!
//! let writer = shared.clone();
//! std::thread::spawn(move || writer.insert(&[1.0, 1.0], Some(1), 1).unwrap())
//!     .join()
//!     .unwrap();
//!
//! let snap = shared.snapshot();
//! assert_eq!(snap.weight, 2.0);
//! assert_eq!(snap.center, vec![0.5, 0.5]);
//! ```

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::labeled::{Label, LabelAware, LabeledMicroCluster, PredictionTelemetry};

/// Point-in-time copy of everything consumers read from a cluster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    pub id: u64,
    pub weight: f64,
    /// Empty when the cluster has zero weight.
    pub center: Vec<f64>,
    pub radius: f64,
    pub label_votes: Vec<f64>,
    pub majority_label: Option<Label>,
    pub total_label_count: u64,
    pub times_giving_prediction: u32,
    pub has_given_prediction: bool,
    pub last_update_time: i64,
}

impl From<&LabeledMicroCluster> for ClusterSnapshot {
    fn from(cluster: &LabeledMicroCluster) -> Self {
        Self {
            id: cluster.id(),
            weight: cluster.weight(),
            center: cluster.center().unwrap_or_default(),
            radius: cluster.radius(),
            label_votes: cluster.label_votes(),
            majority_label: cluster.majority_label(),
            total_label_count: cluster.total_label_count(),
            times_giving_prediction: cluster.times_giving_prediction(),
            has_given_prediction: cluster.has_given_prediction(),
            last_update_time: cluster.summary().last_update_time(),
        }
    }
}

/// A labeled micro-cluster behind a read-write lock.
///
/// Cloning is cheap and yields another handle to the same cluster.
#[derive(Clone, Debug)]
pub struct SharedCluster {
    inner: Arc<RwLock<LabeledMicroCluster>>,
}

impl SharedCluster {
    pub fn new(cluster: LabeledMicroCluster) -> Self {
        Self {
            inner: Arc::new(RwLock::new(cluster)),
        }
    }

    pub fn id(&self) -> u64 {
        self.inner.read().id()
    }

    /// Copy every consumer-visible value under a single read lock.
    pub fn snapshot(&self) -> ClusterSnapshot {
        ClusterSnapshot::from(&*self.inner.read())
    }

    /// Run `f` with shared access.
    pub fn read<R>(&self, f: impl FnOnce(&LabeledMicroCluster) -> R) -> R {
        f(&*self.inner.read())
    }

    /// Run `f` with exclusive access.
    pub fn write<R>(&self, f: impl FnOnce(&mut LabeledMicroCluster) -> R) -> R {
        f(&mut *self.inner.write())
    }

    pub fn insert(&self, point: &[f64], label: Option<Label>, timestamp: i64) -> Result<()> {
        self.inner.write().insert(point, label, timestamp)
    }

    /// Merge a plain cluster into the shared one.
    pub fn add_from(&self, other: &LabeledMicroCluster) -> Result<()> {
        self.inner.write().add(other)
    }

    /// Merge another shared cluster into this one.
    ///
    /// The other side is copied out first, so the two locks are never held
    /// together (and merging a handle into itself doubles the cluster).
    pub fn add_shared(&self, other: &SharedCluster) -> Result<()> {
        let other = other.read(|c| c.clone());
        self.add_from(&other)
    }

    /// Unwrap the cluster if this is the last handle.
    pub fn try_into_inner(self) -> std::result::Result<LabeledMicroCluster, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}
