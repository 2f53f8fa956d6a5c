//! Kernel layer: the label-free numeric core.
//!
//! The kernel provides the minimal, stable foundation for every summary:
//! - Decayed, mergeable moments ([`MomentSummary`])
//! - The read-side capability trait ([`NumericSummary`])
//! - Euclidean distance and normal-quantile helpers ([`distance`])
//!
//! This layer has no dependencies on [`labeled`](crate::labeled) or
//! [`shared`](crate::shared).
//!
//! # Example
//!
//! ```rust
//! use microcluster::kernel::{MomentSummary, NumericSummary};
//! use microcluster::KernelConfig;
//!
//! let config = KernelConfig::default().with_half_life(100.0);
//! let mut a = MomentSummary::new(&[0.0, 0.0], 0, &config);
//! let b = MomentSummary::new(&[2.0, 2.0], 0, &config);
//! a.add(&b).unwrap();
//!
//! fn report(s: &impl NumericSummary) -> (f64, f64) {
//!     (s.weight(), s.radius())
//! }
//! assert_eq!(report(&a).0, 2.0);
//! ```

pub mod distance;
pub mod moments;
pub mod traits;

pub use moments::MomentSummary;
pub use traits::NumericSummary;
