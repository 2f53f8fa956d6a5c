//! Distance and quantile helpers over raw `f64` slices.
//!
//! Summaries store plain `Vec<f64>` moments, so these work on slices rather
//! than a dedicated vector type.

use crate::error::{ClusterError, Result};

/// Fail with [`ClusterError::DimensionMismatch`] unless the lengths agree.
#[inline]
pub fn check_dimensions(expected: usize, got: usize) -> Result<()> {
    if expected != got {
        return Err(ClusterError::DimensionMismatch { expected, got });
    }
    Ok(())
}

/// Squared Euclidean distance.
pub fn squared_euclidean(a: &[f64], b: &[f64]) -> Result<f64> {
    check_dimensions(a.len(), b.len())?;
    Ok(a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| {
            let diff = x - y;
            diff * diff
        })
        .sum())
}

/// Raw Euclidean distance.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    Ok(squared_euclidean(a, b)?.sqrt())
}

/// Inverse error function, Giles (2010) polynomial approximation.
///
/// Returns `±inf` at `±1` and `NaN` outside `[-1, 1]`.
pub fn inverse_erf(x: f64) -> f64 {
    if x.is_nan() || !(-1.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 1.0 {
        return f64::INFINITY;
    }
    if x == -1.0 {
        return f64::NEG_INFINITY;
    }

    let mut w = -((1.0 - x) * (1.0 + x)).ln();
    let p = if w < 5.0 {
        w -= 2.5;
        let mut p = 2.810_226_36e-08;
        p = 3.432_739_39e-07 + p * w;
        p = -3.523_387_7e-06 + p * w;
        p = -4.391_506_54e-06 + p * w;
        p = 0.000_218_580_87 + p * w;
        p = -0.001_253_725_03 + p * w;
        p = -0.004_177_681_64 + p * w;
        p = 0.246_640_727 + p * w;
        1.501_409_41 + p * w
    } else {
        w = w.sqrt() - 3.0;
        let mut p = -0.000_200_214_257;
        p = 0.000_100_950_558 + p * w;
        p = 0.001_349_343_22 + p * w;
        p = -0.003_673_428_44 + p * w;
        p = 0.005_739_507_73 + p * w;
        p = -0.007_622_461_3 + p * w;
        p = 0.009_438_870_47 + p * w;
        p = 1.001_674_06 + p * w;
        2.832_976_82 + p * w
    };
    p * x
}

/// Standard normal quantile: `sqrt(2) * erf^-1(2z - 1)` for `z` in `[0, 1]`.
pub fn normal_quantile(z: f64) -> f64 {
    std::f64::consts::SQRT_2 * inverse_erf(2.0 * z - 1.0)
}
