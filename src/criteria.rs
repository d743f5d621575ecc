//! Component-retention criteria.
//!
//! Both rules are pure functions of the eigenvalue vector, so they can be
//! applied repeatedly, concurrently, and with different policies to the
//! same fitted decomposition.

use ndarray::ArrayView1;

use crate::error::{PcaError, Result};

/// Inclusive-boundary slack for the cumulative-variance comparison, so a
/// share that is exactly the threshold in real arithmetic is not rejected
/// over the last bit of a division.
const CUMULATIVE_SHARE_EPSILON: f64 = 1e-12;

/// Kaiser rule: the number of eigenvalues strictly greater than 1.
///
/// A component earns retention only by explaining more variance than a
/// single standardized variable, which has variance exactly 1.
pub fn kaiser_count(eigenvalues: ArrayView1<f64>) -> usize {
    eigenvalues.iter().filter(|&&lambda| lambda > 1.0).count()
}

/// Cumulative-variance rule: the smallest number of leading components
/// whose cumulative variance share reaches `tau`.
///
/// Shares are taken against the sum of the supplied eigenvalues; the
/// boundary is inclusive. Eigenvalues are assumed descending, as produced
/// by [`crate::fit`].
///
/// # Errors
/// Returns `InvalidInput` for an empty eigenvalue vector or `tau <= 0`, and
/// `UnreachableThreshold` when `tau` exceeds the maximum achievable share
/// (a `tau > 1`, i.e. a caller error).
pub fn variance_threshold_count(eigenvalues: ArrayView1<f64>, tau: f64) -> Result<usize> {
    if eigenvalues.is_empty() {
        return Err(PcaError::InvalidInput(
            "variance threshold rule needs at least one eigenvalue".to_string(),
        ));
    }
    if !tau.is_finite() || tau <= 0.0 {
        return Err(PcaError::InvalidInput(format!(
            "variance threshold must be a positive fraction, got {}",
            tau
        )));
    }

    let total: f64 = eigenvalues.sum();
    if total <= 0.0 {
        return Err(PcaError::InvalidInput(
            "eigenvalues sum to zero; no variance to partition".to_string(),
        ));
    }

    let mut cumulative = 0.0;
    for (k, &lambda) in eigenvalues.iter().enumerate() {
        cumulative += lambda;
        if cumulative / total + CUMULATIVE_SHARE_EPSILON >= tau {
            return Ok(k + 1);
        }
    }
    Err(PcaError::UnreachableThreshold {
        tau,
        max_share: cumulative / total,
    })
}
