//! Loadings and communalities.
//!
//! A loading l_jk = v_jk * sqrt(lambda_k) is the correlation between
//! original variable j and component k when the input panel is
//! standardized. The communality h2_j sums the squared loadings of a
//! variable across the retained components: the fraction of that variable's
//! unit variance the retained basis reconstructs.

use ndarray::{Array1, Array2, Axis};

use crate::decomposition::Decomposition;
use crate::error::{PcaError, Result};

impl Decomposition {
    /// Variable-to-component loading matrix, shape (n_variables,
    /// n_components). Recomputed on demand; nothing is cached.
    pub fn loadings(&self) -> Array2<f64> {
        let scale = self.eigenvalues().mapv(f64::sqrt);
        &self.components() * &scale
    }

    /// Per-variable explained-variance shares over the first `k_retained`
    /// components (`None` means all).
    ///
    /// With every component retained each entry is 1.0 up to floating
    /// tolerance, since the complete basis reconstructs the full unit
    /// variance of a standardized variable.
    ///
    /// # Errors
    /// Returns `IndexOutOfRange` if `k_retained` exceeds the number of
    /// fitted components.
    pub fn communalities(&self, k_retained: Option<usize>) -> Result<Array1<f64>> {
        let k = k_retained.unwrap_or(self.n_components());
        if k > self.n_components() {
            return Err(PcaError::IndexOutOfRange(format!(
                "retention count {} exceeds {} fitted components",
                k,
                self.n_components()
            )));
        }
        let loadings = self.loadings();
        let retained = loadings.slice_axis(Axis(1), ndarray::Slice::from(0..k));
        Ok(retained.mapv(|l| l * l).sum_axis(Axis(1)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decomposition::fit;
    use crate::standardize::StandardizedPanel;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn fitted() -> Decomposition {
        let raw = array![
            [1.0, 2.2, 0.5],
            [2.0, 4.1, 0.9],
            [3.0, 5.8, 0.2],
            [4.0, 8.3, 1.1],
            [5.0, 9.7, 0.4]
        ];
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let panel = StandardizedPanel::from_raw(raw.view(), names).unwrap();
        fit(&panel, None).unwrap()
    }

    #[test]
    fn loadings_follow_the_scaling_formula() {
        let dec = fitted();
        let loadings = dec.loadings();
        for k in 0..dec.n_components() {
            let scale = dec.eigenvalues()[k].sqrt();
            for j in 0..dec.n_variables() {
                assert_abs_diff_eq!(
                    loadings[[j, k]],
                    dec.components()[[j, k]] * scale,
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn full_retention_recovers_unit_communalities() {
        let dec = fitted();
        let h2 = dec.communalities(None).unwrap();
        for &value in h2.iter() {
            assert_abs_diff_eq!(value, 1.0, epsilon = 1e-8);
        }
    }

    #[test]
    fn partial_retention_stays_below_one() {
        let dec = fitted();
        let h2 = dec.communalities(Some(1)).unwrap();
        let full = dec.communalities(None).unwrap();
        for j in 0..dec.n_variables() {
            assert!(h2[j] <= full[j] + 1e-12);
            assert!(h2[j] >= 0.0);
        }
    }

    #[test]
    fn oversized_retention_is_rejected() {
        let dec = fitted();
        assert!(matches!(
            dec.communalities(Some(dec.n_components() + 1)),
            Err(PcaError::IndexOutOfRange(_))
        ));
    }
}
