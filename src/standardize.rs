//! Standardized panel provider: z-score scaling and precondition checks.
//!
//! The PCA engine consumes an observations x variables matrix whose columns
//! are mean-centered and unit-scaled. [`StandardizedPanel`] owns that matrix
//! together with the column names, and is borrowed read-only by every
//! downstream stage.

use log::warn;
use ndarray::{Array2, ArrayView2, Axis};

use crate::error::{PcaError, Result};

/// Standard deviations below this are treated as zero and sanitized to 1.0
/// so constant columns do not blow up the scaling.
const SCALE_SANITIZATION_THRESHOLD: f64 = 1e-9;

/// An observations x variables matrix with named, standardized columns.
///
/// Invariant: each column has sample mean ~ 0 and sample standard deviation
/// (ddof = 1) ~ 1, within [`crate::DEFAULT_STANDARDIZATION_TOLERANCE`].
/// Immutable once constructed.
#[derive(Debug, Clone)]
pub struct StandardizedPanel {
    matrix: Array2<f64>,
    variables: Vec<String>,
}

impl StandardizedPanel {
    /// Wraps an already-standardized matrix.
    ///
    /// Validates shape and finiteness only; standardization itself is the
    /// caller's claim, checked softly at fit time or hard via [`verify`].
    ///
    /// [`verify`]: StandardizedPanel::verify
    ///
    /// # Errors
    /// Returns `InvalidInput` if the matrix has zero rows or columns, the
    /// number of names differs from the number of columns, or any entry is
    /// non-finite.
    pub fn new(matrix: Array2<f64>, variables: Vec<String>) -> Result<Self> {
        if matrix.nrows() == 0 || matrix.ncols() == 0 {
            return Err(PcaError::InvalidInput(
                "panel has zero observations or zero variables".to_string(),
            ));
        }
        if variables.len() != matrix.ncols() {
            return Err(PcaError::InvalidInput(format!(
                "{} variable names for {} columns",
                variables.len(),
                matrix.ncols()
            )));
        }
        if matrix.iter().any(|v| !v.is_finite()) {
            return Err(PcaError::InvalidInput(
                "panel contains non-finite values".to_string(),
            ));
        }
        Ok(Self { matrix, variables })
    }

    /// Z-score standardizes a raw panel: each column is mean-centered and
    /// divided by its sample standard deviation (ddof = 1).
    ///
    /// Columns with near-zero standard deviation are left centered but
    /// unscaled (scale sanitized to 1.0), with a warning, since a constant
    /// variable carries no variance to analyze.
    ///
    /// # Errors
    /// Returns `InvalidInput` under the same conditions as [`new`], or if
    /// the panel has fewer than 2 observations (sample variance undefined).
    ///
    /// [`new`]: StandardizedPanel::new
    pub fn from_raw(raw: ArrayView2<f64>, variables: Vec<String>) -> Result<Self> {
        if raw.nrows() < 2 {
            return Err(PcaError::InvalidInput(format!(
                "standardization needs at least 2 observations, got {}",
                raw.nrows()
            )));
        }
        let mut matrix = raw.to_owned();
        let mean_vector = matrix
            .mean_axis(Axis(0))
            .ok_or_else(|| PcaError::InvalidInput("failed to compute column means".to_string()))?;
        matrix -= &mean_vector;

        let std_vector = matrix.map_axis(Axis(0), |column| column.std(1.0));
        let scale_vector = std_vector.mapv(|s| {
            if s.is_finite() && s.abs() > SCALE_SANITIZATION_THRESHOLD {
                s
            } else {
                1.0
            }
        });
        for (j, (&s, name)) in std_vector.iter().zip(&variables).enumerate() {
            if !(s.is_finite() && s.abs() > SCALE_SANITIZATION_THRESHOLD) {
                warn!(
                    "column {} ('{}') has near-zero standard deviation; left unscaled",
                    j, name
                );
            }
        }
        matrix /= &scale_vector;

        Self::new(matrix, variables)
    }

    /// The standardized matrix, observations x variables.
    pub fn matrix(&self) -> ArrayView2<f64> {
        self.matrix.view()
    }

    /// Column names, positionally matching the matrix.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn n_observations(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn n_variables(&self) -> usize {
        self.matrix.ncols()
    }

    /// Hard form of the standardization precondition.
    ///
    /// # Errors
    /// Returns `NotStandardized` for the first column whose mean or sample
    /// standard deviation drifts outside `tolerance`.
    pub fn verify(&self, tolerance: f64) -> Result<()> {
        for (j, column) in self.matrix.axis_iter(Axis(1)).enumerate() {
            let mean = column.mean().unwrap_or(0.0);
            let std = column.std(1.0);
            if mean.abs() > tolerance || (std - 1.0).abs() > tolerance {
                return Err(PcaError::NotStandardized {
                    variable: self.variables[j].clone(),
                    mean,
                    std,
                    tolerance,
                });
            }
        }
        Ok(())
    }

    /// Pearson correlation matrix of the panel.
    ///
    /// For standardized columns this is X^T X / (n - 1), which doubles as
    /// the covariance matrix the decomposition diagonalizes.
    pub fn correlation_matrix(&self) -> Array2<f64> {
        let n = self.matrix.nrows() as f64;
        self.matrix.t().dot(&self.matrix) / (n - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn names(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn from_raw_centers_and_scales() {
        let raw = array![[1.0, 10.0], [2.0, 30.0], [3.0, 20.0], [4.0, 40.0]];
        let panel = StandardizedPanel::from_raw(raw.view(), names(&["a", "b"])).unwrap();

        for column in panel.matrix().axis_iter(Axis(1)) {
            assert_abs_diff_eq!(column.mean().unwrap(), 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(column.std(1.0), 1.0, epsilon = 1e-12);
        }
        assert!(panel.verify(1e-6).is_ok());
    }

    #[test]
    fn constant_column_is_sanitized() {
        let raw = array![[5.0, 1.0], [5.0, 2.0], [5.0, 3.0]];
        let panel = StandardizedPanel::from_raw(raw.view(), names(&["flat", "x"])).unwrap();
        // Constant column ends up all zeros rather than NaN.
        assert!(panel.matrix().column(0).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn verify_rejects_unscaled_data() {
        let matrix = array![[10.0, 0.1], [20.0, -0.1], [30.0, 0.0]];
        let panel = StandardizedPanel::new(matrix, names(&["big", "small"])).unwrap();
        let err = panel.verify(1e-6).unwrap_err();
        assert!(matches!(err, PcaError::NotStandardized { .. }));
    }

    #[test]
    fn new_rejects_non_finite_and_bad_shapes() {
        let matrix = array![[1.0, f64::NAN], [2.0, 3.0]];
        assert!(StandardizedPanel::new(matrix, names(&["a", "b"])).is_err());

        let matrix = array![[1.0, 2.0], [3.0, 4.0]];
        assert!(StandardizedPanel::new(matrix, names(&["only_one"])).is_err());
    }

    #[test]
    fn correlation_matrix_has_unit_diagonal() {
        let raw = array![
            [1.0, 2.0, 1.5],
            [2.0, 4.1, 2.9],
            [3.0, 5.9, 4.6],
            [4.0, 8.2, 6.1]
        ];
        let panel = StandardizedPanel::from_raw(raw.view(), names(&["a", "b", "c"])).unwrap();
        let corr = panel.correlation_matrix();
        for j in 0..3 {
            assert_abs_diff_eq!(corr[[j, j]], 1.0, epsilon = 1e-10);
        }
        assert_abs_diff_eq!(corr[[0, 1]], corr[[1, 0]], epsilon = 1e-12);
    }
}
