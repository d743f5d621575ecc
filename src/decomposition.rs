//! Eigen-decomposition engine and projection.
//!
//! `fit` diagonalizes a standardized panel through the SVD of the data
//! matrix itself rather than of its covariance matrix: squaring the data
//! into X^T X squares the small singular values too, and the precision lost
//! there is exactly where the trailing components live. With
//! X = U S V^T, the principal axes are the right singular vectors and
//! eigenvalue_k = sigma_k^2 / (n - 1).

use log::{debug, info, warn};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};
use ndarray_linalg::SVDInto;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{PcaError, Result};
use crate::standardize::StandardizedPanel;
use crate::DEFAULT_STANDARDIZATION_TOLERANCE;

/// A fitted PCA model: an orthonormal component basis with the variance
/// each component explains.
///
/// Created once per [`fit`] call and immutable afterwards, so it can be
/// shared freely across threads; every downstream operation (projection,
/// loadings, criteria, interpretation) is a stateless read of this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decomposition {
    /// Orthonormal basis of the variable space.
    /// Shape: (n_variables, k_components); columns are unit-norm and
    /// mutually orthogonal.
    components: Array2<f64>,
    /// Variance of the data projected onto each component, descending.
    /// Shape: (k_components)
    eigenvalues: Array1<f64>,
    /// Column names of the fitted panel, positionally matching rows of
    /// `components`.
    variable_names: Vec<String>,
}

/// Fits a PCA to a standardized panel.
///
/// `k_requested = None` keeps every achievable component, i.e.
/// K = min(observations, variables).
///
/// The sign of each component is pinned so that its loading of largest
/// absolute magnitude is positive (lowest variable index wins ties). The
/// underlying solver is free to hand back either orientation of an
/// eigenvector, and without a fixed convention repeated runs are not
/// comparable.
///
/// Columns drifting outside the standardization tolerance are a soft
/// precondition violation: the fit proceeds with a warning. Call
/// [`StandardizedPanel::verify`] first to make it hard.
///
/// # Errors
/// Returns `InvalidInput` if the panel has fewer than 2 observations or
/// `k_requested` is 0 or exceeds min(observations, variables); `Backend` if
/// the LAPACK SVD fails. Non-finite values are rejected at panel
/// construction.
pub fn fit(panel: &StandardizedPanel, k_requested: Option<usize>) -> Result<Decomposition> {
    let n_observations = panel.n_observations();
    let n_variables = panel.n_variables();

    if n_observations < 2 {
        return Err(PcaError::InvalidInput(format!(
            "fit needs at least 2 observations, got {}",
            n_observations
        )));
    }

    let max_rank = n_observations.min(n_variables);
    let k = k_requested.unwrap_or(max_rank);
    if k == 0 || k > max_rank {
        return Err(PcaError::InvalidInput(format!(
            "requested {} components, achievable rank is 1..={}",
            k, max_rank
        )));
    }

    if let Err(drift) = panel.verify(DEFAULT_STANDARDIZATION_TOLERANCE) {
        warn!("{}; results may be unreliable", drift);
    }

    let (_, singular_values, vt) = panel
        .matrix()
        .to_owned()
        .svd_into(false, true)
        .map_err(|e| PcaError::Backend(format!("SVD of panel failed: {}", e)))?;
    let vt = vt.ok_or_else(|| {
        PcaError::Backend("SVD did not return right singular vectors".to_string())
    })?;

    // LAPACK returns singular values in descending order; keeping that
    // solver order is the documented tie-break.
    let mut components = vt.slice_axis(Axis(0), ndarray::Slice::from(0..k)).t().to_owned();
    let eigenvalues = singular_values
        .slice(ndarray::s![..k])
        .mapv(|s| (s * s / (n_observations - 1) as f64).max(0.0));

    fix_component_signs(&mut components);

    debug!(
        "leading eigenvalue {:.6}, trailing kept eigenvalue {:.6}",
        eigenvalues[0],
        eigenvalues[k - 1]
    );
    info!(
        "fitted PCA: {} components from {} observations x {} variables",
        k, n_observations, n_variables
    );

    Ok(Decomposition {
        components,
        eigenvalues,
        variable_names: panel.variables().to_vec(),
    })
}

/// Fits independent panels in parallel.
///
/// Each fit is a pure function of its panel, so the only coordination is
/// rayon's join; results come back in input order.
pub fn fit_many(
    panels: &[StandardizedPanel],
    k_requested: Option<usize>,
) -> Vec<Result<Decomposition>> {
    panels
        .par_iter()
        .map(|panel| fit(panel, k_requested))
        .collect()
}

/// Makes the largest-magnitude entry of each component column positive.
fn fix_component_signs(components: &mut Array2<f64>) {
    for mut column in components.columns_mut() {
        let mut pivot = 0;
        let mut pivot_abs = 0.0_f64;
        for (j, &v) in column.iter().enumerate() {
            // Strictly greater, so the first index wins ties.
            if v.abs() > pivot_abs {
                pivot = j;
                pivot_abs = v.abs();
            }
        }
        if column[pivot] < 0.0 {
            column.mapv_inplace(|v| -v);
        }
    }
}

impl Decomposition {
    /// Builds a decomposition from precomputed parts, e.g. a model fitted
    /// elsewhere.
    ///
    /// Dimensions and eigenvalue sanity are validated; orthonormality of
    /// `components` is the caller's claim.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the parts are inconsistent (see
    /// [`load`]).
    ///
    /// [`load`]: Decomposition::load
    pub fn from_parts(
        components: Array2<f64>,
        eigenvalues: Array1<f64>,
        variable_names: Vec<String>,
    ) -> Result<Self> {
        let model = Self {
            components,
            eigenvalues,
            variable_names,
        };
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        if self.eigenvalues.len() != self.components.ncols() {
            return Err(PcaError::InvalidInput(format!(
                "{} eigenvalues for {} components",
                self.eigenvalues.len(),
                self.components.ncols()
            )));
        }
        if self.variable_names.len() != self.components.nrows() {
            return Err(PcaError::InvalidInput(format!(
                "{} variable names for {} component rows",
                self.variable_names.len(),
                self.components.nrows()
            )));
        }
        if self.components.iter().any(|&v| !v.is_finite()) {
            return Err(PcaError::InvalidInput(
                "components contain non-finite values".to_string(),
            ));
        }
        if self.eigenvalues.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return Err(PcaError::InvalidInput(
                "eigenvalues are non-finite or negative".to_string(),
            ));
        }
        if self
            .eigenvalues
            .windows(2)
            .into_iter()
            .any(|pair| pair[0] < pair[1])
        {
            return Err(PcaError::InvalidInput(
                "eigenvalues are not in descending order".to_string(),
            ));
        }
        Ok(())
    }

    /// Orthonormal component basis, shape (n_variables, k_components).
    pub fn components(&self) -> ArrayView2<f64> {
        self.components.view()
    }

    /// Component variances, descending, shape (k_components).
    pub fn eigenvalues(&self) -> ArrayView1<f64> {
        self.eigenvalues.view()
    }

    /// Column names of the fitted panel.
    pub fn variable_names(&self) -> &[String] {
        &self.variable_names
    }

    pub fn n_variables(&self) -> usize {
        self.components.nrows()
    }

    pub fn n_components(&self) -> usize {
        self.components.ncols()
    }

    /// Share of total variance explained by each component.
    ///
    /// Total variance is the full trace of the panel's correlation matrix,
    /// i.e. the number of variables for standardized data, so the shares
    /// sum to 1 only when every component was kept.
    pub fn explained_variance_ratio(&self) -> Array1<f64> {
        &self.eigenvalues / self.n_variables() as f64
    }

    /// Projects a standardized matrix onto the retained components.
    ///
    /// On the fitting matrix itself, the column-wise sample variances of
    /// the scores equal the eigenvalues.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if `matrix` does not have the fitted
    /// variable count.
    pub fn transform(&self, matrix: ArrayView2<f64>) -> Result<Array2<f64>> {
        if matrix.ncols() != self.n_variables() {
            return Err(PcaError::DimensionMismatch {
                expected: self.n_variables(),
                actual: matrix.ncols(),
            });
        }
        Ok(matrix.dot(&self.components))
    }

    /// Saves the decomposition to a file with bincode.
    ///
    /// # Errors
    /// Returns `Io` on file errors and `Serialization` on encoding errors.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let mut writer = BufWriter::new(file);
        bincode::serde::encode_into_std_write(self, &mut writer, bincode::config::standard())
            .map_err(|e| PcaError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Loads a decomposition previously written by [`save`].
    ///
    /// # Errors
    /// Returns `Io`/`Serialization` on read failures, and `InvalidInput` if
    /// the decoded model is internally inconsistent (mismatched dimensions,
    /// negative, non-finite, or non-descending eigenvalues).
    ///
    /// [`save`]: Decomposition::save
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let model: Decomposition =
            bincode::serde::decode_from_std_read(&mut reader, bincode::config::standard())
                .map_err(|e| PcaError::Serialization(e.to_string()))?;
        model.validate()?;
        Ok(model)
    }
}
