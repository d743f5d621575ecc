//! Plain numeric tables for downstream reporting.
//!
//! The core hands its consumers numbers, not formatting: these rows carry
//! no rounding, locale, or rendering decisions. Serialization to CSV/JSON
//! is the reporting collaborator's job, hence the `Serialize` derives.

use serde::Serialize;

use crate::decomposition::Decomposition;
use crate::error::Result;

/// One row of the eigenvalue/variance table.
#[derive(Debug, Clone, Serialize)]
pub struct VarianceRow {
    /// Zero-based component index.
    pub component: usize,
    pub eigenvalue: f64,
    /// Share of total variance, in percent.
    pub variance_pct: f64,
    /// Cumulative share of total variance, in percent.
    pub cumulative_pct: f64,
}

/// One row of the communality table.
#[derive(Debug, Clone, Serialize)]
pub struct CommunalityRow {
    pub variable: String,
    pub communality: f64,
}

/// Eigenvalue, variance share, and cumulative share per component.
pub fn variance_table(decomposition: &Decomposition) -> Vec<VarianceRow> {
    let ratio = decomposition.explained_variance_ratio();
    let mut cumulative = 0.0;
    decomposition
        .eigenvalues()
        .iter()
        .enumerate()
        .map(|(component, &eigenvalue)| {
            cumulative += ratio[component] * 100.0;
            VarianceRow {
                component,
                eigenvalue,
                variance_pct: ratio[component] * 100.0,
                cumulative_pct: cumulative,
            }
        })
        .collect()
}

/// Per-variable communalities over the first `k_retained` components
/// (`None` means all).
///
/// # Errors
/// Returns `IndexOutOfRange` if `k_retained` exceeds the fitted component
/// count.
pub fn communality_table(
    decomposition: &Decomposition,
    k_retained: Option<usize>,
) -> Result<Vec<CommunalityRow>> {
    let communalities = decomposition.communalities(k_retained)?;
    Ok(decomposition
        .variable_names()
        .iter()
        .zip(communalities.iter())
        .map(|(variable, &communality)| CommunalityRow {
            variable: variable.clone(),
            communality,
        })
        .collect())
}
