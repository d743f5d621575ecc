//! Economic interpretation of fitted components.
//!
//! A latent component is labeled by looking at which original variables
//! load on it most strongly; the sign of a loading carries the direction of
//! association, so it is preserved in the ranking output.

use serde::Serialize;

use crate::decomposition::Decomposition;
use crate::error::{PcaError, Result};

/// The dominant-variable profile of one component, ready for reporting.
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInterpretation {
    /// Zero-based component index.
    pub component: usize,
    /// Share of total variance explained by this component, in percent.
    pub variance_pct: f64,
    /// Top variables by absolute loading, signs preserved.
    pub dominant: Vec<(String, f64)>,
}

/// The `top_n` variables of one component, ranked by descending absolute
/// loading with the signed value preserved. Ties keep the original
/// variable order, so the ranking is deterministic.
///
/// # Errors
/// Returns `IndexOutOfRange` if `component_index` is not a fitted component
/// or `top_n` exceeds the number of variables.
pub fn dominant_variables(
    decomposition: &Decomposition,
    component_index: usize,
    top_n: usize,
) -> Result<Vec<(String, f64)>> {
    if component_index >= decomposition.n_components() {
        return Err(PcaError::IndexOutOfRange(format!(
            "component {} of {} fitted components",
            component_index,
            decomposition.n_components()
        )));
    }
    if top_n > decomposition.n_variables() {
        return Err(PcaError::IndexOutOfRange(format!(
            "top_n {} exceeds {} variables",
            top_n,
            decomposition.n_variables()
        )));
    }

    let loadings = decomposition.loadings();
    let column = loadings.column(component_index);
    let mut ranked: Vec<(String, f64)> = decomposition
        .variable_names()
        .iter()
        .zip(column.iter())
        .map(|(name, &loading)| (name.clone(), loading))
        .collect();
    // Stable sort: equal magnitudes keep first-declared variable order.
    ranked.sort_by(|a, b| {
        b.1.abs()
            .partial_cmp(&a.1.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(top_n);
    Ok(ranked)
}

/// Dominant-variable profiles for the first `max_components` components
/// (capped at the fitted count), each paired with its variance share.
///
/// # Errors
/// Returns `IndexOutOfRange` if `top_n` exceeds the number of variables.
pub fn interpret_components(
    decomposition: &Decomposition,
    top_n: usize,
    max_components: usize,
) -> Result<Vec<ComponentInterpretation>> {
    let ratio = decomposition.explained_variance_ratio();
    let count = max_components.min(decomposition.n_components());
    let mut interpretations = Vec::with_capacity(count);
    for component in 0..count {
        interpretations.push(ComponentInterpretation {
            component,
            variance_pct: ratio[component] * 100.0,
            dominant: dominant_variables(decomposition, component, top_n)?,
        });
    }
    Ok(interpretations)
}
