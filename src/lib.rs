// Principal component analysis for standardized macroeconomic panels

#![doc = include_str!("../README.md")]

pub mod criteria;
pub mod decomposition;
pub mod error;
pub mod interpret;
pub mod loadings;
pub mod standardize;
pub mod summary;

pub use criteria::{kaiser_count, variance_threshold_count};
pub use decomposition::{fit, fit_many, Decomposition};
pub use error::{PcaError, Result};
pub use interpret::{dominant_variables, interpret_components, ComponentInterpretation};
pub use standardize::StandardizedPanel;
pub use summary::{communality_table, variance_table, CommunalityRow, VarianceRow};

/// Tolerance for the soft standardization precondition: column means must
/// sit within this of 0 and sample standard deviations within this of 1.
pub const DEFAULT_STANDARDIZATION_TOLERANCE: f64 = 1e-6;

/// Default cumulative-variance retention threshold. A policy default, not a
/// mathematical necessity; callers pick their own.
pub const DEFAULT_VARIANCE_THRESHOLD: f64 = 0.80;

/// Default number of dominant variables reported per component.
pub const DEFAULT_TOP_N: usize = 5;
