//! Seasonal decomposition.
//!
//! Classical moving-average decomposition into trend, seasonal and residual
//! components, additive or multiplicative.

mod classical;

pub use classical::{DecompositionModel, DecompositionResult, SeasonalDecomposition};
