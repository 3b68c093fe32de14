//! Error types for the milk-forecast pipeline.

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur anywhere in the forecast pipeline.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// The dataset could not be turned into an observation series.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// The model (or decomposition) could not be fitted.
    #[error("fit error: {0}")]
    Fit(#[from] FitError),

    /// A caller-supplied parameter is out of range.
    #[error("parameter error: {0}")]
    Parameter(#[from] ParameterError),
}

impl ForecastError {
    /// Short name of the error family.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::Load(_) => "LoadError",
            ForecastError::Fit(_) => "FitError",
            ForecastError::Parameter(_) => "ParameterError",
        }
    }
}

/// Failures while reading the dataset or building the series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// The source could not be opened or read.
    #[error("could not read {source_name}: {message}")]
    Io {
        source_name: String,
        message: String,
    },

    /// The source contains no observations.
    #[error("dataset is empty")]
    Empty,

    /// A row could not be parsed as a number.
    #[error("non-numeric value {value:?} at row {row}")]
    NonNumeric { row: usize, value: String },

    /// A row parsed to NaN, infinity or a negative number.
    #[error("invalid value {value} at row {row}: values must be finite and non-negative")]
    InvalidValue { row: usize, value: f64 },

    /// Timestamp-related error.
    #[error("timestamp error: {0}")]
    Timestamp(String),

    /// Timestamps and values disagree in length.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Failures while fitting a model or decomposing a series.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    /// Insufficient data points for the operation.
    #[error("insufficient data: need at least {needed}, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// The optimizer stopped before meeting its tolerance.
    #[error("optimizer did not converge after {iterations} iterations")]
    NotConverged { iterations: usize },

    /// Computation error (e.g., numerical issues).
    #[error("computation error: {0}")]
    Computation(String),

    /// Model has not been fitted yet.
    #[error("model must be fitted before prediction")]
    FitRequired,
}

/// Invalid caller-supplied parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    /// Forecast horizon outside the accepted range.
    #[error("forecast horizon {horizon} is outside [{min}, {max}]")]
    HorizonOutOfRange {
        horizon: usize,
        min: usize,
        max: usize,
    },

    /// Any other invalid parameter value.
    #[error("invalid parameter: {0}")]
    Invalid(String),
}
