use thiserror::Error;

use triform_core::ValidationError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelFitError {
    #[error("Can't fit null model for {scope}: no control bins")]
    InsufficientData { scope: String },

    #[error("Can't fit null model for {scope}: control counts have zero variance (all bins = {value})")]
    ZeroVariance { scope: String, value: f64 },

    #[error("Can't fit null model for {scope}: {reason}")]
    InvalidParameters { scope: String, reason: String },
}

#[derive(Error, Debug)]
pub enum TriformError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ModelFit(#[from] ModelFitError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Invalid p-value at index {index}: {value}")]
    InvalidPValue { index: usize, value: f64 },

    #[error("Can't build thread pool: {0}")]
    ThreadPool(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}
