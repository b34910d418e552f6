use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("No forecast rows to train on")]
    NoData,

    #[error("Cannot derive day of year from timestamp '{timestamp}'")]
    Timestamp {
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to read training columns: {0}")]
    Column(#[from] PolarsError),

    #[error("Failed to shape predictor matrix")]
    Shape(#[from] ndarray::ShapeError),

    // Needs at least one more row than there are varying predictors
    #[error("Cannot fit {features} varying predictors from {rows} rows")]
    Underdetermined { rows: usize, features: usize },

    #[error("Linear regression fit failed: {0}")]
    Fit(#[from] linfa_linear::LinearError<f64>),
}
