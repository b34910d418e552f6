use crate::forecast::error::FetchError;
use crate::model::error::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TempcastError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Invalid configuration")]
    Config(#[from] config::ConfigError),
}
