use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read response body from {0}")]
    ResponseBody(String, #[source] reqwest::Error),

    #[error("Forecast response is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    // Well-formed JSON, but an entry lacks one of the read fields or has the wrong type
    #[error("Forecast entry has an unexpected shape")]
    EntryShape(#[source] serde_json::Error),

    // The upstream answered 2xx but without a forecast list
    #[error("Forecast response has no 'list' key ({})", .message.as_deref().unwrap_or("no message"))]
    MissingList { message: Option<String> },

    #[error("Failed to build forecast DataFrame")]
    DataFrame(#[from] PolarsError),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Data => FetchError::EntryShape(err),
            _ => FetchError::InvalidJson(err),
        }
    }
}
