use thiserror::Error;

/// Errors that can occur while talking to the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing store configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Store returned error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse store response: {0}")]
    Parse(String),

    #[error("Store returned no record for the insert")]
    EmptyResponse,
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Parse(err.to_string())
        } else {
            StoreError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Parse(err.to_string())
    }
}
