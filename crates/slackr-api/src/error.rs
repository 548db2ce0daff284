use thiserror::Error;

/// Errors returned by [`crate::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(Box<reqwest::Error>),

    /// Non-2xx response. `message` comes from the `{error}` body.
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not logged in")]
    MissingToken,
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(Box::new(e))
    }
}
