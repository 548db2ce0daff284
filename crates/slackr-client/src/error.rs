use slackr_api::ApiError;
use thiserror::Error;

/// Every feature operation fails with one of these. `Display` is the text
/// shown to the user in the error popup.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Rejected before any request was made.
    #[error("{0}")]
    Validation(String),

    /// A write attempted while offline. Carries the action, e.g. "send messages".
    #[error("Cannot {0} while offline")]
    Offline(&'static str),

    /// A read that could be served neither from the network nor from cache.
    #[error("{0}")]
    Unavailable(String),

    #[error("Local store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Not logged in")]
    NotLoggedIn,
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
