use thiserror::Error;

/// Failure of a single fetch operation. Kept per resource in the view state, so it
/// must be cheap to clone and compare.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("rate limit exceeded before the request deadline")]
    RateLimitExceeded,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("request canceled: deadline exceeded")]
    Canceled,

    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// Whether another attempt could plausibly succeed within the same deadline.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            FetchError::Canceled | FetchError::RateLimitExceeded | FetchError::TaskFailed(_)
        )
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if err.is_timeout() {
            FetchError::Canceled
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Decode(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Azure DevOps request failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Invalid access token: {0}")]
    InvalidToken(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
