#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Base URL cannot carry a path: {0}")]
    BaseUrl(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Message shown to the user when deleting a post fails with this error.
    /// A rejection from the server reads differently from a request that
    /// never completed.
    pub fn delete_failure_message(&self) -> &'static str {
        match self {
            ApiError::Status { .. } => "Could not delete the post.",
            _ => "An unexpected error occurred.",
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
