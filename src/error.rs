use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Failures talking to the upstream video API
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("{0}")]
    Network(reqwest::Error),

    #[error("upstream returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("upstream reported an error: {0}")]
    Api(String),

    #[error("malformed upstream response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    /// The request URL carries the API token, so it is stripped before the
    /// error can reach a response body or a log line.
    fn from(err: reqwest::Error) -> Self {
        let err = err.without_url();
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Network(err)
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

impl ProviderError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProviderError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ProviderError::Network(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ProviderError::Status { .. } | ProviderError::Api(_) | ProviderError::Decode(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    MissingParameter(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conversion(String),

    #[error("Failed to search anime: {0}")]
    Search(#[source] ProviderError),

    #[error("Failed to get anime sources: {0}")]
    Sources(#[source] ProviderError),

    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingParameter(_) | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conversion(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Search(e) | AppError::Sources(e) => e.status_code(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status_code(), body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
