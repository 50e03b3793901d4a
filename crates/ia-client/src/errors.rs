use thiserror::Error;

use crate::models::ApiError;

/// InPost Mobile client error types
#[derive(Error, Debug)]
pub enum InPostError {
    #[error("Not logged in - run the SMS login flow (--login) to obtain a refresh token")]
    NotLoggedIn,

    #[error("[{}] {}", .status.as_u16(), .error.error)]
    Api {
        status: reqwest::StatusCode,
        error: ApiError,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Malformed access token: {0}")]
    MalformedAccessToken(String),

    #[error("Config store I/O error: {0}")]
    Store(#[from] std::io::Error),

    #[error("JSON serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl InPostError {
    /// Whether the server rejected the request with the given error code
    pub fn is_api_error(&self, code: &str) -> bool {
        matches!(self, Self::Api { error, .. } if error.error == code)
    }
}

pub type Result<T> = std::result::Result<T, InPostError>;
