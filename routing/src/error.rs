use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the directions provider, one per user-facing outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectionsError {
    #[error("invalid request data, check the coordinates")]
    InvalidRequest,
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("no route found between the points")]
    NotFound,
    #[error("failed to fetch route: {0}")]
    Transport(String),
    #[error("failed to read route response: {0}")]
    InvalidResponse(String),
}

impl DirectionsError {
    /// `None` for success statuses.
    pub fn from_status(status: StatusCode) -> Option<Self> {
        match status {
            s if s.is_success() => None,
            StatusCode::BAD_REQUEST => Some(Self::InvalidRequest),
            StatusCode::UNAUTHORIZED => Some(Self::InvalidApiKey),
            StatusCode::NOT_FOUND => Some(Self::NotFound),
            other => Some(Self::Transport(format!("HTTP {other}"))),
        }
    }
}

impl From<reqwest::Error> for DirectionsError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("geocoding service answered HTTP {0}")]
    Status(StatusCode),
    #[error("geocoding service returned an unusable position: {0}")]
    InvalidPosition(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("ORS_API_KEY environment variable not set")]
    MissingApiKey,
    #[error("invalid provider base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
