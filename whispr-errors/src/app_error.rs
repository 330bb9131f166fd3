use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Not authenticated")]
    Unauthorized,

    #[error("Account is muffled")]
    Muffled,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Vote already in flight")]
    VotePending,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Recovers an error that crossed the server function boundary as its display string.
impl FromStr for AppError {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = if let Some(msg) = s.strip_prefix("Network error: ") {
            AppError::Network(msg.to_string())
        } else if s == "Request timeout" {
            AppError::Timeout
        } else if s == "Not authenticated" {
            AppError::Unauthorized
        } else if s == "Account is muffled" {
            AppError::Muffled
        } else if let Some(msg) = s.strip_prefix("Forbidden: ") {
            AppError::Forbidden(msg.to_string())
        } else if let Some(msg) = s.strip_prefix("Not found: ") {
            AppError::NotFound(msg.to_string())
        } else if let Some(msg) = s.strip_prefix("Conflict: ") {
            AppError::Conflict(msg.to_string())
        } else if let Some(msg) = s.strip_prefix("Bad request: ") {
            AppError::BadRequest(msg.to_string())
        } else if s == "Vote already in flight" {
            AppError::VotePending
        } else if let Some(msg) = s.strip_prefix("Configuration error: ") {
            AppError::Config(msg.to_string())
        } else if let Some(msg) = s.strip_prefix("Internal error: ") {
            AppError::Internal(msg.to_string())
        } else {
            AppError::Internal(s.to_string())
        };
        Ok(err)
    }
}

impl AppError {
    /// Maps a backend HTTP status and its `detail` text onto the taxonomy.
    pub fn from_status(status: u16, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        match status {
            400 => Self::BadRequest(detail),
            401 => Self::Unauthorized,
            403 if detail.to_lowercase().contains("muffled") => Self::Muffled,
            403 => Self::Forbidden(detail),
            404 => Self::NotFound(detail),
            408 | 504 => Self::Timeout,
            409 => Self::Conflict(detail),
            502 | 503 => Self::Network(detail),
            _ => Self::Internal(detail),
        }
    }

    pub fn user_message(&self) -> &str {
        match self {
            Self::Network(_) => "Could not reach Whispr. Check your connection.",
            Self::Timeout => "The request took too long. Please try again.",
            Self::Unauthorized => "Log in to continue.",
            Self::Muffled => "Verify your student email to unlock posting and voting.",
            Self::Forbidden(_) => "You are not allowed to do that.",
            Self::NotFound(_) => "That content no longer exists.",
            Self::Conflict(_) => "Your view was out of date and has been refreshed.",
            Self::BadRequest(_) => "That request was not accepted.",
            Self::VotePending => "Hold on, your last vote is still being saved.",
            Self::Config(_) | Self::Internal(_) => "Something went wrong on our side.",
        }
    }

    /// Toast text for a failed vote action.
    pub fn vote_failure_message(&self) -> &str {
        match self {
            Self::Unauthorized => "Log in to vote.",
            Self::Muffled => self.user_message(),
            Self::VotePending => self.user_message(),
            // The backend explains rejected votes, e.g. on the voter's own content.
            Self::BadRequest(detail) if !detail.is_empty() => detail,
            _ => "Failed to vote, please try again",
        }
    }

    pub fn is_recoverable_by_resync(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Unauthorized | Self::Muffled)
    }
}

#[cfg(feature = "ssr")]
mod ssr_impl {
    use super::AppError;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;

    #[derive(serde::Serialize)]
    struct ErrorResponse {
        detail: String,
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = match &self {
                AppError::Network(_) => StatusCode::BAD_GATEWAY,
                AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                AppError::Unauthorized => StatusCode::UNAUTHORIZED,
                AppError::Muffled | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::Conflict(_) | AppError::VotePending => StatusCode::CONFLICT,
                AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
                AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            let detail = self.to_string();
            (status, Json(ErrorResponse { detail })).into_response()
        }
    }
}
