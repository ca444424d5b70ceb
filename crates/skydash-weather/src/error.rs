//! Forecast pipeline error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Connection failure or retryable status that outlived every attempt
    #[error("Transient failure after {attempts} attempt(s): {reason}")]
    Transient {
        attempts: u32,
        status: Option<u16>,
        reason: String,
    },

    /// Non-retryable HTTP status (4xx and anything else outside the retry set)
    #[error("Request rejected with HTTP {status}")]
    Rejected { status: u16 },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl FetchError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidCoordinate(_) => "Invalid location selected".to_string(),
            Self::Transient { .. } => {
                "Weather service is unavailable. Please try again later.".to_string()
            }
            Self::Rejected { status } => format!("Weather request was rejected ({})", status),
            Self::Parse(_) => "Weather service sent an unexpected response".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }

    /// HTTP status involved in the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transient { status, .. } => *status,
            Self::Rejected { status } => Some(*status),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether asking again later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
