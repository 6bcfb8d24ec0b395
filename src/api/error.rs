//! Error taxonomy shared by the platform adapters

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// YouTube reasons that mean the daily quota is spent
const QUOTA_REASONS: &[&str] = &["quotaExceeded", "dailyLimitExceeded"];

/// Failure of a platform fetch
#[derive(Error, Debug)]
pub enum FetchError {
    /// Missing or malformed credentials; raised before any request is sent
    #[error("{0}")]
    Configuration(String),

    /// Token acquisition was rejected
    #[error("{0}")]
    Auth(String),

    #[error("Quota exceeded (403): {message}")]
    QuotaExceeded { message: String },

    #[error("Access forbidden (403): {message}")]
    AccessForbidden {
        reason: Option<String>,
        message: String,
    },

    #[error("Bad request (400): {message}")]
    BadRequest { message: String },

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Anything unexpected, carrying the upstream message
    #[error("{0}")]
    Platform(String),
}

impl FetchError {
    /// HTTP status behind this error, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::QuotaExceeded { .. } | FetchError::AccessForbidden { .. } => Some(403),
            FetchError::BadRequest { .. } => Some(400),
            FetchError::Http { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// True for a 403 caused by the YouTube Data API not being enabled
    pub fn is_access_not_configured(&self) -> bool {
        matches!(
            self,
            FetchError::AccessForbidden { reason: Some(r), .. } if r == "accessNotConfigured"
        )
    }

    /// Classify a non-success YouTube response from its status and body
    pub(crate) fn from_youtube_response(status: StatusCode, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let message = envelope
            .as_ref()
            .and_then(|e| e.error.message.clone())
            .unwrap_or_else(|| status.to_string());
        let reasons: Vec<String> = envelope
            .map(|e| e.error.errors.into_iter().filter_map(|d| d.reason).collect())
            .unwrap_or_default();

        match status {
            StatusCode::FORBIDDEN => {
                if reasons.iter().any(|r| QUOTA_REASONS.contains(&r.as_str())) {
                    FetchError::QuotaExceeded { message }
                } else {
                    FetchError::AccessForbidden {
                        reason: reasons.into_iter().next(),
                        message,
                    }
                }
            }
            StatusCode::BAD_REQUEST => FetchError::BadRequest { message },
            status => FetchError::Http {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Human-readable guidance for a failed YouTube fetch
    pub fn user_message(&self) -> String {
        match self {
            FetchError::Configuration(msg) => msg.clone(),
            FetchError::QuotaExceeded { .. } => {
                "YouTube API quota exceeded. Please try again later or contact the administrator."
                    .to_string()
            }
            FetchError::AccessForbidden { .. } if self.is_access_not_configured() => {
                "YouTube Data API v3 is not enabled for this project. \
                 Enable it in the Google Cloud Console and try again."
                    .to_string()
            }
            FetchError::AccessForbidden { .. } => {
                "YouTube API access forbidden. Your API key may be invalid or the \
                 YouTube Data API may not be enabled for your project."
                    .to_string()
            }
            FetchError::BadRequest { .. } => {
                "Bad request to YouTube API. Please check your API configuration.".to_string()
            }
            _ => "Failed to fetch YouTube data. Please try again later.".to_string(),
        }
    }
}

// =============================================================================
// Google API error envelope
// =============================================================================

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}
