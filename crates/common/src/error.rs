//! Unified error type for lolstats.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limit exceeded after {attempts} attempts")]
    RateLimitExceeded { attempts: u32 },

    #[error("Riot API error (status={status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Unknown region: {0}")]
    UnknownRegion(String),

    #[error("Invalid Riot ID: {0}")]
    InvalidRiotId(String),

    #[error("Match cache error: {0}")]
    Cache(String),
}

impl Error {
    /// Stable machine-readable code for the hosting layer.
    pub fn code(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "NOT_FOUND",
            Error::RateLimitExceeded { .. } => "RATE_LIMITED",
            Error::Forbidden(_) => "FORBIDDEN",
            Error::InvalidRiotId(_) | Error::UnknownRegion(_) => "BAD_REQUEST",
            _ => "INTERNAL",
        }
    }

    /// HTTP status the hosting layer should answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::RateLimitExceeded { .. } => 429,
            Error::Forbidden(_) => 403,
            Error::InvalidRiotId(_) | Error::UnknownRegion(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to show to an end user.
    pub fn user_message(&self) -> String {
        match self {
            Error::NotFound(_) => "Summoner not found. Check the name and region.".into(),
            Error::RateLimitExceeded { .. } => {
                "Too many requests. Please try again in a moment.".into()
            }
            Error::Forbidden(_) => "API access restricted. The API key may have expired.".into(),
            Error::InvalidRiotId(_) | Error::UnknownRegion(_) => self.to_string(),
            _ => "Something went wrong. Please try again later.".into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, Error::Forbidden(_))
    }
}
