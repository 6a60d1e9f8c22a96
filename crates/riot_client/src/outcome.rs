//! Classification of upstream HTTP responses.

use std::time::Duration;

use common::Error;
use reqwest::header::RETRY_AFTER;

use crate::rest::format_reqwest_error;

/// What a single Riot API response means to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpstreamOutcome {
    /// 2xx with the raw body, still to be decoded.
    Success(String),
    /// 404: the resource does not exist. Never retried.
    NotFound,
    /// 403: the key lacks access to this endpoint. Never retried.
    Forbidden,
    /// 429: throttled. Retried after the advertised delay.
    RateLimited { retry_after: Option<Duration> },
    /// Anything else.
    Other { status: u16, body: String },
}

impl UpstreamOutcome {
    pub fn classify(status: u16, retry_after: Option<Duration>, body: String) -> Self {
        match status {
            200..=299 => UpstreamOutcome::Success(body),
            404 => UpstreamOutcome::NotFound,
            403 => UpstreamOutcome::Forbidden,
            429 => UpstreamOutcome::RateLimited { retry_after },
            _ => UpstreamOutcome::Other { status, body },
        }
    }

    /// Read status, `Retry-After` and body off a response.
    pub async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status();
        let retry_after = resp
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_retry_after);

        if status.is_success() {
            let body = resp
                .text()
                .await
                .map_err(|e| Error::Http(format_reqwest_error(&e)))?;
            return Ok(UpstreamOutcome::Success(body));
        }

        let body = resp.text().await.unwrap_or_default();
        Ok(Self::classify(status.as_u16(), retry_after, body))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, UpstreamOutcome::RateLimited { .. })
    }
}

/// `Retry-After` in delta-seconds form. HTTP-date values are not used by Riot
/// and read as absent.
pub fn parse_retry_after(raw: &str) -> Option<Duration> {
    raw.trim().parse::<u64>().ok().map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_statuses() {
        assert_eq!(
            UpstreamOutcome::classify(200, None, "{}".into()),
            UpstreamOutcome::Success("{}".into())
        );
        assert_eq!(
            UpstreamOutcome::classify(404, None, "missing".into()),
            UpstreamOutcome::NotFound
        );
        assert_eq!(
            UpstreamOutcome::classify(403, None, String::new()),
            UpstreamOutcome::Forbidden
        );
        assert_eq!(
            UpstreamOutcome::classify(429, Some(Duration::from_secs(3)), String::new()),
            UpstreamOutcome::RateLimited {
                retry_after: Some(Duration::from_secs(3))
            }
        );
        assert_eq!(
            UpstreamOutcome::classify(503, None, "down".into()),
            UpstreamOutcome::Other {
                status: 503,
                body: "down".into()
            }
        );
    }

    #[test]
    fn test_only_throttling_is_retryable() {
        assert!(UpstreamOutcome::RateLimited { retry_after: None }.is_retryable());
        assert!(!UpstreamOutcome::NotFound.is_retryable());
        assert!(!UpstreamOutcome::Forbidden.is_retryable());
        assert!(!UpstreamOutcome::Other {
            status: 500,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_parse_retry_after() {
        assert_eq!(parse_retry_after("7"), Some(Duration::from_secs(7)));
        assert_eq!(parse_retry_after(" 0 "), Some(Duration::ZERO));
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT"), None);
        assert_eq!(parse_retry_after("-1"), None);
    }
}
