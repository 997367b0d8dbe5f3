use chrono::{DateTime, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GithubError>;

/// Failure categories returned by the GitHub transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GithubError {
    /// HTTP 404 for a user or repository.
    #[error("{0}")]
    NotFound(String),
    /// HTTP 403 with `X-RateLimit-Remaining: 0`.
    #[error("Rate limit exceeded. Reset time: {}", .reset.as_deref().unwrap_or("None"))]
    RateLimitExceeded { reset: Option<String> },
    /// Any other status, a timeout, a network failure or an undecodable body.
    #[error("{0}")]
    Api(String),
}

impl GithubError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GithubError::RateLimitExceeded { .. })
    }

    /// When the quota resets, if this is a rate-limit error carrying an epoch timestamp.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        match self {
            GithubError::RateLimitExceeded { reset: Some(reset) } => reset
                .trim()
                .parse::<i64>()
                .ok()
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rate_limit_message_includes_reset() {
        let err = GithubError::RateLimitExceeded {
            reset: Some("1640995200".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded. Reset time: 1640995200"
        );

        let err = GithubError::RateLimitExceeded { reset: None };
        assert_eq!(err.to_string(), "Rate limit exceeded. Reset time: None");
    }

    #[test]
    fn reset_at_parses_epoch_seconds() {
        let err = GithubError::RateLimitExceeded {
            reset: Some("1640995200".to_string()),
        };
        let at = err.reset_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2022-01-01T00:00:00+00:00");
    }

    #[test]
    fn reset_at_rejects_garbage_and_other_variants() {
        let err = GithubError::RateLimitExceeded {
            reset: Some("soon".to_string()),
        };
        assert!(err.reset_at().is_none());
        assert!(GithubError::Api("boom".into()).reset_at().is_none());
        assert!(!GithubError::NotFound("x".into()).is_rate_limited());
    }
}
