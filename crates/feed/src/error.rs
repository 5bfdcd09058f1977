use thiserror::Error;

/// Error type for list-feed operations.
///
/// Everything the remote API says goes through here unchanged; callers decide
/// whether to retry.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Write attempted on an anonymous client
    #[error("not authenticated: writes need an email/password login")]
    NotAuthenticated,
    /// Login rejected (bad credentials, captcha, disabled account)
    #[error("login failed: {0}")]
    Auth(String),
    /// Optimistic concurrency violation (HTTP 409, or 412 on an etag mismatch)
    #[error("conflict: row was modified remotely (HTTP {0}: {1})")]
    Conflict(u16, String),
    /// Insufficient permission (HTTP 403)
    #[error("forbidden: {0}")]
    Forbidden(String),
    /// Any other non-success status
    #[error("HTTP {0}: {1}")]
    Http(u16, String),
    /// Transport error (DNS, TLS, timeout)
    #[error("network error: {0}")]
    Network(String),
    /// Response body was not a feed we understand
    #[error("parse error: {0}")]
    Parse(String),
}

impl FeedError {
    /// HTTP status behind this error, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            FeedError::Conflict(code, _) => Some(*code),
            FeedError::Forbidden(_) => Some(403),
            FeedError::Http(code, _) => Some(*code),
            _ => None,
        }
    }

    pub(crate) fn from_status(status: u16, body: String) -> Self {
        match status {
            409 | 412 => FeedError::Conflict(status, body),
            403 => FeedError::Forbidden(body),
            401 => FeedError::Auth(body),
            _ => FeedError::Http(status, body),
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        FeedError::Network(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(FeedError::from_status(409, "x".into()), FeedError::Conflict(409, _)));
        assert!(matches!(FeedError::from_status(412, "x".into()), FeedError::Conflict(412, _)));
        assert!(matches!(FeedError::from_status(403, "x".into()), FeedError::Forbidden(_)));
        assert!(matches!(FeedError::from_status(401, "x".into()), FeedError::Auth(_)));
        assert!(matches!(FeedError::from_status(500, "x".into()), FeedError::Http(500, _)));
    }

    #[test]
    fn test_status_roundtrip() {
        assert_eq!(FeedError::from_status(409, String::new()).status(), Some(409));
        assert_eq!(FeedError::from_status(412, String::new()).status(), Some(412));
        assert_eq!(FeedError::from_status(403, String::new()).status(), Some(403));
        assert_eq!(FeedError::from_status(404, String::new()).status(), Some(404));
        assert_eq!(FeedError::Network("down".into()).status(), None);
    }
}
