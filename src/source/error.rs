//! Errors at the snapshot retrieval boundary.

use thiserror::Error;

/// Why a feed cycle produced no report.
///
/// Every variant means "snapshot unavailable this cycle". Consumers keep the
/// last good snapshot and mark the feed stale.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The aggregation endpoint answered with a non-2xx status.
    #[error("Aggregation endpoint returned status {0}")]
    Status(u16),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The endpoint could not be reached.
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other HTTP transport failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The payload was not a valid `{fetchedAt, measurements}` document.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FeedError::Timeout
        } else if err.is_connect() {
            FeedError::Connection(err.to_string())
        } else {
            FeedError::Http(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message() {
        assert_eq!(
            FeedError::Status(503).to_string(),
            "Aggregation endpoint returned status 503"
        );
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err = serde_json::from_str::<latencyscope_types::LatencyReport>("nope").unwrap_err();
        let feed: FeedError = err.into();
        assert!(matches!(feed, FeedError::Parse(_)));
        assert!(feed.to_string().starts_with("Failed to parse response"));
    }
}
