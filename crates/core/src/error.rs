//! Unified error types for skry.
//!
//! Every fallible operation in the workspace funnels into this enum. The
//! variants are `Clone` because a coalesced request broadcasts one outcome
//! to every waiter.

/// Unified error type for skry operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query, empty URL list).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// Malformed or unsupported URL.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Search provider unreachable, rate-limited, or unparseable.
    #[error("SEARCH_FAILED: {0}")]
    SearchFailed(String),

    /// Crawl batch failed as a whole (per-URL failures are not errors).
    #[error("CRAWL_FAILED: {0}")]
    CrawlFailed(String),

    /// HTTP error response from a fetched page.
    #[error("HTTP_ERROR: {0}")]
    HttpError(String),

    /// Fetch timeout.
    #[error("FETCH_TIMEOUT: {0}")]
    FetchTimeout(String),

    /// Fetch response exceeded the configured byte limit.
    #[error("FETCH_TOO_LARGE: {0}")]
    FetchTooLarge(String),

    /// Fetched content could not be rendered as markdown.
    #[error("EXTRACT_FAILED: {0}")]
    ExtractFailed(String),

    /// An in-flight request ended without producing an outcome.
    #[error("REQUEST_ABORTED: {0}")]
    Aborted(String),

    /// Invariant violation; a bug rather than an input or backend problem.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error was raised before any backend or cache work.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidInput(_) | Error::InvalidUrl(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("query cannot be empty".into());
        assert!(err.to_string().contains("INVALID_INPUT"));
        assert!(err.to_string().contains("query cannot be empty"));
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::InvalidInput("x".into()).is_validation());
        assert!(Error::InvalidUrl("x".into()).is_validation());
        assert!(!Error::SearchFailed("x".into()).is_validation());
        assert!(!Error::Aborted("x".into()).is_validation());
    }

    #[test]
    fn test_error_clone_preserves_message() {
        let err = Error::SearchFailed("connection refused".into());
        assert_eq!(err.clone().to_string(), err.to_string());
    }
}
