//! URL validation and normalization for crawl targets.

/// Error type for URL normalization failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    Invalid(String),
}

/// Normalize a crawl target URL.
///
/// Crawl input must be an absolute http(s) URL; anything relative or
/// scheme-less is rejected rather than guessed at. Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Require an `http` or `https` scheme and a host
/// 3. Remove the fragment (#...)
/// 4. Keep the query string intact (do not reorder)
pub fn normalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::Invalid(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::Invalid("missing host".into()));
    }

    parsed.set_fragment(None);

    Ok(parsed)
}
