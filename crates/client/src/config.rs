//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and passed into the client, so no
//! environment variables are read while requests are in flight.

use crate::retry::RetryPolicy;
use crate::{ClientError, ClientResult};
use std::time::Duration;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://assessment.ksensetech.com";

/// Largest page size the API accepts.
pub const MAX_PAGE_LIMIT: u32 = 20;

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Upper bound on pages walked in one fetch.
pub const DEFAULT_MAX_PAGES: u32 = 1_000;

const PATIENTS_PATH: &str = "/api/patients";
const SUBMIT_PATH: &str = "/api/submit-assessment";

/// Client configuration resolved at startup.
#[derive(Clone)]
pub struct ClientConfig {
    base_url: String,
    api_key: String,
    page_limit: u32,
    request_timeout: Duration,
    max_pages: u32,
    retry: RetryPolicy,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// `page_limit` is clamped to `1..=MAX_PAGE_LIMIT`. A trailing `/` on `base_url` is
    /// dropped.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::InvalidInput` if the base URL is empty or not `http(s)://`, or
    /// if the API key is empty.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        page_limit: u32,
    ) -> ClientResult<Self> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        let api_key = api_key.into();

        if base_url.is_empty() {
            return Err(ClientError::InvalidInput("base_url cannot be empty".into()));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidInput(format!(
                "base_url must start with http:// or https:// (got '{base_url}')"
            )));
        }

        if api_key.trim().is_empty() {
            return Err(ClientError::InvalidInput("api_key cannot be empty".into()));
        }

        Ok(Self {
            base_url,
            api_key,
            page_limit: page_limit.clamp(1, MAX_PAGE_LIMIT),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_pages: DEFAULT_MAX_PAGES,
            retry: RetryPolicy::default(),
        })
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn page_limit(&self) -> u32 {
        self.page_limit
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn max_pages(&self) -> u32 {
        self.max_pages
    }

    pub fn retry(&self) -> RetryPolicy {
        self.retry
    }

    pub fn patients_url(&self) -> String {
        format!("{}{}", self.base_url, PATIENTS_PATH)
    }

    pub fn submit_url(&self) -> String {
        format!("{}{}", self.base_url, SUBMIT_PATH)
    }
}

// Keep the API key out of logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("page_limit", &self.page_limit)
            .field("request_timeout", &self.request_timeout)
            .field("max_pages", &self.max_pages)
            .field("retry", &self.retry)
            .finish()
    }
}

/// Resolve the base URL from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_BASE_URL`].
pub fn base_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_normalises_base_url_and_clamps_limit() {
        let cfg = ClientConfig::new("https://example.test/", "key", 50).unwrap();
        assert_eq!(cfg.base_url(), "https://example.test");
        assert_eq!(cfg.page_limit(), MAX_PAGE_LIMIT);
        assert_eq!(cfg.patients_url(), "https://example.test/api/patients");
        assert_eq!(cfg.submit_url(), "https://example.test/api/submit-assessment");

        let cfg = ClientConfig::new("http://localhost:8080", "key", 0).unwrap();
        assert_eq!(cfg.page_limit(), 1);
    }

    #[test]
    fn test_new_rejects_empty_api_key() {
        let err = ClientConfig::new(DEFAULT_BASE_URL, "  ", 20).expect_err("should reject");
        assert!(matches!(err, ClientError::InvalidInput(msg) if msg.contains("api_key")));
    }

    #[test]
    fn test_new_rejects_bad_base_url() {
        let err = ClientConfig::new("", "key", 20).expect_err("should reject empty");
        assert!(matches!(err, ClientError::InvalidInput(msg) if msg.contains("cannot be empty")));

        let err = ClientConfig::new("ftp://example.test", "key", 20).expect_err("should reject");
        assert!(matches!(err, ClientError::InvalidInput(msg) if msg.contains("http://")));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let cfg = ClientConfig::new(DEFAULT_BASE_URL, "secret-key", 20).unwrap();
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_base_url_from_env_value() {
        assert_eq!(base_url_from_env_value(None), DEFAULT_BASE_URL);
        assert_eq!(base_url_from_env_value(Some("   ".into())), DEFAULT_BASE_URL);
        assert_eq!(
            base_url_from_env_value(Some(" http://localhost:3000 ".into())),
            "http://localhost:3000"
        );
    }
}
