//! # Triage Client
//!
//! Data source and sink for the triage core:
//! - Paginated patient fetch from the assessment API, with retry and backoff
//! - Submission of an [`AssessmentResult`](triage_core::AssessmentResult), surfacing the
//!   response verbatim
//!
//! Configuration is resolved once into a [`ClientConfig`] before any request is made.

pub mod config;
pub mod retry;
pub mod service;

pub use config::{base_url_from_env_value, ClientConfig};
pub use retry::RetryPolicy;
pub use service::AssessmentClient;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Errors returned by the assessment API client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("gave up on {url} after {attempts} attempt(s); last failure: {last}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        last: String,
    },

    #[error("failed to serialise payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Results that can fail with a [`ClientError`].
pub type ClientResult<T> = Result<T, ClientError>;
