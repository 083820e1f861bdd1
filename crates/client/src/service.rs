//! Assessment API client.
//!
//! Walks the paginated patient endpoint and posts assessment results. Transient failures are
//! retried according to the configured [`RetryPolicy`]; a malformed page ends pagination
//! early rather than failing the whole run.

use crate::config::ClientConfig;
use crate::retry::{retry_after, RetryPolicy};
use crate::{ClientError, ClientResult, API_KEY_HEADER};
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response};
use serde_json::{json, Value};
use std::sync::Arc;
use triage_core::AssessmentResult;

/// Characters of a bad response body kept for logs and errors.
const BODY_PREVIEW_CHARS: usize = 200;

/// One decoded page of the patient listing.
#[derive(Debug, PartialEq)]
struct PatientPage {
    data: Vec<Value>,
    has_next: Option<bool>,
    total_pages: Option<u64>,
}

impl PatientPage {
    /// Decode a page payload. Returns `None` when the page carries no records.
    fn from_payload(payload: Value) -> Option<Self> {
        let Value::Object(mut object) = payload else {
            return None;
        };

        let data = match object.remove("data") {
            Some(Value::Array(data)) if !data.is_empty() => data,
            _ => return None,
        };

        let pagination = object.get("pagination");
        let has_next = pagination
            .and_then(|p| p.get("hasNext"))
            .and_then(Value::as_bool);
        let total_pages = pagination
            .and_then(|p| p.get("totalPages"))
            .and_then(page_count);

        Some(Self {
            data,
            has_next,
            total_pages,
        })
    }

    fn is_last(&self, page: u32) -> bool {
        if self.has_next == Some(false) {
            return true;
        }
        matches!(self.total_pages, Some(total) if total > 0 && u64::from(page) >= total)
    }
}

/// `totalPages` may arrive as a number or a numeric string.
fn page_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// What to do with a transient response once retries are used up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum OnExhausted {
    Fail,
    ReturnResponse,
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

/// HTTP client for the assessment API.
#[derive(Clone)]
pub struct AssessmentClient {
    http: reqwest::Client,
    cfg: Arc<ClientConfig>,
}

impl AssessmentClient {
    /// Creates a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying HTTP client cannot be built.
    pub fn new(cfg: Arc<ClientConfig>) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.request_timeout())
            .build()?;
        Ok(Self { http, cfg })
    }

    /// Fetches every patient record, page by page.
    ///
    /// Pagination stops when a page has no records, when `hasNext` is `false`, when the page
    /// number reaches `totalPages`, or when a page body is not valid JSON. Records gathered
    /// before the stop are returned.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::RetriesExhausted` if a page keeps failing transiently, and
    /// `ClientError::UnexpectedStatus` for a non-retryable error status (for example a
    /// rejected API key).
    pub async fn fetch_patients(&self) -> ClientResult<Vec<Value>> {
        let url = self.cfg.patients_url();
        let limit = self.cfg.page_limit();
        let mut patients = Vec::new();
        let mut page: u32 = 1;

        loop {
            if page > self.cfg.max_pages() {
                tracing::warn!(
                    "stopping after {} pages without an end-of-data marker",
                    self.cfg.max_pages()
                );
                break;
            }

            tracing::debug!("GET {} page={} limit={}", url, page, limit);
            let response = self
                .send_with_retry(&url, OnExhausted::Fail, || {
                    self.http.get(&url).query(&[("page", page), ("limit", limit)])
                })
                .await?;

            let status = response.status();
            let body = response.text().await?;
            if !status.is_success() {
                return Err(ClientError::UnexpectedStatus {
                    url,
                    status: status.as_u16(),
                    body: preview(&body),
                });
            }

            let payload: Value = match serde_json::from_str(&body) {
                Ok(payload) => payload,
                Err(_) => {
                    tracing::error!("invalid JSON on page {}: {}", page, preview(&body));
                    break;
                }
            };

            let Some(current) = PatientPage::from_payload(payload) else {
                tracing::debug!("no data on page {}, stopping", page);
                break;
            };

            let is_last = current.is_last(page);
            tracing::debug!("page {} returned {} record(s)", page, current.data.len());
            patients.extend(current.data);

            if is_last {
                break;
            }
            page += 1;
        }

        tracing::info!("fetched {} patient record(s)", patients.len());
        Ok(patients)
    }

    /// Posts an assessment result and returns the response body.
    ///
    /// The body is returned as parsed JSON when possible, otherwise as
    /// `{"status_code": <status>, "text": <body>}`. Non-success statuses are surfaced the
    /// same way rather than as errors, including the last transient status once retries run
    /// out.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::RetriesExhausted` if the endpoint stays unreachable (connection
    /// failures or timeouts) through every retry.
    pub async fn submit(&self, result: &AssessmentResult) -> ClientResult<Value> {
        let url = self.cfg.submit_url();
        let body = serde_json::to_vec(result)?;

        tracing::info!("submitting results to {}", url);
        let response = self
            .send_with_retry(&url, OnExhausted::ReturnResponse, || {
                self.http
                    .post(&url)
                    .header(CONTENT_TYPE, "application/json")
                    .body(body.clone())
            })
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)
            .unwrap_or_else(|_| json!({ "status_code": status, "text": text })))
    }

    /// Sends a request, retrying transient statuses and connection failures.
    ///
    /// Any response that is not retryable is returned as-is, whatever its status. Once
    /// retries run out, `on_exhausted` decides whether a final transient response is returned
    /// or turned into `ClientError::RetriesExhausted`.
    async fn send_with_retry<F>(
        &self,
        url: &str,
        on_exhausted: OnExhausted,
        build: F,
    ) -> ClientResult<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let policy = self.cfg.retry();
        let mut attempt: u32 = 0;

        loop {
            let outcome = build()
                .header(API_KEY_HEADER, self.cfg.api_key())
                .send()
                .await;

            let exhausted = attempt >= policy.max_retries;
            let (last, server_delay) = match outcome {
                Ok(response) if RetryPolicy::is_retryable(response.status()) => {
                    if exhausted && on_exhausted == OnExhausted::ReturnResponse {
                        return Ok(response);
                    }
                    (response.status().to_string(), retry_after(response.headers()))
                }
                Ok(response) => return Ok(response),
                Err(err) if err.is_timeout() || err.is_connect() => (err.to_string(), None),
                Err(err) => return Err(ClientError::Http(err)),
            };

            if exhausted {
                return Err(ClientError::RetriesExhausted {
                    url: url.to_string(),
                    attempts: attempt + 1,
                    last,
                });
            }

            let delay = policy.delay(attempt, server_delay);
            tracing::warn!(
                "transient failure from {} ({}); retrying in {:?}",
                url,
                last,
                delay
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
