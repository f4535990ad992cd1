//! Shared REST fetch primitive for C1 (spec.md §4.1).
//!
//! One `reqwest::Client` per process, reused by every venue module. Maps
//! transport/HTTP-status outcomes onto the retry policy in [`crate::retry`]:
//! connection failure, timeout, 5xx and 429 are retryable; any other 4xx is
//! permanent (MEXC futures denying the request is the textbook case).

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum FetchError {
    #[error("transient: {0}")]
    Transient(String),
    #[error("permanent: {0}")]
    Permanent(String),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Transient(_))
    }
}

/// Issues `GET url`, applying `timeout`, and returns the parsed JSON body or
/// a classified [`FetchError`]. Unknown-field tolerance is the caller's job
/// (each venue parser reads only the fields it needs out of the `Value`).
pub async fn get_json(client: &reqwest::Client, url: &str, timeout: Duration) -> Result<serde_json::Value, FetchError> {
    let response = client
        .get(url)
        .timeout(timeout)
        .send()
        .await
        .map_err(|e| classify_transport_error(&e))?;

    let status = response.status();
    if status.is_server_error() || status.as_u16() == 429 {
        return Err(FetchError::Transient(format!("{url}: HTTP {status}")));
    }
    if status.is_client_error() {
        return Err(FetchError::Permanent(format!("{url}: HTTP {status}")));
    }

    response.json::<serde_json::Value>().await.map_err(|e| FetchError::Permanent(format!("{url}: body parse failed: {e}")))
}

fn classify_transport_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() || e.is_connect() {
        FetchError::Transient(e.to_string())
    } else {
        FetchError::Permanent(e.to_string())
    }
}
