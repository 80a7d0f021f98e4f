//! Shared request plumbing: transport, status and decode failures.

use reqwest::RequestBuilder;
use routescope_core::{AnnotationError, RouteError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const MAX_ERROR_BODY: usize = 200;

#[derive(Debug)]
pub(crate) enum Failure {
    Network(String),
    Status(u16, String),
    Decode(String),
}

impl From<Failure> for RouteError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Network(message) => RouteError::NetworkFailure(message),
            Failure::Status(status, message) => RouteError::bad_response(Some(status), message),
            Failure::Decode(message) => RouteError::bad_response(None, message),
        }
    }
}

impl From<Failure> for AnnotationError {
    fn from(failure: Failure) -> Self {
        match failure {
            Failure::Network(message) => AnnotationError::NetworkFailure(message),
            Failure::Status(status, message) => {
                AnnotationError::BadResponse(format!("HTTP {}: {}", status, message))
            }
            Failure::Decode(message) => AnnotationError::BadResponse(message),
        }
    }
}

impl std::fmt::Display for Failure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Failure::Network(message) => write!(f, "network failure: {}", message),
            Failure::Status(status, message) => write!(f, "HTTP {}: {}", status, message),
            Failure::Decode(message) => write!(f, "bad response: {}", message),
        }
    }
}

impl std::error::Error for Failure {}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Send a request and decode a 2xx JSON body.
pub(crate) async fn send_json<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, Failure> {
    let response = request
        .send()
        .await
        .map_err(|err| Failure::Network(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Failure::Status(status.as_u16(), error_message(&body)));
    }

    response.json::<T>().await.map_err(|err| {
        if err.is_decode() {
            Failure::Decode(err.to_string())
        } else {
            Failure::Network(err.to_string())
        }
    })
}

/// Prefer the `{"error": ...}` message our backend returns over the raw body.
fn error_message(body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.len() <= MAX_ERROR_BODY {
        return trimmed.to_string();
    }
    let mut end = MAX_ERROR_BODY;
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &trimmed[..end])
}

pub(crate) fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|err| {
            tracing::warn!("Falling back to default HTTP client: {}", err);
            reqwest::Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_error_field() {
        assert_eq!(
            error_message(r#"{"error": "Missing 'lat' or 'lon' parameter"}"#),
            "Missing 'lat' or 'lon' parameter"
        );
        assert_eq!(error_message("  gateway timeout \n"), "gateway timeout");
        assert!(error_message(&"x".repeat(500)).ends_with("..."));
    }

    #[test]
    fn status_failures_keep_their_code() {
        let err: RouteError = Failure::Status(404, "not found".to_string()).into();
        assert_eq!(err, RouteError::bad_response(Some(404), "not found"));

        let err: AnnotationError = Failure::Network("refused".to_string()).into();
        assert_eq!(err, AnnotationError::NetworkFailure("refused".to_string()));
    }
}
