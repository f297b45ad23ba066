//! HTTP client abstraction.
//!
//! The actual HTTP client is abstracted via a trait so the source and target
//! clients can be exercised against scripted responses in tests, and so a
//! different HTTP library could be swapped in without touching them.

use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

/// Transport-level HTTP failures, before any status code is available.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    TimedOut,

    /// The request failed to complete (DNS, connect, TLS, ...).
    #[error("request failed: {0}")]
    Failed(String),
}

/// A raw HTTP response: status code plus body bytes.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Creates a response.
    pub fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserializes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns a lossy text rendering of the body, truncated for messages.
    pub fn body_excerpt(&self) -> String {
        const MAX: usize = 200;
        let text = String::from_utf8_lossy(&self.body);
        let mut excerpt: String = text.chars().take(MAX).collect();
        if text.chars().count() > MAX {
            excerpt.push_str("...");
        }
        excerpt
    }
}

/// HTTP client abstraction.
///
/// Implement this trait to provide the actual transport. The engine ships a
/// reqwest-backed implementation; tests use scripted implementations.
pub trait HttpClient: Send + Sync {
    /// Sends a bearer-authenticated JSON POST and returns the response.
    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError>;
}

/// A blocking reqwest-backed HTTP client.
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Creates a client with the given per-call timeout.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::Failed(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, HttpError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    HttpError::TimedOut
                } else {
                    HttpError::Failed(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| HttpError::Failed(e.to_string()))?
            .to_vec();

        Ok(HttpResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_statuses() {
        assert!(HttpResponse::new(200, vec![]).is_success());
        assert!(HttpResponse::new(201, vec![]).is_success());
        assert!(!HttpResponse::new(404, vec![]).is_success());
        assert!(!HttpResponse::new(500, vec![]).is_success());
    }

    #[test]
    fn json_body() {
        let response = HttpResponse::new(200, br#"{"id":"post-1"}"#.to_vec());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["id"], "post-1");
    }

    #[test]
    fn body_excerpt_truncates() {
        let response = HttpResponse::new(400, vec![b'x'; 500]);
        let excerpt = response.body_excerpt();
        assert!(excerpt.len() <= 203);
        assert!(excerpt.ends_with("..."));
    }
}
