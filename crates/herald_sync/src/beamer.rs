//! Beamer target publisher.
//!
//! Posts announcements to the Beamer posts endpoint. Each released item maps
//! to one post, published immediately.

use crate::error::TargetError;
use crate::http::{HttpClient, HttpError};
use crate::target::Publisher;
use herald_protocol::{Item, PostPayload, PostReceipt};

const POSTS_PATH: &str = "/v0/posts";

/// A Beamer-backed announcement publisher.
pub struct BeamerPublisher<C: HttpClient> {
    base_url: String,
    token: String,
    client: C,
}

impl<C: HttpClient> BeamerPublisher<C> {
    /// Creates a publisher against the given API base URL.
    pub fn new(client: C, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            client,
        }
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Pulls the assigned post id out of a create response, if it has one.
///
/// Responses without a usable id still count as accepted: the target took
/// the post, and failing the item here would risk a duplicate on rerun.
fn extract_post_id(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("id") {
        Some(serde_json::Value::String(id)) => Some(id.clone()),
        Some(serde_json::Value::Number(id)) => Some(id.to_string()),
        _ => None,
    }
}

impl<C: HttpClient> Publisher for BeamerPublisher<C> {
    fn publish(&self, item: &Item) -> Result<PostReceipt, TargetError> {
        let url = format!("{}{}", self.base_url, POSTS_PATH);
        let payload = PostPayload::for_item(item);
        let body = serde_json::to_value(&payload)
            .map_err(|err| TargetError::Rejected {
                status: 0,
                message: format!("unencodable payload: {err}"),
            })?;

        tracing::debug!(item_id = %item.id, "publishing announcement");

        let response = self
            .client
            .post_json(&url, &self.token, &body)
            .map_err(|err| match err {
                HttpError::TimedOut => TargetError::Transient("request timed out".into()),
                HttpError::Failed(message) => TargetError::Unavailable(message),
            })?;

        match response.status {
            _ if response.is_success() => Ok(PostReceipt {
                post_id: extract_post_id(&response.body),
            }),
            401 | 403 => Err(TargetError::Auth {
                status: response.status,
            }),
            // 429 is retryable, unlike the other 4xx statuses.
            429 => Err(TargetError::Transient(format!(
                "HTTP 429: {}",
                response.body_excerpt()
            ))),
            status if (400..500).contains(&status) => Err(TargetError::Rejected {
                status,
                message: response.body_excerpt(),
            }),
            status => Err(TargetError::Transient(format!(
                "HTTP {status}: {}",
                response.body_excerpt()
            ))),
        }
    }
}
