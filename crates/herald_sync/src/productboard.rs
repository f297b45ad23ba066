//! Productboard source client.
//!
//! Queries the Productboard GraphQL API for features, requesting identifier,
//! title, description, status, and update-timestamp fields, and follows
//! connection cursors until the feature list is exhausted.

use crate::error::SourceError;
use crate::http::{HttpClient, HttpError};
use crate::source::ItemSource;
use chrono::{DateTime, Utc};
use herald_protocol::{Item, ItemPage};
use serde::Deserialize;
use serde_json::json;

const GRAPHQL_PATH: &str = "/graphql";

const FEATURES_QUERY: &str = "\
query Features($first: Int!, $after: String) {
  features(first: $first, after: $after) {
    edges {
      node {
        id
        name
        description
        status { id name }
        updatedAt
      }
    }
    pageInfo { hasNextPage endCursor }
  }
}";

/// A Productboard-backed item source.
pub struct ProductboardSource<C: HttpClient> {
    base_url: String,
    token: String,
    page_size: u32,
    client: C,
}

impl<C: HttpClient> ProductboardSource<C> {
    /// Creates a source against the given API base URL.
    pub fn new(client: C, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: token.into(),
            page_size: 50,
            client,
        }
    }

    /// Sets the page size for feature queries.
    #[must_use]
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Option<Data>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct Data {
    features: Option<Connection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    edges: Vec<Edge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct Edge {
    node: FeatureNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FeatureNode {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    status: Option<StatusRef>,
    #[serde(default)]
    updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusRef {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    #[serde(default)]
    end_cursor: Option<String>,
}

impl FeatureNode {
    fn into_item(self) -> Item {
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Item {
            id: self.id,
            title: self.name.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            status_name: self.status.and_then(|s| s.name).unwrap_or_default(),
            updated_at,
        }
    }
}

impl<C: HttpClient> ItemSource for ProductboardSource<C> {
    fn fetch_page(&self, cursor: Option<&str>) -> Result<ItemPage, SourceError> {
        let url = format!("{}{}", self.base_url, GRAPHQL_PATH);
        let body = json!({
            "query": FEATURES_QUERY,
            "variables": { "first": self.page_size, "after": cursor },
        });

        tracing::debug!(cursor = ?cursor, "fetching feature page");

        let response = self
            .client
            .post_json(&url, &self.token, &body)
            .map_err(|err| match err {
                HttpError::TimedOut => SourceError::Unavailable("request timed out".into()),
                HttpError::Failed(message) => SourceError::Unavailable(message),
            })?;

        match response.status {
            401 | 403 => return Err(SourceError::Auth {
                status: response.status,
            }),
            status if !response.is_success() => {
                return Err(SourceError::Unavailable(format!(
                    "HTTP {status}: {}",
                    response.body_excerpt()
                )))
            }
            _ => {}
        }

        let envelope: Envelope = response
            .json()
            .map_err(|err| SourceError::Malformed(err.to_string()))?;

        if let Some(errors) = envelope.errors {
            if let Some(first) = errors.first() {
                return Err(SourceError::Malformed(first.message.clone()));
            }
        }

        let connection = envelope
            .data
            .and_then(|d| d.features)
            .ok_or_else(|| SourceError::Malformed("missing features connection".into()))?;

        let items: Vec<Item> = connection
            .edges
            .into_iter()
            .map(|edge| edge.node.into_item())
            .collect();

        let next_cursor = if connection.page_info.has_next_page {
            connection.page_info.end_cursor
        } else {
            None
        };

        Ok(ItemPage::new(items, next_cursor))
    }
}
