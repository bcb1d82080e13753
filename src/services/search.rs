use serde_json::Value;

use crate::error::ClientError;
use crate::services::ServiceClient;

/// Client for the search service. List endpoints return either a
/// `{"results": [...]}` envelope or a bare array; both are accepted.
#[derive(Debug, Clone)]
pub struct SearchService {
    http: ServiceClient,
}

impl SearchService {
    pub fn new(http: ServiceClient) -> Self {
        Self { http }
    }

    /// `GET /search/explore` — the public discovery list.
    pub async fn explore(&self) -> Result<Vec<Value>, ClientError> {
        let body = self.http.get_json("/search/explore").await?;
        Ok(unwrap_results(body))
    }

    /// `GET /search/feed` — recipes from followed authors; requires a viewer.
    pub async fn feed(&self) -> Result<Vec<Value>, ClientError> {
        let body = self.http.get_json("/search/feed").await?;
        Ok(unwrap_results(body))
    }

    /// `GET /users?q=...` — user search.
    pub async fn users(&self, query: &str) -> Result<Vec<Value>, ClientError> {
        let body = self.http.get_json(&format!("/users?q={query}")).await?;
        Ok(unwrap_results(body))
    }
}

/// Accept both the `{"results": [...]}` envelope and a bare array.
/// Anything else yields an empty list rather than an error.
pub(crate) fn unwrap_results(body: Value) -> Vec<Value> {
    match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
