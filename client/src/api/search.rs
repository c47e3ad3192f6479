//! `/search/text` endpoint.

use pagination::QueryParams;
use serde::{Deserialize, Serialize};

use super::businesses::Business;
use super::posts::Post;
use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::ApiError;

/// Parameters for a text search. `query` is always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SearchRequest {
    /// Search text.
    pub query: String,
    /// Page size.
    pub limit: Option<u32>,
    /// One-based page index.
    pub page: Option<u32>,
}

impl SearchRequest {
    /// Search for `query` with server-side paging defaults.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn path(&self) -> String {
        QueryParams::new()
            .push("query", &self.query)
            .push_count("limit", self.limit)
            .push_count("page", self.page)
            .finish("/search/text")
    }
}

/// Matches across businesses and posts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    /// Matching businesses.
    pub businesses: Vec<Business>,
    /// Matching posts.
    pub posts: Vec<Post>,
    /// Total number of matches.
    pub total: u64,
}

/// Search endpoint.
#[derive(Debug, Clone, Copy)]
pub struct SearchApi<'a> {
    client: &'a SessionClient,
}

impl<'a> SearchApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /search/text?query=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and rejection failures.
    pub async fn text(&self, request: &SearchRequest) -> Result<SearchResult, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::get(request.path()))
            .await?;
        Ok(accepted.payload.unwrap_or_default())
    }
}
