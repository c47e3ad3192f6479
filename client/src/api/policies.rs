//! `/policies/*` endpoints: AI assistant and business news.

use pagination::{PayloadEnvelope, QueryParams};
use serde::{Deserialize, Serialize};

use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::ApiError;

/// Body for `POST /policies/ai-query`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AiQueryRequest {
    /// Question text.
    pub query: String,
    /// Extra context for the assistant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Assistant answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiQueryResponse {
    /// Answer text.
    #[serde(default)]
    pub answer: String,
    /// Cited sources.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// News article from the aggregation feed. Field names follow the feed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessNews {
    /// Feed article id.
    pub article_id: String,
    /// Article URL.
    pub link: String,
    /// Headline.
    pub title: String,
    /// Summary.
    pub description: String,
    /// Body text.
    pub content: String,
    /// Feed keywords.
    pub keywords: Vec<String>,
    /// Authors.
    pub creator: Vec<String>,
    /// Language name.
    pub language: String,
    /// Countries covered.
    pub country: Vec<String>,
    /// Feed categories.
    pub category: Vec<String>,
    /// Feed item type.
    pub datatype: String,
    /// Publication time.
    #[serde(rename = "pubDate")]
    pub pub_date: String,
    /// Time zone of `pub_date`.
    #[serde(rename = "pubDateTZ")]
    pub pub_date_tz: String,
    /// When the feed fetched the article.
    pub fetched_at: String,
    /// Lead image URL.
    pub image_url: Option<String>,
    /// Video URL.
    pub video_url: Option<String>,
    /// Publisher id.
    pub source_id: String,
    /// Publisher name.
    pub source_name: String,
    /// Publisher ranking from the feed.
    pub source_priority: f64,
    /// Publisher site.
    pub source_url: String,
    /// Publisher icon URL.
    pub source_icon: String,
    /// Whether the feed flagged it as a duplicate.
    pub duplicate: bool,
}

/// Filters for `GET /policies/business-news`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NewsFilter {
    /// Maximum number of articles.
    pub limit: Option<u32>,
    /// News category.
    pub category: Option<String>,
}

/// Policy and news endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PoliciesApi<'a> {
    client: &'a SessionClient,
}

impl<'a> PoliciesApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `POST /policies/ai-query`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn ai_query(&self, request: &AiQueryRequest) -> Result<AiQueryResponse, ApiError> {
        self.client
            .fetch(ApiRequest::post("/policies/ai-query", request)?)
            .await
    }

    /// `GET /policies/business-news` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn business_news(&self, filter: &NewsFilter) -> Result<Vec<BusinessNews>, ApiError> {
        let path = QueryParams::new()
            .push_count("limit", filter.limit)
            .push_opt("category", filter.category.as_deref())
            .finish("/policies/business-news");
        let envelope: PayloadEnvelope<Vec<BusinessNews>> =
            self.client.fetch(ApiRequest::get(path)).await?;
        Ok(envelope.into_inner())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::api::test_helpers::scripted_api;
    use crate::domain::ports::HttpMethod;
    use serde_json::json;

    #[tokio::test]
    async fn business_news_reads_feed_field_names() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/policies/business-news?limit=2&category=business",
            json!({"payload": [{
                "article_id": "n-1",
                "title": "Tariffs eased",
                "pubDate": "2025-05-01 10:00:00",
                "pubDateTZ": "UTC",
                "image_url": null,
                "source_priority": 1200,
                "duplicate": false
            }]}),
        );
        let news = api
            .policies()
            .business_news(&NewsFilter {
                limit: Some(2),
                category: Some("business".to_owned()),
            })
            .await
            .expect("news");
        let article = news.first().expect("one article");
        assert_eq!(article.pub_date_tz, "UTC");
        assert!(article.image_url.is_none());
    }

    #[tokio::test]
    async fn ai_query_omits_missing_context() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Post,
            "/policies/ai-query",
            json!({"answer": "Register with the trade ministry."}),
        );
        let answer = api
            .policies()
            .ai_query(&AiQueryRequest {
                query: "How do I export?".to_owned(),
                context: None,
            })
            .await
            .expect("answered");
        assert!(answer.sources.is_empty());
        let calls = transport.calls();
        assert_eq!(
            calls.first().and_then(|call| call.request.body.clone()),
            Some(json!({"query": "How do I export?"}))
        );
    }
}
