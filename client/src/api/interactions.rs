//! `/interactions/*` endpoints.

use std::fmt;

use pagination::QueryParams;
use serde::{Deserialize, Serialize};

use super::posts::Post;
use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User};

/// Kind of engagement recorded against a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    /// Like.
    #[default]
    Like,
    /// Comment.
    Comment,
    /// Share.
    Share,
    /// View.
    View,
}

impl InteractionKind {
    /// Wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Comment => "comment",
            Self::Share => "share",
            Self::View => "view",
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body for `POST /interactions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInteractionRequest {
    /// Target post.
    pub post_id: String,
    /// Engagement kind.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Comment text for [`InteractionKind::Comment`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl CreateInteractionRequest {
    /// Interaction without a comment.
    pub fn new(post_id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            post_id: post_id.into(),
            kind,
            comment: None,
        }
    }

    /// Comment on a post.
    pub fn comment(post_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            post_id: post_id.into(),
            kind: InteractionKind::Comment,
            comment: Some(text.into()),
        }
    }
}

/// Recorded interaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Interaction {
    /// Identifier.
    pub id: String,
    /// Target post id.
    pub post_id: String,
    /// Interacting user id.
    pub user_id: String,
    /// Interaction type.
    #[serde(rename = "type")]
    pub kind: InteractionKind,
    /// Comment text for comment interactions.
    pub comment: Option<String>,
    /// Creation time as sent by the backend.
    pub created_at: String,
    /// Last update time as sent by the backend.
    pub updated_at: String,
    /// Post, when embedded.
    pub post: Option<Post>,
    /// User, when embedded.
    pub user: Option<User>,
}

/// Engagement counts for one post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionSummary {
    /// Target post id.
    pub post_id: String,
    /// Number of likes.
    pub like_count: u64,
    /// Number of comments.
    pub comment_count: u64,
    /// Number of shares.
    pub share_count: u64,
    /// Number of views.
    pub view_count: u64,
}

/// Answer of `GET /interactions/has-interacted`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HasInteracted {
    /// Whether the signed-in user already interacted.
    #[serde(default)]
    pub has_interacted: bool,
}

/// Filters for `GET /interactions`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionFilter {
    /// Restrict to one post.
    pub post_id: Option<String>,
    /// Restrict to one user.
    pub user_id: Option<String>,
}

/// Interaction endpoints.
#[derive(Debug, Clone, Copy)]
pub struct InteractionsApi<'a> {
    client: &'a SessionClient,
}

impl<'a> InteractionsApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `POST /interactions`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn create(
        &self,
        request: &CreateInteractionRequest,
    ) -> Result<Interaction, ApiError> {
        self.client
            .fetch(ApiRequest::post("/interactions", request)?)
            .await
    }

    /// `GET /interactions` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn list(&self, filter: &InteractionFilter) -> Result<Vec<Interaction>, ApiError> {
        let path = QueryParams::new()
            .push_opt("postId", filter.post_id.as_deref())
            .push_opt("userId", filter.user_id.as_deref())
            .finish("/interactions");
        self.client.fetch(ApiRequest::get(path)).await
    }

    /// `GET /interactions/has-interacted?postId=..&type=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn has_interacted(
        &self,
        post_id: &str,
        kind: InteractionKind,
    ) -> Result<HasInteracted, ApiError> {
        let path = QueryParams::new()
            .push("postId", post_id)
            .push("type", kind)
            .finish("/interactions/has-interacted");
        self.client.fetch(ApiRequest::get(path)).await
    }

    /// `GET /interactions/summary?postId=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn summary(&self, post_id: &str) -> Result<InteractionSummary, ApiError> {
        let path = QueryParams::new()
            .push("postId", post_id)
            .finish("/interactions/summary");
        self.client.fetch(ApiRequest::get(path)).await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::api::test_helpers::scripted_api;
    use crate::domain::ports::HttpMethod;
    use serde_json::json;

    #[test]
    fn create_request_serialises_kind_as_type() {
        let body = serde_json::to_value(CreateInteractionRequest::comment("p-1", "Nice"))
            .expect("serialise");
        assert_eq!(
            body,
            json!({"postId": "p-1", "type": "comment", "comment": "Nice"})
        );
    }

    #[tokio::test]
    async fn has_interacted_builds_query() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/interactions/has-interacted?postId=p-1&type=like",
            json!({"hasInteracted": true}),
        );
        let answer = api
            .interactions()
            .has_interacted("p-1", InteractionKind::Like)
            .await
            .expect("answered");
        assert!(answer.has_interacted);
    }

    #[tokio::test]
    async fn list_without_filters_hits_bare_path() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/interactions",
            json!([{"id": "i-1", "postId": "p-1", "type": "share"}]),
        );
        let interactions = api
            .interactions()
            .list(&InteractionFilter::default())
            .await
            .expect("listed");
        assert_eq!(
            interactions.first().map(|i| i.kind),
            Some(InteractionKind::Share)
        );
    }

    #[tokio::test]
    async fn summary_tolerates_missing_counts() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/interactions/summary?postId=p-1",
            json!({"postId": "p-1", "likeCount": 4}),
        );
        let summary = api.interactions().summary("p-1").await.expect("summary");
        assert_eq!(summary.like_count, 4);
        assert_eq!(summary.view_count, 0);
    }
}
