//! `/posts` endpoints.

use pagination::{PageRequest, QueryParams, SortOrder};
use serde::{Deserialize, Serialize};

use super::businesses::Business;
use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User};

/// How a listed price should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    /// Single fixed price.
    Fixed,
    /// Price open to negotiation.
    Negotiable,
    /// `price` up to `max_price`.
    Range,
}

/// Optional pricing attached to a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPricing {
    /// Listed price, or the lower bound of a range.
    pub price: f64,
    /// ISO currency code.
    pub currency: String,
    /// Interpretation of the price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_type: Option<PriceType>,
    /// Upper bound for [`PriceType::Range`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

/// Marketplace post.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Post {
    /// Identifier.
    pub id: String,
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Owning business id.
    pub business_id: String,
    /// Author id.
    pub user_id: String,
    /// Image URLs.
    pub images: Vec<String>,
    /// Listed price, if any.
    pub pricing: Option<PostPricing>,
    /// Number of likes.
    pub like_count: u64,
    /// Number of comments.
    pub comment_count: u64,
    /// Number of shares.
    pub share_count: u64,
    /// Number of views.
    pub view_count: u64,
    /// Creation time as sent by the backend.
    pub created_at: String,
    /// Last update time as sent by the backend.
    pub updated_at: String,
    /// Publishing business, when embedded.
    pub business: Option<Business>,
    /// Author, when embedded.
    pub user: Option<User>,
}

/// Body for `POST /posts`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    /// Headline.
    pub title: String,
    /// Body text.
    pub content: String,
    /// Publishing business.
    pub business_id: String,
    /// Image URLs.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<String>,
    /// Optional pricing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing: Option<PostPricing>,
}

/// Filters for `GET /posts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListParams {
    /// Page selection.
    pub page: PageRequest,
    /// Restrict to one business.
    pub business_id: Option<String>,
    /// Sort field.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl PostListParams {
    /// Posts of a single business.
    pub fn for_business(business_id: impl Into<String>) -> Self {
        Self {
            business_id: Some(business_id.into()),
            ..Self::default()
        }
    }

    fn path(&self) -> String {
        QueryParams::new()
            .page(self.page)
            .push_opt("businessId", self.business_id.as_deref())
            .push_opt("sortBy", self.sort_by.as_deref())
            .push_opt("sortOrder", self.sort_order)
            .finish("/posts")
    }
}

/// Post endpoints.
#[derive(Debug, Clone, Copy)]
pub struct PostsApi<'a> {
    client: &'a SessionClient,
}

impl<'a> PostsApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /posts` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and rejection failures.
    pub async fn list(&self, params: &PostListParams) -> Result<Vec<Post>, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::get(params.path()))
            .await?;
        Ok(accepted.payload.unwrap_or_default())
    }

    /// `POST /posts`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the post and
    /// [`ApiError::Decode`] when it accepts without returning it.
    pub async fn create(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::post("/posts", request)?)
            .await?;
        Ok(accepted.require_payload()?)
    }
}
