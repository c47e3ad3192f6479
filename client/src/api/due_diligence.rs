//! `/due-diligence` endpoints.

use pagination::{PagedEnvelope, QueryParams};
use serde::{Deserialize, Serialize};

use super::businesses::Business;
use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User};

/// Review state of a due-diligence request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DueDiligenceStatus {
    /// Awaiting review.
    #[default]
    Pending,
    /// Review passed.
    Approved,
    /// Review failed.
    Rejected,
    /// Any state this client does not know yet.
    #[serde(other)]
    Other,
}

/// Body for `POST /due-diligence`.
///
/// `information_usage` travels as `infomationUsage`, the backend's field
/// name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDueDiligence {
    /// Name of the business under review.
    pub business_name: String,
    /// Id of the business under review.
    pub business_id: String,
    /// Requester full name.
    pub fullname: String,
    /// Requester e-mail.
    pub email: String,
    /// Requester phone number.
    pub phone_number: String,
    /// Business the requester owns.
    pub owned_business_name: String,
    /// Why the review is requested.
    pub due_diligence_purpose: String,
    /// Requested urgency.
    pub urgency_level: String,
    /// How the findings will be used.
    #[serde(rename = "infomationUsage")]
    pub information_usage: String,
    /// Extra requirements.
    pub additional_requirements: String,
}

/// Stored due-diligence request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DueDiligence {
    /// Identifier.
    pub id: String,
    /// Name of the business under review.
    pub business_name: String,
    /// Id of the business under review.
    pub business_id: String,
    /// Requester full name.
    pub fullname: String,
    /// Requester e-mail.
    pub email: String,
    /// Requester phone number.
    pub phone_number: String,
    /// Business the requester owns.
    pub owned_business_name: String,
    /// Why the review is requested.
    pub due_diligence_purpose: String,
    /// Requested urgency.
    pub urgency_level: String,
    /// How the findings will be used.
    #[serde(rename = "infomationUsage")]
    pub information_usage: String,
    /// Extra requirements.
    pub additional_requirements: String,
    /// Review status.
    pub status: DueDiligenceStatus,
    /// Creation time as sent by the backend.
    pub created_at: String,
    /// Last update time as sent by the backend.
    pub updated_at: String,
    /// Reviewed business, when embedded.
    pub business: Option<Business>,
    /// Requester, when embedded.
    pub user: Option<User>,
}

/// Filters for `GET /due-diligence`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct DueDiligenceFilter {
    /// Page size.
    pub limit: Option<u32>,
    /// One-based page index.
    pub page: Option<u32>,
    /// Free-text filter.
    pub query: Option<String>,
}

impl DueDiligenceFilter {
    fn path(&self) -> String {
        QueryParams::new()
            .push_count("limit", self.limit)
            .push_count("page", self.page)
            .push_opt("query", self.query.as_deref())
            .finish("/due-diligence")
    }
}

/// Due-diligence endpoints.
#[derive(Debug, Clone, Copy)]
pub struct DueDiligenceApi<'a> {
    client: &'a SessionClient,
}

impl<'a> DueDiligenceApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /due-diligence` as one page with its metadata.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn list(
        &self,
        filter: &DueDiligenceFilter,
    ) -> Result<PagedEnvelope<DueDiligence>, ApiError> {
        self.client.fetch(ApiRequest::get(filter.path())).await
    }

    /// `POST /due-diligence`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn request(&self, request: &RequestDueDiligence) -> Result<DueDiligence, ApiError> {
        self.client
            .fetch(ApiRequest::post("/due-diligence", request)?)
            .await
    }
}
