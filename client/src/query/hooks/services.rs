//! Search, due-diligence, news and assistant hooks.

use pagination::PagedEnvelope;

use super::{Hooks, MutationKind, Toast};
use crate::api::due_diligence::{DueDiligence, DueDiligenceFilter, RequestDueDiligence};
use crate::api::policies::{AiQueryRequest, AiQueryResponse, BusinessNews, NewsFilter};
use crate::api::search::{SearchRequest, SearchResult};
use crate::domain::{ApiError, QueryKey, families};
use crate::query::Query;

impl Hooks {
    /// Text search. Disabled while the query text is empty.
    pub fn search(&self, request: SearchRequest) -> Query<SearchResult> {
        let enabled = !request.query.is_empty();
        let key = QueryKey::from(families::SEARCH).with_params(&request);
        self.query(key, move |api| {
            let request = request.clone();
            async move { api.search().text(&request).await }
        })
        .enabled(enabled)
    }

    /// One page of the caller's due-diligence requests.
    pub fn due_diligence_requests(
        &self,
        filter: DueDiligenceFilter,
    ) -> Query<PagedEnvelope<DueDiligence>> {
        let key = QueryKey::from(families::DUE_DILIGENCE).with_params(&filter);
        self.query(key, move |api| {
            let filter = filter.clone();
            async move { api.due_diligence().list(&filter).await }
        })
    }

    /// Submit a due-diligence request.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn request_due_diligence(
        &self,
        request: &RequestDueDiligence,
    ) -> Result<DueDiligence, ApiError> {
        self.mutate(
            MutationKind::RequestDueDiligence,
            self.api.due_diligence().request(request),
            Toast::both("Due diligence request submitted!", "Failed to submit request"),
            &[QueryKey::from(families::DUE_DILIGENCE)],
        )
        .await
    }

    /// Business news matching `filter`.
    pub fn business_news(&self, filter: NewsFilter) -> Query<Vec<BusinessNews>> {
        let key = QueryKey::from(families::BUSINESS_NEWS).with_params(&filter);
        self.query(key, move |api| {
            let filter = filter.clone();
            async move { api.policies().business_news(&filter).await }
        })
    }

    /// Ask the assistant. Only failures are notified.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn ai_query(&self, request: &AiQueryRequest) -> Result<AiQueryResponse, ApiError> {
        self.mutate(
            MutationKind::AiQuery,
            self.api.policies().ai_query(request),
            Toast::failure_only("Failed to get AI response"),
            &[],
        )
        .await
    }
}
