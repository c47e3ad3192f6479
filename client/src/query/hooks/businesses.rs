//! Business queries and mutations.

use super::{Hooks, MutationKind, Toast};
use crate::api::businesses::{
    Business, BusinessCategory, BusinessListParams, CreateBusinessRequest, UpdateBusinessRequest,
};
use crate::api::Ack;
use crate::domain::{ApiError, QueryKey, User, families};
use crate::query::Query;

impl Hooks {
    /// All business categories.
    pub fn business_categories(&self) -> Query<Vec<BusinessCategory>> {
        self.query(QueryKey::from(families::BUSINESS_CATEGORIES), |api| async move {
            api.businesses().categories().await
        })
    }

    /// Businesses matching `params`.
    pub fn businesses(&self, params: BusinessListParams) -> Query<Vec<Business>> {
        let key = QueryKey::from(families::BUSINESSES).with_params(&params);
        self.query(key, move |api| {
            let params = params.clone();
            async move { api.businesses().list(&params).await }
        })
    }

    /// Members of a business. Disabled for an empty id.
    pub fn business_users(&self, business_id: &str) -> Query<Vec<User>> {
        let id = business_id.to_owned();
        let key = QueryKey::from(families::BUSINESS_USERS).with(&id);
        self.query(key, move |api| {
            let id = id.clone();
            async move { api.businesses().users(&id).await }
        })
        .enabled(!business_id.is_empty())
    }

    /// Accounts affiliated with a business. Disabled for an empty id.
    pub fn business_affiliations(&self, business_id: &str) -> Query<Vec<User>> {
        let id = business_id.to_owned();
        let key = QueryKey::from(families::BUSINESS_AFFILIATIONS).with(&id);
        self.query(key, move |api| {
            let id = id.clone();
            async move { api.businesses().affiliations(&id).await }
        })
        .enabled(!business_id.is_empty())
    }

    /// Create a business.
    ///
    /// # Errors
    ///
    /// Returns the creation failure, including soft rejections, after
    /// notifying it.
    pub async fn create_business(
        &self,
        request: &CreateBusinessRequest,
    ) -> Result<Option<Business>, ApiError> {
        self.mutate(
            MutationKind::CreateBusiness,
            self.api.businesses().create(request),
            Toast::both("Business created successfully!", "Failed to create business"),
            &[QueryKey::from(families::BUSINESSES)],
        )
        .await
    }

    /// Update the caller's business.
    ///
    /// # Errors
    ///
    /// Returns the update failure after notifying it.
    pub async fn update_business(
        &self,
        request: &UpdateBusinessRequest,
    ) -> Result<Business, ApiError> {
        self.mutate(
            MutationKind::UpdateBusiness,
            self.api.businesses().update(request),
            Toast::both("Business updated successfully!", "Failed to update business"),
            &[QueryKey::from(families::BUSINESSES)],
        )
        .await
    }

    /// Delete a business.
    ///
    /// # Errors
    ///
    /// Returns the deletion failure after notifying it.
    pub async fn delete_business(&self, business_id: &str) -> Result<Ack, ApiError> {
        self.mutate(
            MutationKind::DeleteBusiness,
            self.api.businesses().delete(business_id),
            Toast::both("Business deleted successfully!", "Failed to delete business"),
            &[QueryKey::from(families::BUSINESSES)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for business hooks.
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::query::hooks::test_helpers::rig;
    use serde_json::json;

    fn listed(name: &str) -> serde_json::Value {
        json!({"status": "success", "payload": [{"id": "b-1", "name": name}]})
    }

    #[tokio::test]
    async fn empty_business_id_disables_member_queries() {
        let rig = rig();
        assert!(rig.hooks.business_users("").fetch().await.is_idle());
        assert!(rig.hooks.business_affiliations("").fetch().await.is_idle());
        assert!(rig.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn create_business_refreshes_listing() {
        let rig = rig();
        rig.transport
            .respond_json(HttpMethod::Get, "/businesses", listed("Before"))
            .respond_json(HttpMethod::Get, "/businesses", listed("After"));
        rig.transport.respond_json(
            HttpMethod::Post,
            "/businesses",
            json!({"message": "Created", "status": "success", "payload": null}),
        );
        let listing = rig.hooks.businesses(BusinessListParams::default());
        listing.fetch().await;

        rig.hooks
            .create_business(&CreateBusinessRequest::default())
            .await
            .expect("created");
        let refreshed = listing.fetch().await;

        assert_eq!(
            refreshed.data().and_then(|b| b.first()).map(|b| b.name.as_str()),
            Some("After")
        );
        assert_eq!(
            rig.notifier.successes(),
            vec!["Business created successfully!".to_owned()]
        );
    }

    #[tokio::test]
    async fn soft_rejection_is_reported_with_server_text() {
        let rig = rig();
        rig.transport.respond_json(
            HttpMethod::Post,
            "/businesses",
            json!({"message": "Business name taken", "status": "failed"}),
        );
        let result = rig
            .hooks
            .create_business(&CreateBusinessRequest::default())
            .await;
        assert!(result.is_err());
        assert_eq!(rig.notifier.errors(), vec!["Business name taken".to_owned()]);
    }
}
