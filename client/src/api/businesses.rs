//! `/businesses/*` endpoints.

use pagination::{PageRequest, QueryParams, SortOrder};
use serde::{Deserialize, Serialize};

use super::Ack;
use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User};

/// Business profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Business {
    /// Record id.
    pub id: String,
    /// Public business id.
    pub business_id: String,
    /// Identity id of the owning account.
    pub identity_id: String,
    /// Trading name.
    pub name: String,
    /// Description.
    pub bio: String,
    /// Category name.
    pub category: String,
    /// Category id.
    pub category_id: String,
    /// Country name.
    pub country: String,
    /// ISO country code.
    pub country_code: String,
    /// Contact e-mail.
    pub email: String,
    /// Contact number.
    pub phone_number: String,
    /// Website.
    pub website: String,
    /// Logo URL.
    pub profile_picture: String,
    /// Banner URL.
    pub banner_image: String,
    /// Registration document URL.
    pub business_document: String,
}

/// Business category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessCategory {
    /// Category id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body for `POST /businesses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBusinessRequest {
    /// Trading name.
    pub name: String,
    /// Category id.
    pub category: String,
    /// Country name.
    pub country: String,
    /// ISO country code.
    pub country_code: String,
    /// Description.
    pub bio: String,
    /// Photo URLs.
    pub photos: Vec<String>,
}

/// Body for `PUT /businesses`. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    /// Trading name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Postal address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Contact number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// Contact e-mail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Website.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Logo URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Body for verifying or disabling a business member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUserRequest {
    /// Member account id.
    pub user_id: String,
    /// Business id.
    pub business_id: String,
}

/// Body for `POST /businesses/users/add`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBusinessUserRequest {
    /// Invitee e-mail.
    pub email: String,
    /// Business id.
    pub business_id: String,
    /// Role granted to the invitee.
    pub role: String,
}

/// Filters for `GET /businesses`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessListParams {
    /// Page selection.
    pub page: PageRequest,
    /// Restrict to one category.
    pub category_id: Option<String>,
    /// Free-text filter.
    pub query: Option<String>,
    /// Sort field.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl BusinessListParams {
    fn path(&self) -> String {
        QueryParams::new()
            .page(self.page)
            .push_opt("categoryId", self.category_id.as_deref())
            .push_opt("query", self.query.as_deref())
            .push_opt("sortBy", self.sort_by.as_deref())
            .push_opt("sortOrder", self.sort_order)
            .finish("/businesses")
    }
}

/// Business endpoints.
#[derive(Debug, Clone, Copy)]
pub struct BusinessesApi<'a> {
    client: &'a SessionClient,
}

impl<'a> BusinessesApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /businesses/categories`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and rejection failures.
    pub async fn categories(&self) -> Result<Vec<BusinessCategory>, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::get("/businesses/categories"))
            .await?;
        Ok(accepted.payload.unwrap_or_default())
    }

    /// `GET /businesses` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and rejection failures.
    pub async fn list(&self, params: &BusinessListParams) -> Result<Vec<Business>, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::get(params.path()))
            .await?;
        Ok(accepted.payload.unwrap_or_default())
    }

    /// `POST /businesses`. The backend may accept without echoing the
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the envelope reports a failure.
    pub async fn create(
        &self,
        request: &CreateBusinessRequest,
    ) -> Result<Option<Business>, ApiError> {
        let accepted = self
            .client
            .fetch_enveloped(ApiRequest::post("/businesses", request)?)
            .await?;
        Ok(accepted.payload)
    }

    /// `PUT /businesses`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn update(&self, request: &UpdateBusinessRequest) -> Result<Business, ApiError> {
        self.client
            .fetch(ApiRequest::put("/businesses", request)?)
            .await
    }

    /// `DELETE /businesses?businessId=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn delete(&self, business_id: &str) -> Result<Ack, ApiError> {
        let path = QueryParams::new()
            .push("businessId", business_id)
            .finish("/businesses");
        self.client.fetch(ApiRequest::delete(path)).await
    }

    /// `GET /businesses/affiliations?businessId=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn affiliations(&self, business_id: &str) -> Result<Vec<User>, ApiError> {
        let path = QueryParams::new()
            .push("businessId", business_id)
            .finish("/businesses/affiliations");
        self.client.fetch(ApiRequest::get(path)).await
    }

    /// `GET /businesses/users?businessId=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn users(&self, business_id: &str) -> Result<Vec<User>, ApiError> {
        let path = QueryParams::new()
            .push("businessId", business_id)
            .finish("/businesses/users");
        self.client.fetch(ApiRequest::get(path)).await
    }

    /// `POST /businesses/users/verify`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn verify_user(&self, request: &BusinessUserRequest) -> Result<Ack, ApiError> {
        self.client
            .fetch(ApiRequest::post("/businesses/users/verify", request)?)
            .await
    }

    /// `POST /businesses/users/disable`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn disable_user(&self, request: &BusinessUserRequest) -> Result<Ack, ApiError> {
        self.client
            .fetch(ApiRequest::post("/businesses/users/disable", request)?)
            .await
    }

    /// `POST /businesses/users/add`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn add_user(&self, request: &AddBusinessUserRequest) -> Result<Ack, ApiError> {
        self.client
            .fetch(ApiRequest::post("/businesses/users/add", request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::api::test_helpers::scripted_api;
    use crate::domain::ports::HttpMethod;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(BusinessListParams::default(), "/businesses")]
    #[case(
        BusinessListParams {
            page: PageRequest::new(2, 20),
            query: Some("agro".to_owned()),
            sort_order: Some(SortOrder::Asc),
            ..BusinessListParams::default()
        },
        "/businesses?page=2&limit=20&query=agro&sortOrder=asc"
    )]
    #[case(
        BusinessListParams {
            category_id: Some(String::new()),
            sort_by: Some("name".to_owned()),
            ..BusinessListParams::default()
        },
        "/businesses?sortBy=name"
    )]
    fn list_path_skips_unset_filters(#[case] params: BusinessListParams, #[case] expected: &str) {
        assert_eq!(params.path(), expected);
    }

    #[tokio::test]
    async fn list_unwraps_envelope_payload() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/businesses",
            json!({
                "message": "ok",
                "status": "success",
                "payload": [{"id": "b-1", "name": "Acme", "extra": 1}]
            }),
        );
        let businesses = api
            .businesses()
            .list(&BusinessListParams::default())
            .await
            .expect("listed");
        assert_eq!(businesses.len(), 1);
        assert_eq!(businesses.first().map(|b| b.name.as_str()), Some("Acme"));
    }

    #[tokio::test]
    async fn create_surfaces_soft_failure_as_rejection() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Post,
            "/businesses",
            json!({"message": "Business name taken", "status": "failed", "payload": null}),
        );
        let err = api
            .businesses()
            .create(&CreateBusinessRequest::default())
            .await
            .expect_err("soft failure");
        assert_eq!(err, ApiError::rejected("Business name taken"));
    }

    #[tokio::test]
    async fn delete_encodes_business_id() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Delete,
            "/businesses?businessId=b+1",
            json!({"message": "Deleted"}),
        );
        let ack = api.businesses().delete("b 1").await.expect("deleted");
        assert_eq!(ack.message.as_deref(), Some("Deleted"));
    }

    #[tokio::test]
    async fn users_decode_bare_arrays() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/businesses/users?businessId=b-1",
            json!([{"id": "u-1", "email": "a@b.c", "firstName": "Ada", "lastName": "L"}]),
        );
        let users = api.businesses().users("b-1").await.expect("users");
        assert_eq!(users.first().map(User::display_name).as_deref(), Some("Ada L"));
    }
}
