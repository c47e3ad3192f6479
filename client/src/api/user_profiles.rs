//! `/user-profiles` endpoints.

use serde::Serialize;

use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User, UserProfile};

const PATH: &str = "/user-profiles";

/// Account-level fields accepted by `PUT /user-profiles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    /// New given name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// New family name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// New phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    /// New biography.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// New cover image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

/// Profile endpoints.
#[derive(Debug, Clone, Copy)]
pub struct UserProfilesApi<'a> {
    client: &'a SessionClient,
}

impl<'a> UserProfilesApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /user-profiles`: the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn get(&self) -> Result<UserProfile, ApiError> {
        self.client.fetch(ApiRequest::get(PATH)).await
    }

    /// `PUT /user-profiles` with a partial profile. Unset fields are not
    /// sent.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn update(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.client.fetch(ApiRequest::put(PATH, profile)?).await
    }

    /// `PUT /user-profiles` with account-level fields.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn update_account(&self, request: &UpdateAccountRequest) -> Result<User, ApiError> {
        self.client.fetch(ApiRequest::put(PATH, request)?).await
    }
}
