//! `/authentication/*` endpoints.

use pagination::{EnvelopeStatus, StatusEnvelope};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{AccountRegistration, ApiError, LoginCredentials, Session, UserProfile};

const LOGIN_REJECTED: &str = "Invalid username or password";

/// Payload of a successful login or account creation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    /// Bearer token.
    pub token: String,
    /// Token expiry as sent by the backend.
    #[serde(default)]
    pub token_expiry: String,
    /// Profile of the authenticated user.
    #[serde(default)]
    pub user_profile: UserProfile,
}

impl AuthPayload {
    /// Build the client session this payload describes.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the token or account id is missing.
    pub fn into_session(self) -> Result<Session, ApiError> {
        Session::new(&self.token, &self.token_expiry, self.user_profile)
            .map_err(|error| ApiError::decode(error.to_string()))
    }
}

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAccountBody<'a> {
    username: &'a str,
    password: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone_number: Option<&'a str>,
}

/// Body for `/authentication/change-password`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Reset or session token authorising the change.
    pub token: String,
    /// Replacement password.
    pub new_password: String,
}

#[derive(Serialize)]
struct EmailBody<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct TokenBody<'a> {
    token: &'a str,
}

/// Authentication endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AuthApi<'a> {
    client: &'a SessionClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `POST /authentication/login`.
    ///
    /// Only an envelope with `status: "success"` and a payload counts as a
    /// successful login.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] for any other envelope, plus transport
    /// and protocol failures.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<AuthPayload, ApiError> {
        let body = LoginBody {
            username: credentials.username(),
            password: credentials.password(),
        };
        let request = ApiRequest::post("/authentication/login", &body)?.public();
        let envelope: StatusEnvelope<AuthPayload> = self.client.fetch(request).await?;
        match (envelope.status, envelope.payload) {
            (EnvelopeStatus::Success, Some(payload)) => Ok(payload),
            _ if envelope.message.trim().is_empty() => Err(ApiError::rejected(LOGIN_REJECTED)),
            _ => Err(ApiError::rejected(envelope.message)),
        }
    }

    /// `POST /authentication/create-account`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the account.
    pub async fn create_account(
        &self,
        registration: &AccountRegistration,
    ) -> Result<Option<AuthPayload>, ApiError> {
        let credentials = registration.credentials();
        let body = CreateAccountBody {
            username: credentials.username(),
            password: credentials.password(),
            first_name: registration.first_name(),
            last_name: registration.last_name(),
            phone_number: registration.phone_number(),
        };
        let request = ApiRequest::post("/authentication/create-account", &body)?.public();
        Ok(self.client.fetch_enveloped(request).await?.payload)
    }

    /// `POST /authentication/change-password`. Returns the server message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the change.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<String, ApiError> {
        let api_request = ApiRequest::post("/authentication/change-password", request)?;
        self.acknowledge(api_request).await
    }

    /// `POST /authentication/forgot-password`. Returns the server message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the backend refuses the request.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        let request =
            ApiRequest::post("/authentication/forgot-password", &EmailBody { email })?.public();
        self.acknowledge(request).await
    }

    /// `POST /authentication/verify-token`. Returns the server message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the token is not accepted.
    pub async fn verify_token(&self, token: &str) -> Result<String, ApiError> {
        let request =
            ApiRequest::post("/authentication/verify-token", &TokenBody { token })?.public();
        self.acknowledge(request).await
    }

    async fn acknowledge(&self, request: ApiRequest) -> Result<String, ApiError> {
        let accepted = self.client.fetch_enveloped::<IgnoredAny>(request).await?;
        Ok(accepted.message)
    }
}
