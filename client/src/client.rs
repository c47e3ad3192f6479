//! Session-aware API client.
//!
//! Every endpoint module calls through [`SessionClient`]. It resolves the
//! current token from a [`TokenSource`] and attaches it to requests that
//! require authentication, then decodes the response into the caller's
//! type. Envelope soft failures are folded into [`ApiError::Rejected`] here
//! so callers check a single `Result`.

use std::fmt;
use std::sync::Arc;

use pagination::{Accepted, StatusEnvelope};
use serde::de::DeserializeOwned;

use crate::domain::ports::{ApiRequest, HttpTransport, NoSession, ResponseBody, TokenSource};
use crate::domain::ApiError;

/// Client that attaches the session token and decodes responses.
#[derive(Clone)]
pub struct SessionClient {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<dyn TokenSource>,
}

impl SessionClient {
    /// Build a client over `transport` that reads tokens from `tokens`.
    pub fn new(transport: Arc<dyn HttpTransport>, tokens: Arc<dyn TokenSource>) -> Self {
        Self { transport, tokens }
    }

    /// Build a client that never attaches a token.
    pub fn without_session(transport: Arc<dyn HttpTransport>) -> Self {
        Self::new(transport, Arc::new(NoSession))
    }

    /// Send `request` and return the raw body.
    ///
    /// # Errors
    ///
    /// Propagates the transport's [`ApiError`] unchanged.
    pub async fn send(&self, request: ApiRequest) -> Result<ResponseBody, ApiError> {
        let bearer = if request.requires_auth {
            self.tokens.access_token()
        } else {
            None
        };
        self.transport.send(request, bearer).await
    }

    /// Send `request` and decode the body as `R`. An empty body decodes
    /// from `{}`.
    ///
    /// # Errors
    ///
    /// Returns transport errors, or [`ApiError::Decode`] when the body does
    /// not match `R`.
    pub async fn fetch<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let body = self.send(request).await?;
        decode(body)
    }

    /// Send `request` and unwrap a `{message, status, payload}` envelope.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Rejected`] when the envelope reports
    /// `status: "failed"`, plus everything [`Self::fetch`] returns.
    pub async fn fetch_enveloped<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Accepted<R>, ApiError> {
        let envelope: StatusEnvelope<R> = self.fetch(request).await?;
        Ok(envelope.into_accepted()?)
    }
}

impl fmt::Debug for SessionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClient").finish_non_exhaustive()
    }
}

fn decode<R: DeserializeOwned>(body: ResponseBody) -> Result<R, ApiError> {
    serde_json::from_value(body.into_value()).map_err(|error| ApiError::decode(error.to_string()))
}
