//! Driven port for issuing one HTTP request against the Asideka API.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::domain::{AccessToken, ApiError};

/// HTTP verbs used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Upper-case verb.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

/// One request to send, built per call and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// Path relative to the base origin, including any query string.
    pub path: String,
    /// Verb.
    pub method: HttpMethod,
    /// JSON body.
    pub body: Option<Value>,
    /// Extra headers; these replace defaults of the same name.
    pub headers: Vec<(String, String)>,
    /// Whether the session token should be attached.
    pub requires_auth: bool,
}

impl ApiRequest {
    fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            body: None,
            headers: Vec::new(),
            requires_auth: true,
        }
    }

    /// Authenticated `GET`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// Authenticated `DELETE`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Authenticated `POST` carrying `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when `body` cannot be serialised.
    pub fn post<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// Authenticated `PUT` carrying `body` as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidRequest`] when `body` cannot be serialised.
    pub fn put<B: Serialize + ?Sized>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    fn with_body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|error| ApiError::invalid_request(format!("unserialisable body: {error}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Send without the session token.
    #[must_use]
    pub fn public(mut self) -> Self {
        self.requires_auth = false;
        self
    }

    /// Add or replace a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// 204, zero-length, or a successful non-JSON response.
    Empty,
    /// Parsed JSON, exactly as received.
    Json(Value),
}

impl ResponseBody {
    /// The JSON value, with an empty body read as `{}`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Object(serde_json::Map::new()),
            Self::Json(value) => value,
        }
    }
}

/// Port that performs one network call.
///
/// Implementations must normalise every failure into [`ApiError`] and must
/// not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request`, attaching `bearer` as an `Authorization` header when
    /// present.
    async fn send(
        &self,
        request: ApiRequest,
        bearer: Option<AccessToken>,
    ) -> Result<ResponseBody, ApiError>;
}
