//! Reqwest-backed HTTP transport.
//!
//! This adapter owns transport details only: header assembly, status
//! mapping and JSON decoding. It never retries and sets no timeout.

use async_trait::async_trait;
use reqwest::header::{
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use reqwest::{Client, Method, Response, StatusCode};
use serde_json::Value;
use tracing::warn;
use url::Url;

use crate::domain::ports::{ApiRequest, HttpMethod, HttpTransport, ResponseBody};
use crate::domain::{AccessToken, ApiError};

const JSON_CONTENT_TYPE: &str = "application/json";

/// Transport that sends requests to one base origin.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Build a transport for `base_url` with the given user agent.
    /// ```rust,ignore
    /// let transport = ReqwestTransport::new(&base_url, "asideka-client/0.1.0");
    /// assert!(transport.is_ok() || transport.is_err());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: &Url, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Wrap an existing reqwest client.
    pub fn with_client(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    /// Base origin requests are sent to, without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(
        &self,
        request: ApiRequest,
        bearer: Option<AccessToken>,
    ) -> Result<ResponseBody, ApiError> {
        let url = self.url_for(&request.path);
        let headers = build_headers(&request.headers)?;
        let mut builder = self
            .client
            .request(to_method(request.method), url.as_str())
            .headers(headers);
        if let Some(token) = &bearer {
            builder = builder.bearer_auth(token.expose());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await.map_err(|error| {
            warn!(url = %url, method = request.method.as_str(), error = %error, "request failed");
            ApiError::transport(error.to_string())
        })?;
        read_response(response, &url).await
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    for (name, value) in extra {
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|error| {
            ApiError::invalid_request(format!("invalid header name {name:?}: {error}"))
        })?;
        let header_value = HeaderValue::from_str(value).map_err(|error| {
            ApiError::invalid_request(format!("invalid value for header {name}: {error}"))
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

async fn read_response(response: Response, url: &str) -> Result<ResponseBody, ApiError> {
    let status = response.status();
    let status_text = status_text(status);

    if status == StatusCode::NO_CONTENT || declares_empty_body(response.headers()) {
        return Ok(ResponseBody::Empty);
    }

    if !is_json(response.headers()) {
        if status.is_success() {
            return Ok(ResponseBody::Empty);
        }
        warn!(url, status = status.as_u16(), "non-JSON error response");
        return Err(ApiError::status(status.as_u16(), status_text, None::<Value>));
    }

    let bytes = response.bytes().await.map_err(|error| {
        warn!(url, status = status.as_u16(), error = %error, "failed to read response body");
        ApiError::transport(error.to_string())
    })?;
    let data: Value = serde_json::from_slice(&bytes).map_err(|error| {
        warn!(url, status = status.as_u16(), error = %error, "invalid JSON response");
        ApiError::decode(format!("invalid JSON payload: {error}"))
    })?;

    if !status.is_success() {
        warn!(url, status = status.as_u16(), body = %data, "API error response");
        return Err(ApiError::status(status.as_u16(), status_text, data));
    }
    Ok(ResponseBody::Json(data))
}

fn status_text(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_owned()
}

fn declares_empty_body(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|length| length.trim() == "0")
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| content_type.contains(JSON_CONTENT_TYPE))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for header and status helpers.
    use super::*;
    use rstest::rstest;

    #[test]
    fn custom_headers_replace_defaults() {
        let headers = build_headers(&[
            ("Content-Type".to_owned(), "text/plain".to_owned()),
            ("X-Trace".to_owned(), "abc".to_owned()),
        ])
        .expect("valid headers");
        assert_eq!(headers.get_all(CONTENT_TYPE).iter().count(), 1);
        assert_eq!(
            headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("text/plain")
        );
        assert_eq!(
            headers.get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        assert!(headers.contains_key("x-trace"));
    }

    #[test]
    fn invalid_header_names_are_rejected() {
        let err = build_headers(&[("bad header".to_owned(), "x".to_owned())])
            .expect_err("space is not a valid header name");
        assert!(matches!(err, ApiError::InvalidRequest { .. }));
    }

    #[rstest]
    #[case("application/json", true)]
    #[case("application/json; charset=utf-8", true)]
    #[case("text/html", false)]
    fn detects_json_content(#[case] content_type: &'static str, #[case] expected: bool) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        assert_eq!(is_json(&headers), expected);
    }

    #[rstest]
    #[case("0", true)]
    #[case("12", false)]
    fn detects_declared_empty_body(#[case] length: &'static str, #[case] expected: bool) {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static(length));
        assert_eq!(declares_empty_body(&headers), expected);
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        let base = Url::parse("https://api.example.test/").expect("valid url");
        let transport = ReqwestTransport::with_client(Client::new(), &base);
        assert_eq!(transport.url_for("/posts?page=2"), "https://api.example.test/posts?page=2");
    }

    #[rstest]
    #[case(StatusCode::NOT_FOUND, "Not Found")]
    #[case(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")]
    fn status_text_uses_canonical_reason(#[case] status: StatusCode, #[case] expected: &str) {
        assert_eq!(status_text(status), expected);
    }
}
