//! Unified failure type returned by every API call.
//!
//! The backend signals failure through two channels: a non-2xx HTTP status
//! and a 2xx envelope whose `status` is `"failed"`. Both surface here so
//! callers branch in one place.

use pagination::EnvelopeError;
use serde_json::Value;

use super::auth::LoginValidationError;
use super::ports::define_port_error;

define_port_error! {
    /// Errors raised while talking to the Asideka API.
    pub enum ApiError {
        /// No response was obtained (DNS, connection reset, TLS).
        Transport {
            /// Underlying transport message.
            message: String
        } => "{message}",
        /// The server answered with a non-2xx status.
        Status {
            /// HTTP status code.
            status: u16,
            /// Canonical reason phrase for `status`.
            status_text: String,
            /// Parsed JSON body, when the response carried one.
            body: Option<Value>
        } => "API Error: {status} {status_text}",
        /// The server answered 2xx but flagged the operation as failed.
        Rejected {
            /// Message supplied with the rejection.
            message: String
        } => "{message}",
        /// The response body did not match the expected shape.
        Decode {
            /// Decoder message.
            message: String
        } => "failed to decode response: {message}",
        /// The request was refused before it was sent.
        InvalidRequest {
            /// Validation message.
            message: String
        } => "invalid request: {message}",
    }
}

impl ApiError {
    /// HTTP status for protocol failures.
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Parsed error body for protocol failures that carried JSON.
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Status { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    /// Whether the server rejected the caller's credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.http_status() == Some(401)
    }

    /// Best text to show a user, or `None` when the error carries none.
    ///
    /// Prefers the `message` field of a JSON error body, then the error's
    /// own display text.
    ///
    /// # Examples
    /// ```
    /// use asideka_client::domain::ApiError;
    /// use serde_json::json;
    ///
    /// let err = ApiError::status(409_u16, "Conflict", json!({"message": "Email taken"}));
    /// assert_eq!(err.user_message().as_deref(), Some("Email taken"));
    /// assert_eq!(ApiError::rejected("").user_message(), None);
    /// ```
    pub fn user_message(&self) -> Option<String> {
        let from_body = self
            .body()
            .and_then(|body| body.get("message"))
            .and_then(Value::as_str)
            .filter(|message| !message.trim().is_empty())
            .map(str::to_owned);
        from_body.or_else(|| {
            let rendered = self.to_string();
            (!rendered.trim().is_empty()).then_some(rendered)
        })
    }
}

impl From<EnvelopeError> for ApiError {
    fn from(value: EnvelopeError) -> Self {
        match value {
            EnvelopeError::Rejected { message } => Self::rejected(message),
            EnvelopeError::MissingPayload => Self::decode(value.to_string()),
        }
    }
}

impl From<LoginValidationError> for ApiError {
    fn from(value: LoginValidationError) -> Self {
        Self::invalid_request(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(ApiError::status(500_u16, "Internal Server Error", None::<Value>), "API Error: 500 Internal Server Error")]
    #[case(ApiError::transport("connection refused"), "connection refused")]
    #[case(ApiError::rejected("Business exists"), "Business exists")]
    #[case(ApiError::decode("expected array"), "failed to decode response: expected array")]
    fn display_text(#[case] err: ApiError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    #[case(json!({"message": "Invalid password"}), "Invalid password")]
    #[case(json!({"message": "  "}), "API Error: 400 Bad Request")]
    #[case(json!({"error": "nope"}), "API Error: 400 Bad Request")]
    fn user_message_prefers_body_message(#[case] body: Value, #[case] expected: &str) {
        let err = ApiError::status(400_u16, "Bad Request", body);
        assert_eq!(err.user_message().as_deref(), Some(expected));
    }

    #[test]
    fn status_accessors_only_apply_to_protocol_failures() {
        let err = ApiError::status(401_u16, "Unauthorized", None::<Value>);
        assert_eq!(err.http_status(), Some(401));
        assert!(err.is_unauthorized());
        assert!(err.body().is_none());

        let transport = ApiError::transport("dns");
        assert_eq!(transport.http_status(), None);
        assert!(!transport.is_unauthorized());
    }

    #[test]
    fn envelope_errors_fold_into_api_errors() {
        let rejected: ApiError = EnvelopeError::Rejected {
            message: "Duplicate".to_owned(),
        }
        .into();
        assert_eq!(rejected, ApiError::rejected("Duplicate"));

        let missing: ApiError = EnvelopeError::MissingPayload.into();
        assert!(matches!(missing, ApiError::Decode { .. }));
    }

    #[test]
    fn blank_credentials_become_invalid_requests() {
        let err: ApiError = LoginValidationError::EmptyPassword.into();
        assert_eq!(err.to_string(), "invalid request: password must not be empty");
    }
}
