//! Status-bearing and bare payload envelopes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Outcome flag carried by [`StatusEnvelope`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    /// The backend accepted the operation.
    #[default]
    Success,
    /// The backend refused the operation despite a 2xx response.
    Failed,
    /// Any status string the backend has not documented.
    #[serde(other)]
    Unknown,
}

/// Errors raised while unwrapping an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    /// The envelope reported `status: "failed"`.
    #[error("request rejected: {message}")]
    Rejected {
        /// Message supplied by the backend alongside the failure.
        message: String,
    },
    /// The envelope succeeded but carried no payload where one is required.
    #[error("response envelope is missing its payload")]
    MissingPayload,
}

/// Envelope family `{ message, status, payload }`.
///
/// ## Invariants
/// - A missing `status` is read as [`EnvelopeStatus::Success`].
/// - A missing or `null` payload is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEnvelope<T> {
    /// Human-readable message from the backend.
    #[serde(default)]
    pub message: String,
    /// Outcome flag.
    #[serde(default)]
    pub status: EnvelopeStatus,
    /// Operation payload.
    pub payload: Option<T>,
}

/// Successful status envelope with the failure channel removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Accepted<T> {
    /// Human-readable message from the backend.
    pub message: String,
    /// Operation payload, when the backend returned one.
    pub payload: Option<T>,
}

impl<T> StatusEnvelope<T> {
    /// Whether the backend flagged this response as a soft failure.
    pub fn is_failed(&self) -> bool {
        self.status == EnvelopeStatus::Failed
    }

    /// Fold the soft failure channel into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Rejected`] when `status` is `"failed"`.
    pub fn into_accepted(self) -> Result<Accepted<T>, EnvelopeError> {
        if self.is_failed() {
            return Err(EnvelopeError::Rejected {
                message: self.message,
            });
        }
        Ok(Accepted {
            message: self.message,
            payload: self.payload,
        })
    }
}

impl<T> Accepted<T> {
    /// Return the payload, failing when the backend omitted it.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::MissingPayload`] when no payload was sent.
    pub fn require_payload(self) -> Result<T, EnvelopeError> {
        self.payload.ok_or(EnvelopeError::MissingPayload)
    }
}

/// Bare `{ payload }` wrapper used by message and news endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadEnvelope<T> {
    /// Wrapped payload.
    pub payload: T,
}

impl<T> PayloadEnvelope<T> {
    /// Unwrap the payload.
    pub fn into_inner(self) -> T {
        self.payload
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for envelope decoding.
    #![expect(
        clippy::expect_used,
        reason = "test code uses expect for clear failure messages"
    )]

    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case(json!({"message": "ok", "status": "success", "payload": 1}), EnvelopeStatus::Success)]
    #[case(json!({"message": "no", "status": "failed", "payload": null}), EnvelopeStatus::Failed)]
    #[case(json!({"message": "hm", "status": "pending"}), EnvelopeStatus::Unknown)]
    #[case(json!({"payload": 3}), EnvelopeStatus::Success)]
    fn decodes_status_flag(#[case] raw: Value, #[case] expected: EnvelopeStatus) {
        let envelope: StatusEnvelope<u32> = serde_json::from_value(raw).expect("decodes");
        assert_eq!(envelope.status, expected);
    }

    #[test]
    fn failed_status_becomes_rejection() {
        let envelope: StatusEnvelope<u32> = serde_json::from_value(json!({
            "message": "Business name already taken",
            "status": "failed",
            "payload": null
        }))
        .expect("decodes");

        let err = envelope.into_accepted().expect_err("must reject");
        assert_eq!(
            err,
            EnvelopeError::Rejected {
                message: "Business name already taken".to_owned()
            }
        );
    }

    #[test]
    fn unknown_status_is_not_a_soft_failure() {
        let envelope: StatusEnvelope<u32> =
            serde_json::from_value(json!({"status": "queued", "payload": 7})).expect("decodes");
        let accepted = envelope.into_accepted().expect("unknown status passes");
        assert_eq!(accepted.payload, Some(7));
    }

    #[test]
    fn require_payload_rejects_null() {
        let envelope: StatusEnvelope<u32> =
            serde_json::from_value(json!({"message": "done", "status": "success", "payload": null}))
                .expect("decodes");
        let accepted = envelope.into_accepted().expect("success");
        assert_eq!(accepted.message, "done");
        assert_eq!(
            accepted.require_payload(),
            Err(EnvelopeError::MissingPayload)
        );
    }

    #[test]
    fn payload_envelope_unwraps() {
        let envelope: PayloadEnvelope<Vec<String>> =
            serde_json::from_value(json!({"payload": ["a", "b"]})).expect("decodes");
        assert_eq!(envelope.into_inner(), vec!["a".to_owned(), "b".to_owned()]);
    }
}
