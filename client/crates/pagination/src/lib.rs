//! Response envelope and page metadata primitives shared by Asideka API
//! endpoint modules.
//!
//! The backend wraps JSON payloads in one of three shapes:
//!
//! - [`StatusEnvelope`]: `{ message, status, payload }`, where a `"failed"`
//!   status is a soft failure delivered with a 2xx response.
//! - [`PagedEnvelope`]: `{ payload: [..], metadata: { .. } }` for paginated
//!   list endpoints.
//! - [`PayloadEnvelope`]: a bare `{ payload }` wrapper.
//!
//! The shapes are deliberately kept distinct; callers convert the status
//! envelope into a single `Result` via [`StatusEnvelope::into_accepted`].
//!
//! # Example
//!
//! ```
//! use pagination::{EnvelopeError, StatusEnvelope};
//!
//! let raw = r#"{"message":"Business exists","status":"failed","payload":null}"#;
//! let envelope: StatusEnvelope<serde_json::Value> =
//!     serde_json::from_str(raw).expect("valid envelope");
//! let err = envelope.into_accepted().expect_err("failed status is rejected");
//! assert_eq!(
//!     err,
//!     EnvelopeError::Rejected {
//!         message: "Business exists".to_owned()
//!     }
//! );
//! ```

mod envelope;
mod page;
mod query;

pub use envelope::{Accepted, EnvelopeError, EnvelopeStatus, PayloadEnvelope, StatusEnvelope};
pub use page::{PageMetadata, PagedEnvelope};
pub use query::{PageRequest, QueryParams, SortOrder};
