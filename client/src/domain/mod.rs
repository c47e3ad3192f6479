//! Domain primitives shared by the client, endpoint and hooks layers.
//!
//! Purpose: define the session model, credential validation, the unified
//! API error, cache keys, the route guard and the ports that outbound
//! adapters implement. Nothing here performs I/O.
//!
//! Public surface:
//! - `ApiError`: single failure type for every API call.
//! - `LoginCredentials` / `AccountRegistration`: validated auth inputs.
//! - `Session` / `SessionContext`: client-held proof of authentication.
//! - `UserProfile` / `User`: backend user records.
//! - `QueryKey`: cache key with prefix-based invalidation.
//! - `route_guard` / `navigation`: pure navigation decisions.

pub mod auth;
pub mod error;
pub mod navigation;
pub mod ports;
pub mod profile;
pub mod query_key;
pub mod route_guard;
pub mod session;

pub use self::auth::{AccountRegistration, LoginCredentials, LoginValidationError};
pub use self::error::ApiError;
pub use self::profile::{User, UserProfile};
pub use self::query_key::{QueryFamily, QueryKey, QueryKeyValidationError, families};
pub use self::route_guard::{Navigation, RouteDecision, Zone};
pub use self::session::{AccessToken, ProfileSnapshot, Session, SessionContext, SessionError};

/// Result alias for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
