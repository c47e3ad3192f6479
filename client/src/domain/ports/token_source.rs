//! Port that yields the bearer token for the current caller.

use crate::domain::AccessToken;

/// Resolves the token to attach to authenticated requests.
#[cfg_attr(test, mockall::automock)]
pub trait TokenSource: Send + Sync {
    /// Token for the active session, if any.
    fn access_token(&self) -> Option<AccessToken>;
}

/// Token source for callers that never hold a session.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSession;

impl TokenSource for NoSession {
    fn access_token(&self) -> Option<AccessToken> {
        None
    }
}
