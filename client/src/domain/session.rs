//! Client-held session and the context object that owns it.
//!
//! A [`Session`] is created from a successful login and replaced wholesale
//! on re-login or logout. [`SessionContext`] is the only place it lives;
//! components that need it receive a clone of the context instead of
//! reaching for a global.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, TimeZone, Utc};
use mockable::{Clock, DefaultClock};
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::ports::TokenSource;
use super::profile::UserProfile;

const DEFAULT_FIRST_NAME: &str = "User";
/// Epoch values above this are read as milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Bearer token issued by the backend.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(Zeroizing::new(raw.into()))
    }

    /// Borrow the raw token for an `Authorization` header.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Errors raised while building a [`Session`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The backend returned an empty token.
    #[error("session token must not be empty")]
    EmptyToken,
    /// The profile carried no account id.
    #[error("session profile is missing an account id")]
    MissingSubject,
}

/// Denormalised profile fields read by pages and the navigation shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    /// Account identifier.
    pub id: String,
    /// Login e-mail, or empty.
    pub email: String,
    /// Given name, `"User"` when absent.
    pub first_name: String,
    /// Family name, or empty.
    pub last_name: String,
    /// `"<first> <last>"`, trimmed.
    pub display_name: String,
    /// Account category.
    pub role: Option<String>,
    /// Identity id of the business the account belongs to.
    pub business_id: Option<String>,
    /// Full profile as returned at login.
    pub profile: UserProfile,
}

impl ProfileSnapshot {
    fn derive(id: String, profile: UserProfile) -> Self {
        let first_name = profile
            .firstname
            .clone()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_owned());
        let last_name = profile.lastname.clone().unwrap_or_default();
        let display_name = format!("{first_name} {last_name}").trim().to_owned();
        Self {
            id,
            email: profile.email.clone().unwrap_or_default(),
            first_name,
            last_name,
            display_name,
            role: profile.category.clone(),
            business_id: profile.identity_id.clone(),
            profile,
        }
    }
}

/// Proof of authentication held by the client.
///
/// ## Invariants
/// - `token` is non-empty.
/// - `subject_id` equals `profile.id` and is non-empty.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    subject_id: String,
    token: AccessToken,
    token_expiry: Option<DateTime<Utc>>,
    profile: ProfileSnapshot,
}

impl Session {
    /// Build a session from the login payload fields.
    ///
    /// `token_expiry` accepts RFC 3339 or a Unix epoch (seconds or
    /// milliseconds). Anything else leaves the expiry unknown.
    pub fn new(
        token: &str,
        token_expiry: &str,
        profile: UserProfile,
    ) -> Result<Self, SessionError> {
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        let subject_id = profile
            .id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .ok_or(SessionError::MissingSubject)?;
        Ok(Self {
            profile: ProfileSnapshot::derive(subject_id.clone(), profile),
            subject_id,
            token: AccessToken::new(token),
            token_expiry: parse_token_expiry(token_expiry),
        })
    }

    /// Account id of the signed-in user.
    pub fn subject_id(&self) -> &str {
        self.subject_id.as_str()
    }

    /// Bearer token.
    pub const fn token(&self) -> &AccessToken {
        &self.token
    }

    /// Expiry instant, when the backend sent a readable one.
    pub const fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.token_expiry
    }

    /// Denormalised profile.
    pub const fn profile(&self) -> &ProfileSnapshot {
        &self.profile
    }

    /// Whether the token has expired at `now`. Unknown expiry never expires.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.token_expiry.is_some_and(|expiry| expiry <= now)
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("subject_id", &self.subject_id)
            .field("token", &self.token)
            .field("token_expiry", &self.token_expiry)
            .field("display_name", &self.profile.display_name)
            .finish_non_exhaustive()
    }
}

fn parse_token_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    let parsed = trimmed.parse::<i64>().ok().and_then(|epoch| {
        if epoch.abs() >= MILLIS_THRESHOLD {
            Utc.timestamp_millis_opt(epoch).single()
        } else {
            Utc.timestamp_opt(epoch, 0).single()
        }
    });
    if parsed.is_none() {
        warn!(token_expiry = trimmed, "unrecognised token expiry format");
    }
    parsed
}

/// Shared holder of the optional current session.
///
/// Cloning is cheap; all clones observe the same session. An expired
/// session reads as absent and is dropped on first observation.
#[derive(Clone)]
pub struct SessionContext {
    current: Arc<RwLock<Option<Arc<Session>>>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl SessionContext {
    /// Create an empty context that checks expiry against `clock`.
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            current: Arc::new(RwLock::new(None)),
            clock,
        }
    }

    /// Install `session`, replacing any previous one.
    pub fn sign_in(&self, session: Session) {
        info!(subject_id = session.subject_id(), "session started");
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(Arc::new(session));
    }

    /// Remove and return the current session.
    pub fn sign_out(&self) -> Option<Arc<Session>> {
        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        let previous = slot.take();
        if let Some(session) = &previous {
            info!(subject_id = session.subject_id(), "session ended");
        }
        previous
    }

    /// Current unexpired session.
    pub fn current(&self) -> Option<Arc<Session>> {
        let session = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()?;
        if !session.is_expired_at(self.clock.utc()) {
            return Some(session);
        }

        let mut slot = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|held| Arc::ptr_eq(held, &session)) {
            *slot = None;
            info!(subject_id = session.subject_id(), "session expired");
        }
        None
    }

    /// Whether an unexpired session exists. This is what the route guard
    /// checks.
    pub fn is_present(&self) -> bool {
        self.current().is_some()
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let current = self
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        f.debug_struct("SessionContext")
            .field("current", &current)
            .finish_non_exhaustive()
    }
}

impl TokenSource for SessionContext {
    fn access_token(&self) -> Option<AccessToken> {
        self.current().map(|session| session.token().clone())
    }
}
