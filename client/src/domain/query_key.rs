//! Cache keys for data-fetching queries.
//!
//! A key is a family name followed by ordered parts derived from the
//! query's parameters, e.g. `["interaction-summary", "post-7"]`.
//! Invalidation matches by prefix, so invalidating `["posts"]` marks every
//! posts listing stale regardless of its parameters.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

/// Named key family known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryFamily(&'static str);

impl QueryFamily {
    /// Family name.
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Families used by the hooks layer.
pub mod families {
    use super::QueryFamily;

    /// Current session snapshot.
    pub const SESSION: QueryFamily = QueryFamily("session");
    /// Business categories.
    pub const BUSINESS_CATEGORIES: QueryFamily = QueryFamily("business-categories");
    /// Business listings.
    pub const BUSINESSES: QueryFamily = QueryFamily("businesses");
    /// Members of one business.
    pub const BUSINESS_USERS: QueryFamily = QueryFamily("business-users");
    /// Affiliations of one business.
    pub const BUSINESS_AFFILIATIONS: QueryFamily = QueryFamily("business-affiliations");
    /// Post listings.
    pub const POSTS: QueryFamily = QueryFamily("posts");
    /// Interaction listings.
    pub const INTERACTIONS: QueryFamily = QueryFamily("interactions");
    /// Per-post interaction counters.
    pub const INTERACTION_SUMMARY: QueryFamily = QueryFamily("interaction-summary");
    /// Per-post, per-kind interaction flags.
    pub const HAS_INTERACTED: QueryFamily = QueryFamily("has-interacted");
    /// Message thread list.
    pub const MESSAGE_THREADS: QueryFamily = QueryFamily("message-threads");
    /// Messages exchanged with one user.
    pub const THREAD_MESSAGES: QueryFamily = QueryFamily("thread-messages");
    /// Legacy message listing.
    pub const MESSAGES: QueryFamily = QueryFamily("messages");
    /// Messages exchanged with one user, as read by the chat view.
    pub const MESSAGE_THREAD: QueryFamily = QueryFamily("message-thread");
    /// Text search results.
    pub const SEARCH: QueryFamily = QueryFamily("search");
    /// Due-diligence requests.
    pub const DUE_DILIGENCE: QueryFamily = QueryFamily("due-diligence");
    /// Business news feed.
    pub const BUSINESS_NEWS: QueryFamily = QueryFamily("business-news");
    /// Signed-in user's profile.
    pub const USER_PROFILE: QueryFamily = QueryFamily("user-profile");
}

/// Key under which a query result is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    parts: Vec<String>,
}

impl QueryKey {
    /// Construct a key for a family chosen at runtime.
    pub fn new(family: impl Into<String>) -> Result<Self, QueryKeyValidationError> {
        let raw = family.into();
        if raw.trim().is_empty() {
            return Err(QueryKeyValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(QueryKeyValidationError::ContainsWhitespace);
        }
        Ok(Self { parts: vec![raw] })
    }

    /// Append a parameter part.
    #[must_use]
    pub fn with(mut self, part: impl fmt::Display) -> Self {
        self.parts.push(part.to_string());
        self
    }

    /// Append parameters rendered as canonical JSON, so equal parameter
    /// sets produce equal keys.
    ///
    /// Parameters that cannot be rendered append an empty part and log a
    /// warning.
    #[must_use]
    pub fn with_params<P: Serialize>(self, params: &P) -> Self {
        let rendered = serde_json::to_string(params).unwrap_or_else(|error| {
            warn!(
                family = self.family(),
                error = %error,
                "query parameters could not be rendered into the cache key"
            );
            String::new()
        });
        self.with(rendered)
    }

    /// Family name.
    pub fn family(&self) -> &str {
        self.parts.first().map_or("", String::as_str)
    }

    /// All parts, family first.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether `prefix` matches the leading parts of this key.
    pub fn starts_with(&self, prefix: &Self) -> bool {
        self.parts.starts_with(&prefix.parts)
    }
}

impl From<QueryFamily> for QueryKey {
    fn from(family: QueryFamily) -> Self {
        Self {
            parts: vec![family.as_str().to_owned()],
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parts.join(":"))
    }
}

/// Validation errors returned when constructing [`QueryKey`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryKeyValidationError {
    /// Family is empty after trimming whitespace.
    #[error("query key family must not be empty")]
    Empty,
    /// Family contains leading or trailing whitespace.
    #[error("query key family must not contain surrounding whitespace")]
    ContainsWhitespace,
}
