//! Snapshot of one cached query as seen by a caller.

use std::fmt;
use std::sync::Arc;

use crate::domain::ApiError;

/// Lifecycle of a cache entry: idle, then loading, then success or error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryStatus {
    /// Never fetched, or the query is disabled.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last settled fetch succeeded.
    Success,
    /// The last settled fetch failed.
    Error,
}

/// Result snapshot handed to callers: data, error and loading flag.
///
/// Data from an earlier success stays visible while a refetch is loading
/// or after a later failure.
pub struct QueryState<T> {
    /// Lifecycle position.
    pub status: QueryStatus,
    /// Last successful payload.
    pub data: Option<Arc<T>>,
    /// Failure of the last settled fetch.
    pub error: Option<ApiError>,
}

impl<T> QueryState<T> {
    /// State of a query that has not run.
    pub const fn idle() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
        }
    }

    /// Whether a fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// Whether the query is disabled or was never fetched.
    pub fn is_idle(&self) -> bool {
        self.status == QueryStatus::Idle
    }

    /// Borrow the payload.
    pub fn data(&self) -> Option<&T> {
        self.data.as_deref()
    }

    /// Collapse the snapshot into a `Result`, preferring the error.
    ///
    /// Returns `Ok(None)` for idle queries and for loading ones without
    /// data.
    ///
    /// # Errors
    ///
    /// Returns the stored [`ApiError`] when the last fetch failed.
    pub fn into_result(self) -> Result<Option<Arc<T>>, ApiError> {
        match self.error {
            Some(error) if self.status == QueryStatus::Error => Err(error),
            _ => Ok(self.data),
        }
    }
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
        }
    }
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self::idle()
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("status", &self.status)
            .field("data", &self.data)
            .field("error", &self.error)
            .finish()
    }
}
