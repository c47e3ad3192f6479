//! Data-fetching layer: a shared cache plus bound queries and mutations.
//!
//! A [`Query`] ties one endpoint call to one [`QueryKey`]. Fetching goes
//! through the [`QueryCache`], which deduplicates identical keys and serves
//! fresh results. Mutations live on [`Hooks`] and invalidate related key
//! prefixes when they succeed.

pub mod cache;
pub mod hooks;
pub mod state;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use futures_util::future::BoxFuture;

pub use self::cache::{DEFAULT_FRESH_FOR, QueryCache};
pub use self::hooks::{Hooks, MutationKind};
pub use self::state::{QueryState, QueryStatus};
use crate::domain::{ApiError, QueryKey};

type Fetcher<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync>;

/// Endpoint call bound to a cache key.
pub struct Query<T> {
    cache: Arc<QueryCache>,
    key: QueryKey,
    enabled: bool,
    fetcher: Fetcher<T>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> Query<T> {
    /// Bind `fetcher` to `key` in `cache`.
    pub fn new<F>(cache: Arc<QueryCache>, key: QueryKey, fetcher: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<T, ApiError>> + Send + Sync + 'static,
    {
        Self {
            cache,
            key,
            enabled: true,
            fetcher: Arc::new(fetcher),
            _marker: PhantomData,
        }
    }

    /// Enable or disable the query. A disabled query stays idle and never
    /// calls the network.
    #[must_use]
    pub const fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Whether the query will run.
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Cache key of this query.
    pub const fn key(&self) -> &QueryKey {
        &self.key
    }

    /// Resolve through the cache.
    pub async fn fetch(&self) -> QueryState<T> {
        self.run(false).await
    }

    /// Fetch from the network even when a fresh result is cached.
    pub async fn refetch(&self) -> QueryState<T> {
        self.run(true).await
    }

    /// Cached state without fetching.
    pub fn peek(&self) -> QueryState<T> {
        if !self.enabled {
            return QueryState::idle();
        }
        self.cache.snapshot(&self.key)
    }

    async fn run(&self, force: bool) -> QueryState<T> {
        if !self.enabled {
            return QueryState::idle();
        }
        let fetcher = Arc::clone(&self.fetcher);
        self.cache.fetch(&self.key, move || fetcher(), force).await
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("key", &self.key)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for bound queries.
    use std::sync::atomic::{AtomicUsize, Ordering};

    use futures_util::FutureExt;

    use super::*;
    use crate::domain::families;

    fn counting_query(calls: &Arc<AtomicUsize>) -> Query<u32> {
        let calls = Arc::clone(calls);
        Query::new(
            Arc::new(QueryCache::default()),
            QueryKey::from(families::SEARCH).with(""),
            move || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok(u32::try_from(n).unwrap_or(u32::MAX)) }.boxed()
            },
        )
    }

    #[tokio::test]
    async fn disabled_query_never_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&calls).enabled(false);
        let state = query.fetch().await;
        assert!(state.is_idle());
        assert!(query.refetch().await.is_idle());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn refetch_bypasses_fresh_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let query = counting_query(&calls);
        assert_eq!(query.fetch().await.data(), Some(&0));
        assert_eq!(query.fetch().await.data(), Some(&0));
        assert_eq!(query.refetch().await.data(), Some(&1));
        assert_eq!(query.peek().data(), Some(&1));
    }
}
