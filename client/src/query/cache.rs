//! In-memory query cache.
//!
//! Entries are keyed by [`QueryKey`] and hold the last settled payload of
//! any type. Concurrent fetches of the same key share one in-flight request
//! unless the caller forces a refetch. A settled result is served without a
//! network call while it is younger than the freshness window and has not
//! been invalidated.
//!
//! ## Invariants
//! - The lock is never held across an `.await`.
//! - Every fetch runs as its own Tokio task and settles the cache itself,
//!   whether or not any caller is still waiting for it.
//! - Every fetch gets a ticket. A ticket writes its result at most once, and
//!   the last ticket to settle wins, except that a result dispatched before
//!   an invalidation never replaces one dispatched after it.
//! - [`QueryCache::invalidate`] detaches matching in-flight fetches, so the
//!   next fetch of that key issues a new request.
//! - [`QueryCache::clear`] starts a new epoch. Results of fetches started
//!   in an earlier epoch are returned to their caller but never stored.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use mockable::{Clock, DefaultClock};
use tracing::{debug, warn};

use super::state::{QueryState, QueryStatus};
use crate::domain::{ApiError, QueryKey};

/// Freshness window used when none is configured.
pub const DEFAULT_FRESH_FOR: Duration = Duration::from_secs(30);

type Payload = Arc<dyn Any + Send + Sync>;
type Outcome = Result<Payload, ApiError>;
type SharedFetch = Shared<BoxFuture<'static, Outcome>>;

struct InFlight {
    ticket: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    status: QueryStatus,
    data: Option<Payload>,
    error: Option<ApiError>,
    stale: bool,
    settled_at: Option<DateTime<Utc>>,
    pending: BTreeSet<u64>,
    in_flight: Option<InFlight>,
    /// Highest ticket dispatched before the latest invalidation.
    invalidated_through: u64,
    /// Ticket whose outcome is currently recorded.
    recorded_ticket: u64,
}

impl Entry {
    fn is_fresh(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        self.status == QueryStatus::Success
            && !self.stale
            && self
                .settled_at
                .is_some_and(|settled| now.signed_duration_since(settled) < window)
    }

    fn state<T: Send + Sync + 'static>(&self) -> QueryState<T> {
        QueryState {
            status: self.status,
            data: self.data.clone().and_then(downcast),
            error: self.error.clone(),
        }
    }

    fn record(&mut self, ticket: u64, outcome: Outcome, now: DateTime<Utc>) {
        let predates_invalidation = ticket <= self.invalidated_through;
        if predates_invalidation && self.recorded_ticket > self.invalidated_through {
            return;
        }
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.error = None;
            }
            Err(error) => self.error = Some(error),
        }
        self.recorded_ticket = ticket;
        self.stale = predates_invalidation;
        self.settled_at = Some(now);
    }

    fn invalidate(&mut self, dispatched_through: u64) {
        self.stale = true;
        self.invalidated_through = dispatched_through;
        self.in_flight = None;
    }

    fn refresh_status(&mut self) {
        self.status = if self.in_flight.is_some() {
            QueryStatus::Loading
        } else if self.error.is_some() {
            QueryStatus::Error
        } else {
            QueryStatus::Success
        };
    }
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<QueryKey, Entry>,
    epoch: u64,
    next_ticket: u64,
}

struct Inner {
    state: Mutex<CacheState>,
    clock: Arc<dyn Clock + Send + Sync>,
    fresh_for: TimeDelta,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn settle(&self, key: &QueryKey, ticket: u64, epoch: u64, outcome: Outcome) {
        let mut guard = self.lock();
        if guard.epoch != epoch {
            debug!(key = %key, "discarding result fetched before cache clear");
            return;
        }
        let now = self.clock.utc();
        let Some(entry) = guard.entries.get_mut(key) else {
            return;
        };
        if entry.pending.remove(&ticket) {
            entry.record(ticket, outcome, now);
        }
        if entry
            .in_flight
            .as_ref()
            .is_some_and(|in_flight| in_flight.ticket == ticket)
        {
            entry.in_flight = None;
        }
        entry.refresh_status();
    }

    fn observe<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
        epoch: u64,
        outcome: Outcome,
    ) -> QueryState<T> {
        let guard = self.lock();
        if guard.epoch != epoch {
            return detached(outcome);
        }
        guard
            .entries
            .get(key)
            .map_or_else(|| detached(outcome), Entry::state)
    }
}

/// Shared, type-erased query cache.
///
/// # Examples
/// ```
/// use asideka_client::domain::{families, ApiError, QueryKey};
/// use asideka_client::query::QueryCache;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let cache = QueryCache::default();
/// let key = QueryKey::from(families::POSTS).with(1);
/// let state = cache
///     .fetch(&key, || async { Ok::<_, ApiError>(3_u8) }, false)
///     .await;
/// assert_eq!(state.data(), Some(&3));
/// # }
/// ```
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl QueryCache {
    /// Build a cache that reads time from `clock` and serves settled results
    /// for `fresh_for`.
    pub fn new(clock: Arc<dyn Clock + Send + Sync>, fresh_for: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(CacheState::default()),
                clock,
                fresh_for: TimeDelta::from_std(fresh_for).unwrap_or(TimeDelta::MAX),
            }),
        }
    }

    /// Resolve `key`, calling `fetcher` only when no usable result exists.
    ///
    /// Joins an in-flight fetch of the same key, or serves a fresh settled
    /// result, unless `force` is set. A new request runs as a Tokio task,
    /// so dropping this future abandons only the caller's interest.
    /// Failures are carried in the returned state.
    ///
    /// # Panics
    ///
    /// Panics when a new request must be dispatched outside a Tokio runtime.
    pub async fn fetch<T, F, Fut>(&self, key: &QueryKey, fetcher: F, force: bool) -> QueryState<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let (epoch, future) = {
            let mut guard = self.inner.lock();
            let now = self.inner.clock.utc();
            let CacheState {
                entries,
                epoch,
                next_ticket,
            } = &mut *guard;
            let entry = entries.entry(key.clone()).or_default();
            let joined = if force {
                None
            } else {
                entry
                    .in_flight
                    .as_ref()
                    .map(|in_flight| in_flight.future.clone())
            };
            if let Some(future) = joined {
                (*epoch, future)
            } else if !force && entry.is_fresh(now, self.inner.fresh_for) {
                return entry.state();
            } else {
                *next_ticket = next_ticket.wrapping_add(1);
                let ticket = *next_ticket;
                let future = self.dispatch(key.clone(), ticket, *epoch, fetcher);
                entry.pending.insert(ticket);
                entry.in_flight = Some(InFlight {
                    ticket,
                    future: future.clone(),
                });
                entry.status = QueryStatus::Loading;
                (*epoch, future)
            }
        };
        let outcome = future.await;
        self.inner.observe(key, epoch, outcome)
    }

    /// Mark every entry whose key starts with `prefix` as stale and detach
    /// its in-flight fetch. Returns the number of entries marked.
    pub fn invalidate(&self, prefix: &QueryKey) -> usize {
        let mut guard = self.inner.lock();
        let dispatched_through = guard.next_ticket;
        let mut marked = 0_usize;
        for (key, entry) in &mut guard.entries {
            if key.starts_with(prefix) {
                entry.invalidate(dispatched_through);
                marked += 1;
            }
        }
        debug!(prefix = %prefix, marked, "invalidated cached queries");
        marked
    }

    /// Drop every entry and discard results of fetches already running.
    pub fn clear(&self) {
        let mut guard = self.inner.lock();
        guard.entries.clear();
        guard.epoch = guard.epoch.wrapping_add(1);
        debug!(epoch = guard.epoch, "cleared query cache");
    }

    /// Current state of `key` without fetching.
    pub fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> QueryState<T> {
        self.inner
            .lock()
            .entries
            .get(key)
            .map_or_else(QueryState::idle, Entry::state)
    }

    /// Whether `key` has been invalidated since it last settled.
    pub fn is_stale(&self, key: &QueryKey) -> Option<bool> {
        self.inner.lock().entries.get(key).map(|entry| entry.stale)
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Whether the cache holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Spawn the request for `ticket`. The task settles the cache on
    /// completion; callers await the shared handle.
    fn dispatch<T, F, Fut>(&self, key: QueryKey, ticket: u64, epoch: u64, fetcher: F) -> SharedFetch
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let request = fetcher();
        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            let outcome = request.await.map(|value| Arc::new(value) as Payload);
            inner.settle(&key, ticket, epoch, outcome.clone());
            outcome
        });
        async move {
            task.await.unwrap_or_else(|error| {
                warn!(error = %error, "query task did not complete");
                Err(ApiError::transport(format!("query task failed: {error}")))
            })
        }
        .boxed()
        .shared()
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock), DEFAULT_FRESH_FOR)
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("fresh_for", &self.inner.fresh_for)
            .finish_non_exhaustive()
    }
}

fn downcast<T: Send + Sync + 'static>(payload: Payload) -> Option<Arc<T>> {
    payload.downcast::<T>().ok()
}

fn detached<T: Send + Sync + 'static>(outcome: Outcome) -> QueryState<T> {
    match outcome {
        Ok(data) => QueryState {
            status: QueryStatus::Success,
            data: downcast(data),
            error: None,
        },
        Err(error) => QueryState {
            status: QueryStatus::Error,
            data: None,
            error: Some(error),
        },
    }
}
