//! Test doubles shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::domain::ports::{ApiRequest, HttpMethod, HttpTransport, Notifier, ResponseBody};
use crate::domain::{AccessToken, ApiError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward by `delta`.
    ///
    /// # Panics
    ///
    /// Panics when `delta` does not fit in a [`TimeDelta`].
    pub fn advance(&self, delta: Duration) {
        let step = match TimeDelta::from_std(delta) {
            Ok(step) => step,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}")
            }
        };
        *lock(&self.0) += step;
    }

    /// Move the clock forward by whole seconds.
    pub fn advance_seconds(&self, seconds: i64) {
        *lock(&self.0) += TimeDelta::seconds(seconds);
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *lock(&self.0)
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// Sent through [`Notifier::success`].
    Success(String),
    /// Sent through [`Notifier::error`].
    Error(String),
}

/// Notifier that keeps every message for later assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<Notification>>);

impl RecordingNotifier {
    /// Everything recorded so far, in order.
    pub fn notifications(&self) -> Vec<Notification> {
        lock(&self.0).clone()
    }

    /// Success messages, in order.
    pub fn successes(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|note| match note {
                Notification::Success(message) => Some(message),
                Notification::Error(_) => None,
            })
            .collect()
    }

    /// Error messages, in order.
    pub fn errors(&self) -> Vec<String> {
        self.notifications()
            .into_iter()
            .filter_map(|note| match note {
                Notification::Error(message) => Some(message),
                Notification::Success(_) => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        lock(&self.0).push(Notification::Success(message.to_owned()));
    }

    fn error(&self, message: &str) {
        lock(&self.0).push(Notification::Error(message.to_owned()));
    }
}

/// One request observed by [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// The request as sent.
    pub request: ApiRequest,
    /// Raw bearer token attached to it.
    pub bearer: Option<String>,
}

enum Scripted {
    Ready(Result<ResponseBody, ApiError>),
    Gated(oneshot::Receiver<Result<ResponseBody, ApiError>>),
}

type RouteTable = HashMap<(HttpMethod, String), VecDeque<Scripted>>;

/// In-memory transport answering from a script keyed by method and path.
///
/// Each route holds a queue of responses. The last ready response repeats
/// once the queue is down to one entry. Unscripted routes answer 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Mutex<RouteTable>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `outcome` for `method path`.
    pub fn respond(
        &self,
        method: HttpMethod,
        path: &str,
        outcome: Result<ResponseBody, ApiError>,
    ) -> &Self {
        lock(&self.routes)
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Scripted::Ready(outcome));
        self
    }

    /// Queue a successful JSON response for `method path`.
    pub fn respond_json(&self, method: HttpMethod, path: &str, body: Value) -> &Self {
        self.respond(method, path, Ok(ResponseBody::Json(body)))
    }

    /// Queue a response that is held back until the returned sender fires.
    pub fn gate(
        &self,
        method: HttpMethod,
        path: &str,
    ) -> oneshot::Sender<Result<ResponseBody, ApiError>> {
        let (sender, receiver) = oneshot::channel();
        lock(&self.routes)
            .entry((method, path.to_owned()))
            .or_default()
            .push_back(Scripted::Gated(receiver));
        sender
    }

    /// Every call made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls made to `method path`.
    pub fn call_count(&self, method: HttpMethod, path: &str) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.request.method == method && call.request.path == path)
            .count()
    }

    fn next(&self, method: HttpMethod, path: &str) -> Option<Scripted> {
        let mut routes = lock(&self.routes);
        let queue = routes.get_mut(&(method, path.to_owned()))?;
        match queue.front() {
            Some(Scripted::Ready(outcome)) if queue.len() == 1 => {
                Some(Scripted::Ready(outcome.clone()))
            }
            _ => queue.pop_front(),
        }
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(
        &self,
        request: ApiRequest,
        bearer: Option<AccessToken>,
    ) -> Result<ResponseBody, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        lock(&self.calls).push(RecordedCall {
            request,
            bearer: bearer.map(|token| token.expose().to_owned()),
        });
        match self.next(method, &path) {
            Some(Scripted::Ready(outcome)) => outcome,
            Some(Scripted::Gated(receiver)) => receiver
                .await
                .unwrap_or_else(|_| Err(ApiError::transport("gate dropped"))),
            None => Err(ApiError::status(404_u16, "Not Found", None::<Value>)),
        }
    }
}
