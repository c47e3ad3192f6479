//! Queries and mutations bound to the shared cache, session and notifier.
//!
//! Every query method returns a [`Query`] keyed by its family and
//! parameters. Every mutation method performs one endpoint call, reports the
//! outcome through the [`Notifier`] and invalidates the key prefixes the
//! call affects. Failures are always returned to the caller as well.

mod auth;
mod businesses;
mod interactions;
mod messages;
mod posts;
mod profile;
mod services;

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::FutureExt;

use super::{Query, QueryCache};
use crate::api::Api;
use crate::client::SessionClient;
use crate::domain::ports::{HttpTransport, Notifier};
use crate::domain::{ApiError, QueryKey, SessionContext};

/// Mutations whose progress callers can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    /// [`Hooks::login`].
    Login,
    /// [`Hooks::register`].
    Register,
    /// [`Hooks::logout`].
    Logout,
    /// [`Hooks::forgot_password`].
    ForgotPassword,
    /// [`Hooks::verify_token`].
    VerifyToken,
    /// [`Hooks::change_password`].
    ChangePassword,
    /// [`Hooks::create_business`].
    CreateBusiness,
    /// [`Hooks::update_business`].
    UpdateBusiness,
    /// [`Hooks::delete_business`].
    DeleteBusiness,
    /// [`Hooks::create_post`].
    CreatePost,
    /// [`Hooks::create_interaction`].
    CreateInteraction,
    /// [`Hooks::toggle_interaction`].
    ToggleInteraction,
    /// [`Hooks::create_message`].
    CreateMessage,
    /// [`Hooks::send_chat`].
    SendChat,
    /// [`Hooks::request_due_diligence`].
    RequestDueDiligence,
    /// [`Hooks::ai_query`].
    AiQuery,
    /// [`Hooks::update_profile`].
    UpdateProfile,
}

/// Notification texts for one mutation. `None` stays silent.
#[derive(Debug, Clone, Copy, Default)]
struct Toast {
    success: Option<&'static str>,
    failure: Option<&'static str>,
}

impl Toast {
    const fn both(success: &'static str, failure: &'static str) -> Self {
        Self {
            success: Some(success),
            failure: Some(failure),
        }
    }

    const fn failure_only(failure: &'static str) -> Self {
        Self {
            success: None,
            failure: Some(failure),
        }
    }

    const fn silent() -> Self {
        Self {
            success: None,
            failure: None,
        }
    }

    #[must_use]
    const fn with_success(mut self, success: Option<&'static str>) -> Self {
        self.success = success;
        self
    }
}

#[derive(Debug, Default, Clone)]
struct PendingMutations(Arc<Mutex<HashMap<MutationKind, usize>>>);

impl PendingMutations {
    fn begin(&self, kind: MutationKind) -> PendingGuard {
        *self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default() += 1;
        PendingGuard {
            counts: Arc::clone(&self.0),
            kind,
        }
    }

    fn is_pending(&self, kind: MutationKind) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .is_some_and(|count| *count > 0)
    }
}

struct PendingGuard {
    counts: Arc<Mutex<HashMap<MutationKind, usize>>>,
    kind: MutationKind,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(count) = counts.get_mut(&self.kind) {
            *count = count.saturating_sub(1);
        }
    }
}

/// Entry point for queries and mutations.
#[derive(Clone)]
pub struct Hooks {
    api: Api,
    cache: Arc<QueryCache>,
    session: SessionContext,
    notifier: Arc<dyn Notifier>,
    pending: PendingMutations,
}

impl Hooks {
    /// Assemble hooks from their parts.
    pub fn new(
        api: Api,
        cache: Arc<QueryCache>,
        session: SessionContext,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            cache,
            session,
            notifier,
            pending: PendingMutations::default(),
        }
    }

    /// Wire hooks over `transport`, reading bearer tokens from `session`.
    pub fn connect(
        transport: Arc<dyn HttpTransport>,
        session: SessionContext,
        cache: Arc<QueryCache>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let client = SessionClient::new(transport, Arc::new(session.clone()));
        Self::new(Api::new(client), cache, session, notifier)
    }

    /// Endpoint groups used by these hooks.
    pub const fn api(&self) -> &Api {
        &self.api
    }

    /// Shared query cache.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// Session holder.
    pub const fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Whether a mutation of `kind` is running.
    pub fn is_pending(&self, kind: MutationKind) -> bool {
        self.pending.is_pending(kind)
    }

    fn query<T, F, Fut>(&self, key: QueryKey, call: F) -> Query<T>
    where
        T: Send + Sync + 'static,
        F: Fn(Api) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let api = self.api.clone();
        Query::new(Arc::clone(&self.cache), key, move || call(api.clone()).boxed())
    }

    async fn mutate<T, Fut>(
        &self,
        kind: MutationKind,
        request: Fut,
        toast: Toast,
        invalidates: &[QueryKey],
    ) -> Result<T, ApiError>
    where
        Fut: Future<Output = Result<T, ApiError>>,
    {
        let _pending = self.pending.begin(kind);
        let outcome = request.await;
        self.report(outcome, toast, invalidates)
    }

    fn report<T>(
        &self,
        outcome: Result<T, ApiError>,
        toast: Toast,
        invalidates: &[QueryKey],
    ) -> Result<T, ApiError> {
        match outcome {
            Ok(value) => {
                if let Some(message) = toast.success {
                    self.notifier.success(message);
                }
                for prefix in invalidates {
                    self.cache.invalidate(prefix);
                }
                Ok(value)
            }
            Err(error) => {
                if let Some(fallback) = toast.failure {
                    let message = error
                        .user_message()
                        .unwrap_or_else(|| fallback.to_owned());
                    self.notifier.error(&message);
                }
                Err(error)
            }
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("cache", &self.cache)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    //! Regression coverage for mutation reporting and pending flags.
    use super::test_helpers::rig;
    use super::*;
    use crate::domain::families;
    use crate::domain::ports::MockNotifier;
    use serde_json::json;

    #[tokio::test]
    async fn pending_flag_tracks_running_mutation() {
        let rig = rig();
        let hooks = rig.hooks.clone();
        let observed = rig
            .hooks
            .mutate(
                MutationKind::CreatePost,
                async move { Ok::<_, ApiError>(hooks.is_pending(MutationKind::CreatePost)) },
                Toast::silent(),
                &[],
            )
            .await
            .expect("mutation succeeds");
        assert!(observed);
        assert!(!rig.hooks.is_pending(MutationKind::CreatePost));
    }

    #[tokio::test]
    async fn failure_prefers_server_message() {
        let mut notifier = MockNotifier::new();
        notifier
            .expect_error()
            .withf(|message| message == "Email already registered")
            .times(1)
            .return_const(());
        notifier.expect_success().never();
        let rig = rig();
        let hooks = Hooks::new(
            rig.hooks.api().clone(),
            Arc::clone(rig.hooks.cache()),
            SessionContext::default(),
            Arc::new(notifier),
        );

        let err = hooks
            .mutate(
                MutationKind::Register,
                async {
                    Err::<(), _>(ApiError::status(
                        409_u16,
                        "Conflict",
                        json!({"message": "Email already registered"}),
                    ))
                },
                Toast::both("ok", "Failed to create account"),
                &[],
            )
            .await
            .expect_err("conflict");
        assert_eq!(err.http_status(), Some(409));
    }

    #[tokio::test]
    async fn failure_without_text_uses_fallback() {
        let rig = rig();
        let result = rig
            .hooks
            .mutate(
                MutationKind::CreatePost,
                async { Err::<(), _>(ApiError::rejected("")) },
                Toast::both("Post created successfully!", "Failed to create post"),
                &[QueryKey::from(families::POSTS)],
            )
            .await;
        assert!(result.is_err());
        assert_eq!(rig.notifier.errors(), vec!["Failed to create post".to_owned()]);
        assert!(rig.notifier.successes().is_empty());
    }
}
