//! Typed endpoint modules.
//!
//! Each function maps one backend operation to one request through
//! [`SessionClient`]: fixed path, fixed method, typed body and typed
//! response. Nothing here retries or validates beyond what the types
//! enforce.

pub mod auth;
pub mod businesses;
pub mod due_diligence;
pub mod interactions;
pub mod messages;
pub mod policies;
pub mod posts;
pub mod search;
pub mod user_profiles;

use serde::{Deserialize, Serialize};

use crate::client::SessionClient;

pub use self::auth::AuthApi;
pub use self::businesses::BusinessesApi;
pub use self::due_diligence::DueDiligenceApi;
pub use self::interactions::InteractionsApi;
pub use self::messages::MessagesApi;
pub use self::policies::PoliciesApi;
pub use self::posts::PostsApi;
pub use self::search::SearchApi;
pub use self::user_profiles::UserProfilesApi;

/// Bare acknowledgement returned by several mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    /// Server message, when one was sent.
    #[serde(default)]
    pub message: Option<String>,
}

/// Entry point to every endpoint group.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use asideka_client::api::Api;
/// use asideka_client::client::SessionClient;
/// use asideka_client::outbound::ReqwestTransport;
///
/// let base = url::Url::parse("https://api.example.test").unwrap();
/// let transport = ReqwestTransport::new(&base, "docs").unwrap();
/// let api = Api::new(SessionClient::without_session(Arc::new(transport)));
/// let _posts = api.posts();
/// ```
#[derive(Debug, Clone)]
pub struct Api {
    client: SessionClient,
}

impl Api {
    /// Wrap a session-aware client.
    pub const fn new(client: SessionClient) -> Self {
        Self { client }
    }

    /// Underlying client.
    pub const fn client(&self) -> &SessionClient {
        &self.client
    }

    /// `/authentication/*`
    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.client)
    }

    /// `/businesses/*`
    pub const fn businesses(&self) -> BusinessesApi<'_> {
        BusinessesApi::new(&self.client)
    }

    /// `/posts`
    pub const fn posts(&self) -> PostsApi<'_> {
        PostsApi::new(&self.client)
    }

    /// `/interactions/*`
    pub const fn interactions(&self) -> InteractionsApi<'_> {
        InteractionsApi::new(&self.client)
    }

    /// `/messages/*`
    pub const fn messages(&self) -> MessagesApi<'_> {
        MessagesApi::new(&self.client)
    }

    /// `/due-diligence`
    pub const fn due_diligence(&self) -> DueDiligenceApi<'_> {
        DueDiligenceApi::new(&self.client)
    }

    /// `/policies/*`
    pub const fn policies(&self) -> PoliciesApi<'_> {
        PoliciesApi::new(&self.client)
    }

    /// `/search/text`
    pub const fn search(&self) -> SearchApi<'_> {
        SearchApi::new(&self.client)
    }

    /// `/user-profiles`
    pub const fn user_profiles(&self) -> UserProfilesApi<'_> {
        UserProfilesApi::new(&self.client)
    }
}
