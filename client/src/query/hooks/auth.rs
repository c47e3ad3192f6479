//! Authentication flows.

use tracing::warn;

use super::{Hooks, MutationKind, Toast};
use crate::api::auth::ChangePasswordRequest;
use crate::domain::route_guard::{DASHBOARD_PATH, HOME_PATH, LOGIN_PATH};
use crate::domain::{
    AccountRegistration, ApiError, LoginCredentials, Navigation, ProfileSnapshot, QueryKey,
    families,
};
use crate::query::Query;

impl Hooks {
    /// Profile of the signed-in user, cached under `session`.
    pub fn session_profile(&self) -> Query<Option<ProfileSnapshot>> {
        let session = self.session.clone();
        self.query(QueryKey::from(families::SESSION), move |_| {
            let profile = session.current().map(|held| held.profile().clone());
            async move { Ok(profile) }
        })
    }

    /// Whether an unexpired session exists.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_present()
    }

    /// Authenticate, install the session and head to the dashboard.
    ///
    /// # Errors
    ///
    /// Returns the login failure after notifying it. No session is installed.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Navigation, ApiError> {
        self.mutate(
            MutationKind::Login,
            self.establish_session(credentials),
            Toast::both("Logged in successfully!", "Failed to login"),
            &[QueryKey::from(families::SESSION)],
        )
        .await?;
        Ok(Navigation::to(DASHBOARD_PATH))
    }

    /// Create an account, then sign in with the same credentials.
    ///
    /// Lands on the dashboard, or on the login page when the automatic
    /// sign-in fails.
    ///
    /// # Errors
    ///
    /// Returns the account creation failure after notifying it.
    pub async fn register(
        &self,
        registration: &AccountRegistration,
    ) -> Result<Navigation, ApiError> {
        let _pending = self.pending.begin(MutationKind::Register);
        let created = self.api.auth().create_account(registration).await;
        self.report(
            created,
            Toast::both("Account created successfully!", "Failed to create account"),
            &[],
        )?;

        match self.establish_session(registration.credentials()).await {
            Ok(()) => {
                self.cache.invalidate(&QueryKey::from(families::SESSION));
                Ok(Navigation::to(DASHBOARD_PATH))
            }
            Err(error) => {
                warn!(error = %error, "sign-in after registration failed");
                Ok(Navigation::to(LOGIN_PATH))
            }
        }
    }

    /// Drop the session and every cached result, then head home.
    pub fn logout(&self) -> Navigation {
        let _pending = self.pending.begin(MutationKind::Logout);
        self.session.sign_out();
        self.cache.clear();
        self.notifier.success("Logged out successfully!");
        Navigation::to(HOME_PATH)
    }

    /// Ask the backend to e-mail a reset link.
    ///
    /// # Errors
    ///
    /// Returns the request failure after notifying it.
    pub async fn forgot_password(&self, email: &str) -> Result<String, ApiError> {
        self.mutate(
            MutationKind::ForgotPassword,
            self.api.auth().forgot_password(email),
            Toast::both(
                "Password reset link sent to your email!",
                "Failed to send password reset link",
            ),
            &[],
        )
        .await
    }

    /// Check a reset token without notifying.
    ///
    /// # Errors
    ///
    /// Returns the verification failure.
    pub async fn verify_token(&self, token: &str) -> Result<String, ApiError> {
        self.mutate(
            MutationKind::VerifyToken,
            self.api.auth().verify_token(token),
            Toast::silent(),
            &[],
        )
        .await
    }

    /// Change the password and head to the login page.
    ///
    /// # Errors
    ///
    /// Returns the change failure after notifying it.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<Navigation, ApiError> {
        self.mutate(
            MutationKind::ChangePassword,
            self.api.auth().change_password(request),
            Toast::both("Password changed successfully!", "Failed to change password"),
            &[],
        )
        .await?;
        Ok(Navigation::to(LOGIN_PATH))
    }

    async fn establish_session(&self, credentials: &LoginCredentials) -> Result<(), ApiError> {
        let payload = self.api.auth().login(credentials).await?;
        self.session.sign_in(payload.into_session()?);
        Ok(())
    }
}
