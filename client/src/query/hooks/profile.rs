//! Profile query and mutation.

use super::{Hooks, MutationKind, Toast};
use crate::domain::{ApiError, QueryKey, UserProfile, families};
use crate::query::Query;

impl Hooks {
    /// Signed-in user's profile.
    pub fn user_profile(&self) -> Query<UserProfile> {
        self.query(QueryKey::from(families::USER_PROFILE), |api| async move {
            api.user_profiles().get().await
        })
    }

    /// Save profile changes.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn update_profile(&self, profile: &UserProfile) -> Result<UserProfile, ApiError> {
        self.mutate(
            MutationKind::UpdateProfile,
            self.api.user_profiles().update(profile),
            Toast::both("Profile updated successfully!", "Failed to update profile"),
            &[QueryKey::from(families::USER_PROFILE)],
        )
        .await
    }
}
