//! Interaction queries and mutations.

use super::{Hooks, MutationKind, Toast};
use crate::api::interactions::{
    CreateInteractionRequest, HasInteracted, Interaction, InteractionFilter, InteractionKind,
    InteractionSummary,
};
use crate::domain::{ApiError, QueryKey, families};
use crate::query::Query;

const FAILED: &str = "Failed to interact with post";

fn affected(post_id: &str) -> [QueryKey; 4] {
    [
        QueryKey::from(families::INTERACTIONS),
        QueryKey::from(families::INTERACTION_SUMMARY).with(post_id),
        QueryKey::from(families::HAS_INTERACTED).with(post_id),
        QueryKey::from(families::POSTS),
    ]
}

const fn success_text(kind: InteractionKind) -> Option<&'static str> {
    match kind {
        InteractionKind::Like => Some("Post liked!"),
        InteractionKind::Comment => Some("Comment added!"),
        InteractionKind::Share | InteractionKind::View => None,
    }
}

impl Hooks {
    /// Interactions matching `filter`. Disabled unless a post or user is set.
    pub fn interactions(&self, filter: InteractionFilter) -> Query<Vec<Interaction>> {
        let enabled = filter.post_id.as_deref().is_some_and(|id| !id.is_empty())
            || filter.user_id.as_deref().is_some_and(|id| !id.is_empty());
        let key = QueryKey::from(families::INTERACTIONS).with_params(&filter);
        self.query(key, move |api| {
            let filter = filter.clone();
            async move { api.interactions().list(&filter).await }
        })
        .enabled(enabled)
    }

    /// Engagement counts for a post. Disabled for an empty id.
    pub fn interaction_summary(&self, post_id: &str) -> Query<InteractionSummary> {
        let id = post_id.to_owned();
        let key = QueryKey::from(families::INTERACTION_SUMMARY).with(&id);
        self.query(key, move |api| {
            let id = id.clone();
            async move { api.interactions().summary(&id).await }
        })
        .enabled(!post_id.is_empty())
    }

    /// Whether the caller already interacted with a post. Disabled for an
    /// empty id.
    pub fn has_interacted(&self, post_id: &str, kind: InteractionKind) -> Query<HasInteracted> {
        let id = post_id.to_owned();
        let key = QueryKey::from(families::HAS_INTERACTED).with(&id).with(kind);
        self.query(key, move |api| {
            let id = id.clone();
            async move { api.interactions().has_interacted(&id, kind).await }
        })
        .enabled(!post_id.is_empty())
    }

    /// Record an interaction. Likes and comments are acknowledged to the
    /// user.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn create_interaction(
        &self,
        request: &CreateInteractionRequest,
    ) -> Result<Interaction, ApiError> {
        self.mutate(
            MutationKind::CreateInteraction,
            self.api.interactions().create(request),
            Toast::failure_only(FAILED).with_success(success_text(request.kind)),
            &affected(&request.post_id),
        )
        .await
    }

    /// Record an interaction without notifying.
    ///
    /// # Errors
    ///
    /// Returns the failure.
    pub async fn toggle_interaction(
        &self,
        post_id: &str,
        kind: InteractionKind,
    ) -> Result<Interaction, ApiError> {
        let request = CreateInteractionRequest::new(post_id, kind);
        self.mutate(
            MutationKind::ToggleInteraction,
            self.api.interactions().create(&request),
            Toast::silent(),
            &affected(post_id),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for interaction hooks.
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::query::hooks::test_helpers::rig;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(InteractionKind::Like, vec!["Post liked!".to_owned()])]
    #[case(InteractionKind::Comment, vec!["Comment added!".to_owned()])]
    #[case(InteractionKind::Share, Vec::new())]
    #[tokio::test]
    async fn only_likes_and_comments_are_acknowledged(
        #[case] kind: InteractionKind,
        #[case] expected: Vec<String>,
    ) {
        let rig = rig();
        rig.transport
            .respond_json(HttpMethod::Post, "/interactions", json!({"id": "i-1"}));
        rig.hooks
            .create_interaction(&CreateInteractionRequest::new("p-1", kind))
            .await
            .expect("recorded");
        assert_eq!(rig.notifier.successes(), expected);
    }

    #[tokio::test]
    async fn interaction_invalidates_only_its_post() {
        let rig = rig();
        for post in ["p-1", "p-2"] {
            rig.transport.respond_json(
                HttpMethod::Get,
                &format!("/interactions/summary?postId={post}"),
                json!({"postId": post}),
            );
        }
        rig.transport
            .respond_json(HttpMethod::Post, "/interactions", json!({"id": "i-1"}));
        let first = rig.hooks.interaction_summary("p-1");
        let second = rig.hooks.interaction_summary("p-2");
        first.fetch().await;
        second.fetch().await;

        rig.hooks
            .toggle_interaction("p-1", InteractionKind::Like)
            .await
            .expect("toggled");

        assert_eq!(rig.hooks.cache().is_stale(first.key()), Some(true));
        assert_eq!(rig.hooks.cache().is_stale(second.key()), Some(false));
        assert!(rig.notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn interactions_need_a_post_or_user() {
        let rig = rig();
        let state = rig
            .hooks
            .interactions(InteractionFilter::default())
            .fetch()
            .await;
        assert!(state.is_idle());
        assert!(rig.transport.calls().is_empty());
    }
}
