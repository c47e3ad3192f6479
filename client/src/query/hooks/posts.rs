//! Post queries and mutations.

use super::{Hooks, MutationKind, Toast};
use crate::api::posts::{CreatePostRequest, Post, PostListParams};
use crate::domain::{ApiError, QueryKey, families};
use crate::query::Query;

impl Hooks {
    /// Posts matching `params`.
    pub fn posts(&self, params: PostListParams) -> Query<Vec<Post>> {
        let key = QueryKey::from(families::POSTS).with_params(&params);
        self.query(key, move |api| {
            let params = params.clone();
            async move { api.posts().list(&params).await }
        })
    }

    /// Publish a post.
    ///
    /// # Errors
    ///
    /// Returns the publishing failure after notifying it.
    pub async fn create_post(&self, request: &CreatePostRequest) -> Result<Post, ApiError> {
        self.mutate(
            MutationKind::CreatePost,
            self.api.posts().create(request),
            Toast::both("Post created successfully!", "Failed to create post"),
            &[QueryKey::from(families::POSTS)],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for post hooks.
    use super::*;
    use crate::domain::ports::HttpMethod;
    use crate::query::hooks::test_helpers::rig;
    use serde_json::json;

    #[tokio::test]
    async fn create_post_invalidates_posts_only() {
        let rig = rig();
        rig.transport
            .respond_json(HttpMethod::Get, "/posts", json!({"status": "success", "payload": []}));
        rig.transport.respond_json(
            HttpMethod::Get,
            "/due-diligence",
            json!({"payload": [], "metadata": {
                "totalItems": 0, "totalPages": 0, "currentPage": 1, "limit": 10, "nextPage": false
            }}),
        );
        rig.transport.respond_json(
            HttpMethod::Post,
            "/posts",
            json!({"status": "success", "payload": {"id": "p-1"}}),
        );
        let posts = rig.hooks.posts(PostListParams::default());
        let requests = rig.hooks.due_diligence_requests(Default::default());
        posts.fetch().await;
        requests.fetch().await;

        rig.hooks
            .create_post(&CreatePostRequest::default())
            .await
            .expect("created");
        posts.fetch().await;
        requests.fetch().await;

        assert_eq!(rig.transport.call_count(HttpMethod::Get, "/posts"), 2);
        assert_eq!(rig.transport.call_count(HttpMethod::Get, "/due-diligence"), 1);
        assert_eq!(
            rig.notifier.successes(),
            vec!["Post created successfully!".to_owned()]
        );
    }
}
