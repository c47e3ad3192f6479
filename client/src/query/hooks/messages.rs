//! Messaging queries and mutations.

use super::{Hooks, MutationKind, Toast};
use crate::api::messages::{
    ChatRequest, CreateMessageRequest, Message, MessageFilter, MessageThread,
};
use crate::domain::{ApiError, QueryKey, families};
use crate::query::Query;

fn affected() -> [QueryKey; 2] {
    [
        QueryKey::from(families::MESSAGES),
        QueryKey::from(families::MESSAGE_THREAD),
    ]
}

impl Hooks {
    /// Inbox threads.
    pub fn message_threads(&self) -> Query<Vec<MessageThread>> {
        self.query(QueryKey::from(families::MESSAGE_THREADS), |api| async move {
            api.messages().threads().await
        })
    }

    /// Messages exchanged with `user_id`, listed under `thread-messages`.
    /// Disabled for an empty id.
    pub fn thread_messages(&self, user_id: &str) -> Query<Vec<Message>> {
        self.conversation(QueryKey::from(families::THREAD_MESSAGES), user_id)
    }

    /// Messages exchanged with `user_id`, shown in the open conversation.
    /// Refreshed after sending. Disabled for an empty id.
    pub fn message_thread(&self, user_id: &str) -> Query<Vec<Message>> {
        self.conversation(QueryKey::from(families::MESSAGE_THREAD), user_id)
    }

    /// Messages matching `filter`.
    pub fn messages(&self, filter: MessageFilter) -> Query<Vec<Message>> {
        let key = QueryKey::from(families::MESSAGES).with_params(&filter);
        self.query(key, move |api| {
            let filter = filter.clone();
            async move { api.messages().list(&filter).await }
        })
    }

    /// Open a conversation.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn create_message(&self, request: &CreateMessageRequest) -> Result<Message, ApiError> {
        self.mutate(
            MutationKind::CreateMessage,
            self.api.messages().create(request),
            Toast::both("Message sent!", "Failed to send message"),
            &affected(),
        )
        .await
    }

    /// Reply in a thread. Only failures are notified.
    ///
    /// # Errors
    ///
    /// Returns the failure after notifying it.
    pub async fn send_chat(&self, request: &ChatRequest) -> Result<Message, ApiError> {
        self.mutate(
            MutationKind::SendChat,
            self.api.messages().chat(request),
            Toast::failure_only("Failed to send chat"),
            &affected(),
        )
        .await
    }

    fn conversation(&self, family: QueryKey, user_id: &str) -> Query<Vec<Message>> {
        let id = user_id.to_owned();
        let key = family.with(&id);
        self.query(key, move |api| {
            let id = id.clone();
            async move { api.messages().thread_messages(&id).await }
        })
        .enabled(!user_id.is_empty())
    }
}
