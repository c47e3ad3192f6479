//! `/messages/*` endpoints.

use pagination::{PayloadEnvelope, QueryParams};
use serde::{Deserialize, Serialize};

use crate::client::SessionClient;
use crate::domain::ports::ApiRequest;
use crate::domain::{ApiError, User};

/// Direct message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    /// Identifier.
    pub id: String,
    /// Sending user id.
    pub sender_id: String,
    /// Receiving user id.
    pub recipient_id: String,
    /// Body text.
    pub content: String,
    /// Attachment URLs.
    pub attachments: Vec<String>,
    /// Whether the recipient has read it.
    pub read: bool,
    /// Creation time as sent by the backend.
    pub created_at: String,
    /// Last update time as sent by the backend.
    pub updated_at: String,
    /// Sender, when embedded.
    pub sender: Option<User>,
    /// Recipient, when embedded.
    pub recipient: Option<User>,
}

/// Conversation summary shown in the inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MessageThread {
    /// Identifier.
    pub id: String,
    /// Sending user id.
    pub sender_id: String,
    /// Other participant id.
    pub receiver_id: String,
    /// Sender display name.
    pub sender_name: String,
    /// Receiver display name.
    pub receiver_name: String,
    /// Sender avatar URL.
    pub sender_profile_picture: String,
    /// Receiver avatar URL.
    pub receiver_profile_picture: String,
    /// Most recent message text.
    pub last_message: String,
    /// Last update time as sent by the backend.
    pub updated_at: String,
}

/// Body for `POST /messages`, which opens a conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMessageRequest {
    /// Message text.
    pub message: String,
    /// Conversation subject.
    pub subject: String,
    /// Sending account.
    pub sender_id: String,
    /// Receiving account.
    pub receiver_id: String,
    /// Whether the sender writes as a user or a business.
    pub sender_type: String,
}

/// Body for `POST /messages/chat`, which replies in a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// Message text.
    pub message: String,
    /// Thread being replied to.
    pub thread_id: String,
    /// Sending account.
    pub sender_id: String,
    /// Receiving account.
    pub receiver_id: String,
    /// Whether the sender writes as a user or a business.
    pub sender_type: String,
}

/// Filters for `GET /messages`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFilter {
    /// Restrict to one counterpart.
    pub user_id: Option<String>,
    /// Maximum number of messages.
    pub limit: Option<u32>,
}

/// Messaging endpoints.
#[derive(Debug, Clone, Copy)]
pub struct MessagesApi<'a> {
    client: &'a SessionClient,
}

impl<'a> MessagesApi<'a> {
    pub(crate) const fn new(client: &'a SessionClient) -> Self {
        Self { client }
    }

    /// `GET /messages/thread`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn threads(&self) -> Result<Vec<MessageThread>, ApiError> {
        let envelope: PayloadEnvelope<Vec<MessageThread>> = self
            .client
            .fetch(ApiRequest::get("/messages/thread"))
            .await?;
        Ok(envelope.into_inner())
    }

    /// `GET /messages/thread?userId=..`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn thread_messages(&self, user_id: &str) -> Result<Vec<Message>, ApiError> {
        let path = QueryParams::new()
            .push("userId", user_id)
            .finish("/messages/thread");
        let envelope: PayloadEnvelope<Vec<Message>> =
            self.client.fetch(ApiRequest::get(path)).await?;
        Ok(envelope.into_inner())
    }

    /// `GET /messages` with the given filters.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn list(&self, filter: &MessageFilter) -> Result<Vec<Message>, ApiError> {
        let path = QueryParams::new()
            .push_opt("userId", filter.user_id.as_deref())
            .push_count("limit", filter.limit)
            .finish("/messages");
        let envelope: PayloadEnvelope<Vec<Message>> =
            self.client.fetch(ApiRequest::get(path)).await?;
        Ok(envelope.into_inner())
    }

    /// `POST /messages`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn create(&self, request: &CreateMessageRequest) -> Result<Message, ApiError> {
        self.client
            .fetch(ApiRequest::post("/messages", request)?)
            .await
    }

    /// `POST /messages/chat`.
    ///
    /// # Errors
    ///
    /// Returns transport, protocol and decode failures.
    pub async fn chat(&self, request: &ChatRequest) -> Result<Message, ApiError> {
        self.client
            .fetch(ApiRequest::post("/messages/chat", request)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::api::test_helpers::scripted_api;
    use crate::domain::ports::{HttpMethod, ResponseBody};
    use rstest::rstest;
    use serde_json::json;

    #[tokio::test]
    async fn threads_unwrap_payload() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Get,
            "/messages/thread",
            json!({"payload": [{"id": "t-1", "lastMessage": "See you"}]}),
        );
        let threads = api.messages().threads().await.expect("threads");
        assert_eq!(
            threads.first().map(|t| t.last_message.as_str()),
            Some("See you")
        );
    }

    #[tokio::test]
    async fn missing_payload_is_a_decode_error() {
        let (api, transport) = scripted_api();
        transport.respond(HttpMethod::Get, "/messages/thread", Ok(ResponseBody::Empty));
        let err = api.messages().threads().await.expect_err("no payload");
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[rstest]
    #[case(MessageFilter::default(), "/messages")]
    #[case(
        MessageFilter { user_id: Some("u-2".to_owned()), limit: Some(5) },
        "/messages?userId=u-2&limit=5"
    )]
    #[case(MessageFilter { user_id: None, limit: Some(0) }, "/messages")]
    #[tokio::test]
    async fn list_skips_unset_filters(#[case] filter: MessageFilter, #[case] path: &str) {
        let (api, transport) = scripted_api();
        transport.respond_json(HttpMethod::Get, path, json!({"payload": []}));
        let messages = api.messages().list(&filter).await.expect("listed");
        assert!(messages.is_empty());
        assert_eq!(transport.call_count(HttpMethod::Get, path), 1);
    }

    #[tokio::test]
    async fn chat_posts_thread_reply() {
        let (api, transport) = scripted_api();
        transport.respond_json(
            HttpMethod::Post,
            "/messages/chat",
            json!({"id": "m-1", "content": "hi"}),
        );
        let request = ChatRequest {
            message: "hi".to_owned(),
            thread_id: "t-1".to_owned(),
            ..ChatRequest::default()
        };
        let message = api.messages().chat(&request).await.expect("sent");
        assert_eq!(message.content, "hi");
        let calls = transport.calls();
        let body = calls.first().and_then(|call| call.request.body.clone());
        assert_eq!(
            body.as_ref().and_then(|b| b.get("threadId")).cloned(),
            Some(json!("t-1"))
        );
    }
}
