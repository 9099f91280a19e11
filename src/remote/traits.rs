use async_trait::async_trait;
use std::collections::HashMap;

use crate::session::{ConversationId, Turn};
use crate::utils::ChatError;

/// The backend calls the conversation session depends on.
///
/// Session identity is implicit: implementations carry whatever the server
/// needs (cookies, headers) on every request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConversationApi: Send + Sync {
    /// Every active conversation of the signed-in user. An empty map is a
    /// valid answer; an error marker in the body is `ChatError::Server`.
    async fn fetch_history(&self) -> Result<HashMap<ConversationId, Vec<Turn>>, ChatError>;

    /// Ask the server for a new conversation id
    async fn create_conversation(&self) -> Result<ConversationId, ChatError>;

    /// Post a question and wait for the assistant's reply text
    async fn send_message(
        &self,
        conversation_id: &ConversationId,
        message: &str,
    ) -> Result<String, ChatError>;

    /// Mark a conversation inactive server-side
    async fn delete_conversation(&self, conversation_id: &ConversationId) -> Result<(), ChatError>;

    /// Category of the signed-in user (`agricultor`, `agronomo`, ...), if known
    async fn user_type(&self) -> Result<Option<String>, ChatError>;
}
