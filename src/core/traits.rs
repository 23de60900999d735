//! DI "Interfaces"

use crate::infrastructure::entities::{
    CascadeReport, Citation, Conversation, Document, File, Message, MessageAgent, Pagination,
    UpdateConversation,
};
use crate::infrastructure::error::RepositoryResult;
use async_trait::async_trait;

/// A conversation with everything shown alongside it.
#[derive(Debug, Clone)]
pub struct ConversationDetail {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
    pub files: Vec<File>,
}

/// A message with the citations and documents it owns.
#[derive(Debug, Clone)]
pub struct MessageThread {
    pub message: Message,
    pub citations: Vec<Citation>,
    pub documents: Vec<Document>,
}

#[async_trait]
pub trait ConversationService: Send + Sync {
    /// Lists the conversations of the given user.
    async fn list_conversations(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> RepositoryResult<Vec<Conversation>>;

    /// Creates a new conversation for the given user.
    async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> RepositoryResult<Conversation>;

    /// Returns `None` if the conversation does not exist or belongs to someone else.
    async fn get_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<ConversationDetail>>;

    async fn update_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
        update: UpdateConversation,
    ) -> RepositoryResult<Option<Conversation>>;

    /// Deletes a conversation and everything it owns.
    ///
    /// Returns `None` if the conversation did not exist or the user didn't own it.
    async fn delete_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>>;

    /// List all messages in a conversation, with their citations and documents.
    ///
    /// Returns `None` if the user can't see this conversation.
    async fn list_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<Vec<MessageThread>>>;

    /// Appends a message to a conversation, after its last one.
    ///
    /// The helper functions `create_X_message` should be used instead for clarity.
    async fn create_raw_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        agent: MessageAgent,
        text: String,
    ) -> RepositoryResult<Option<Message>>;

    /// Create a new user message in a conversation.
    ///
    /// Returns `None` if the conversation does not exist or the user doesn't own it.
    async fn create_user_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        text: String,
    ) -> RepositoryResult<Option<Message>> {
        self.create_raw_message(user_id, conversation_id, MessageAgent::User, text)
            .await
    }

    /// Create a new chatbot message in a conversation.
    async fn create_bot_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        text: String,
    ) -> RepositoryResult<Option<Message>> {
        self.create_raw_message(user_id, conversation_id, MessageAgent::Chatbot, text)
            .await
    }
}
