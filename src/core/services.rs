//! Implementations for the service the app needs.
//!

use crate::core::traits::{ConversationDetail, ConversationService, MessageThread};
use crate::infrastructure::entities::{
    CascadeReport, Conversation, Message, MessageAgent, Pagination, UpdateConversation,
};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::{
    CitationRepository, ConversationRepository, DocumentRepository, FileRepository,
    MessageRepository,
};
use async_trait::async_trait;
use di::{Ref, injectable};
use log::debug;

#[injectable(ConversationService)]
pub struct DefaultConversationService {
    conversations: Ref<dyn ConversationRepository>,
    messages: Ref<dyn MessageRepository>,
    files: Ref<dyn FileRepository>,
    citations: Ref<dyn CitationRepository>,
    documents: Ref<dyn DocumentRepository>,
}

impl DefaultConversationService {
    pub fn new(
        conversations: Ref<dyn ConversationRepository>,
        messages: Ref<dyn MessageRepository>,
        files: Ref<dyn FileRepository>,
        citations: Ref<dyn CitationRepository>,
        documents: Ref<dyn DocumentRepository>,
    ) -> Self {
        DefaultConversationService {
            conversations,
            messages,
            files,
            citations,
            documents,
        }
    }
}

#[async_trait]
impl ConversationService for DefaultConversationService {
    async fn list_conversations(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> RepositoryResult<Vec<Conversation>> {
        self.conversations.list_conversations(user_id, page).await
    }

    async fn create_conversation(
        &self,
        user_id: &str,
        title: Option<String>,
        description: Option<String>,
    ) -> RepositoryResult<Conversation> {
        let mut conversation = Conversation::new(user_id);
        if let Some(title) = title.filter(|title| !title.trim().is_empty()) {
            conversation.title = title;
        }
        conversation.description = description;

        self.conversations.create_conversation(conversation).await
    }

    async fn get_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<ConversationDetail>> {
        let Some(conversation) = self
            .conversations
            .get_conversation(conversation_id, user_id)
            .await?
        else {
            return Ok(None);
        };

        let messages = self
            .messages
            .list_messages_by_conversation(conversation_id, user_id)
            .await?;
        let files = self
            .files
            .list_files_by_conversation(conversation_id, user_id)
            .await?;

        Ok(Some(ConversationDetail {
            conversation,
            messages,
            files,
        }))
    }

    async fn update_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
        update: UpdateConversation,
    ) -> RepositoryResult<Option<Conversation>> {
        self.conversations
            .update_conversation(conversation_id, user_id, update)
            .await
    }

    async fn delete_conversation(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>> {
        self.conversations
            .delete_conversation(conversation_id, user_id)
            .await
    }

    async fn list_messages(
        &self,
        user_id: &str,
        conversation_id: &str,
    ) -> RepositoryResult<Option<Vec<MessageThread>>> {
        if self
            .conversations
            .get_conversation(conversation_id, user_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let messages = self
            .messages
            .list_messages_by_conversation(conversation_id, user_id)
            .await?;

        let mut threads = Vec::with_capacity(messages.len());
        for message in messages {
            let citations = self.citations.list_citations_by_message(&message.id).await?;
            let documents = self.documents.list_documents_by_message(&message.id).await?;
            threads.push(MessageThread {
                message,
                citations,
                documents,
            });
        }

        Ok(Some(threads))
    }

    async fn create_raw_message(
        &self,
        user_id: &str,
        conversation_id: &str,
        agent: MessageAgent,
        text: String,
    ) -> RepositoryResult<Option<Message>> {
        if self
            .conversations
            .get_conversation(conversation_id, user_id)
            .await?
            .is_none()
        {
            debug!("refusing message for conversation {conversation_id} not owned by {user_id}");
            return Ok(None);
        }

        let position = self.messages.next_position(conversation_id).await?;
        let message = Message::new(user_id, conversation_id, agent, text, position);

        self.messages.create_message(message).await.map(Some)
    }
}
