//! Infrastructure traits, used for DI on higher levels
//!
//! Owner-scoped operations take the acting user's id and treat rows owned by anyone
//! else exactly like rows that do not exist.

use crate::infrastructure::entities::{
    CascadeReport, Citation, Conversation, Document, File, Message, Pagination, UpdateCitation,
    UpdateConversation, UpdateDocument, UpdateFile, UpdateMessage,
};
use crate::infrastructure::error::RepositoryResult;
use async_trait::async_trait;

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn create_conversation(&self, conversation: Conversation)
    -> RepositoryResult<Conversation>;

    async fn get_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<Conversation>>;

    async fn list_conversations(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> RepositoryResult<Vec<Conversation>>;

    async fn update_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
        update: UpdateConversation,
    ) -> RepositoryResult<Option<Conversation>>;

    /// Deletes the conversation together with its messages, citations, documents and files.
    ///
    /// Returns `None` if no conversation matched.
    async fn delete_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create_message(&self, message: Message) -> RepositoryResult<Message>;

    async fn get_message(&self, message_id: &str, user_id: &str)
    -> RepositoryResult<Option<Message>>;

    async fn list_messages(&self, user_id: &str, page: Pagination)
    -> RepositoryResult<Vec<Message>>;

    async fn list_messages_by_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Vec<Message>>;

    async fn update_message(
        &self,
        message_id: &str,
        user_id: &str,
        update: UpdateMessage,
    ) -> RepositoryResult<Option<Message>>;

    /// Deletes the message together with its citations and documents.
    ///
    /// Returns `None` if no message matched.
    async fn delete_message(
        &self,
        message_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>>;

    /// Position following the last message of the conversation.
    async fn next_position(&self, conversation_id: &str) -> RepositoryResult<i64>;
}

#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create_file(&self, file: File) -> RepositoryResult<File>;

    async fn get_file(&self, file_id: &str, user_id: &str) -> RepositoryResult<Option<File>>;

    async fn list_files(&self, user_id: &str, page: Pagination) -> RepositoryResult<Vec<File>>;

    async fn list_files_by_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Vec<File>>;

    async fn get_files_by_ids(
        &self,
        file_ids: &[String],
        user_id: &str,
    ) -> RepositoryResult<Vec<File>>;

    async fn update_file(
        &self,
        file_id: &str,
        user_id: &str,
        update: UpdateFile,
    ) -> RepositoryResult<Option<File>>;

    /// Returns `false` if no file matched.
    async fn delete_file(&self, file_id: &str, user_id: &str) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait CitationRepository: Send + Sync {
    async fn create_citation(&self, citation: Citation) -> RepositoryResult<Citation>;

    async fn get_citation(&self, citation_id: &str) -> RepositoryResult<Option<Citation>>;

    async fn list_citations(&self, page: Pagination) -> RepositoryResult<Vec<Citation>>;

    async fn list_citations_by_message(&self, message_id: &str)
    -> RepositoryResult<Vec<Citation>>;

    async fn update_citation(
        &self,
        citation_id: &str,
        update: UpdateCitation,
    ) -> RepositoryResult<Option<Citation>>;

    async fn delete_citation(&self, citation_id: &str) -> RepositoryResult<bool>;
}

#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create_document(&self, document: Document) -> RepositoryResult<Document>;

    async fn get_document(&self, document_id: &str) -> RepositoryResult<Option<Document>>;

    async fn list_documents(&self, page: Pagination) -> RepositoryResult<Vec<Document>>;

    async fn list_documents_by_message(&self, message_id: &str)
    -> RepositoryResult<Vec<Document>>;

    async fn list_documents_by_conversation(
        &self,
        conversation_id: &str,
    ) -> RepositoryResult<Vec<Document>>;

    async fn update_document(
        &self,
        document_id: &str,
        update: UpdateDocument,
    ) -> RepositoryResult<Option<Document>>;

    async fn delete_document(&self, document_id: &str) -> RepositoryResult<bool>;
}
