use crate::infrastructure::cascade;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Document, Pagination, UpdateDocument};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::DocumentRepository;
use async_trait::async_trait;
use di::{Ref, injectable};
use log::error;

#[injectable(DocumentRepository)]
pub struct DbDocumentRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbDocumentRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        DbDocumentRepository { connection }
    }
}

#[async_trait]
impl DocumentRepository for DbDocumentRepository {
    async fn create_document(&self, document: Document) -> RepositoryResult<Document> {
        let document = sqlx::query_as(
            "INSERT INTO documents (id, message_id, conversation_id, text, title, url, tool_name, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(document.id)
        .bind(document.message_id)
        .bind(document.conversation_id)
        .bind(document.text)
        .bind(document.title)
        .bind(document.url)
        .bind(document.tool_name)
        .bind(document.created_at)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to create document: {e}"))?;

        Ok(document)
    }

    async fn get_document(&self, document_id: &str) -> RepositoryResult<Option<Document>> {
        let document = sqlx::query_as("SELECT * FROM documents WHERE id = ?")
            .bind(document_id)
            .fetch_optional(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to get document {document_id}: {e}"))?;

        Ok(document)
    }

    async fn list_documents(&self, page: Pagination) -> RepositoryResult<Vec<Document>> {
        let (offset, limit) = page.bounds();
        let documents =
            sqlx::query_as("SELECT * FROM documents ORDER BY rowid ASC LIMIT ? OFFSET ?")
                .bind(limit)
                .bind(offset)
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("failed to list documents: {e}"))?;

        Ok(documents)
    }

    async fn list_documents_by_message(
        &self,
        message_id: &str,
    ) -> RepositoryResult<Vec<Document>> {
        let documents =
            sqlx::query_as("SELECT * FROM documents WHERE message_id = ? ORDER BY rowid ASC")
                .bind(message_id)
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("failed to list documents of message {message_id}: {e}"))?;

        Ok(documents)
    }

    async fn list_documents_by_conversation(
        &self,
        conversation_id: &str,
    ) -> RepositoryResult<Vec<Document>> {
        let documents = sqlx::query_as(
            "SELECT * FROM documents WHERE conversation_id = ? ORDER BY rowid ASC",
        )
        .bind(conversation_id)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| {
            error!("failed to list documents of conversation {conversation_id}: {e}")
        })?;

        Ok(documents)
    }

    async fn update_document(
        &self,
        document_id: &str,
        update: UpdateDocument,
    ) -> RepositoryResult<Option<Document>> {
        let document = sqlx::query_as(
            "UPDATE documents SET text = COALESCE(?, text), title = COALESCE(?, title), url = COALESCE(?, url) WHERE id = ? RETURNING *",
        )
        .bind(update.text)
        .bind(update.title)
        .bind(update.url)
        .bind(document_id)
        .fetch_optional(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to update document {document_id}: {e}"))?;

        Ok(document)
    }

    async fn delete_document(&self, document_id: &str) -> RepositoryResult<bool> {
        let mut tx = self.connection.begin().await?;

        cascade::unlink_document(&mut *tx, document_id)
            .await
            .inspect_err(|e| error!("failed to unlink document {document_id}: {e}"))?;

        let result = sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(document_id)
            .execute(&mut *tx)
            .await
            .inspect_err(|e| error!("failed to delete document {document_id}: {e}"))?;
        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}
