use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{Citation, Pagination, UpdateCitation};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::CitationRepository;
use async_trait::async_trait;
use di::{Ref, injectable};
use log::error;
use sqlx::types::Json;

#[injectable(CitationRepository)]
pub struct DbCitationRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbCitationRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        DbCitationRepository { connection }
    }
}

#[async_trait]
impl CitationRepository for DbCitationRepository {
    async fn create_citation(&self, citation: Citation) -> RepositoryResult<Citation> {
        let citation = sqlx::query_as(
            "INSERT INTO citations (id, text, start_offset, end_offset, user_id, message_id, document_ids, created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(citation.id)
        .bind(citation.text)
        .bind(citation.start)
        .bind(citation.end)
        .bind(citation.user_id)
        .bind(citation.message_id)
        .bind(Json(citation.document_ids))
        .bind(citation.created_at)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to create citation: {e}"))?;

        Ok(citation)
    }

    async fn get_citation(&self, citation_id: &str) -> RepositoryResult<Option<Citation>> {
        let citation = sqlx::query_as("SELECT * FROM citations WHERE id = ?")
            .bind(citation_id)
            .fetch_optional(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to get citation {citation_id}: {e}"))?;

        Ok(citation)
    }

    async fn list_citations(&self, page: Pagination) -> RepositoryResult<Vec<Citation>> {
        let (offset, limit) = page.bounds();
        let citations =
            sqlx::query_as("SELECT * FROM citations ORDER BY rowid ASC LIMIT ? OFFSET ?")
                .bind(limit)
                .bind(offset)
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("failed to list citations: {e}"))?;

        Ok(citations)
    }

    async fn list_citations_by_message(
        &self,
        message_id: &str,
    ) -> RepositoryResult<Vec<Citation>> {
        let citations =
            sqlx::query_as("SELECT * FROM citations WHERE message_id = ? ORDER BY rowid ASC")
                .bind(message_id)
                .fetch_all(&**self.connection)
                .await
                .inspect_err(|e| error!("failed to list citations of message {message_id}: {e}"))?;

        Ok(citations)
    }

    async fn update_citation(
        &self,
        citation_id: &str,
        update: UpdateCitation,
    ) -> RepositoryResult<Option<Citation>> {
        let citation = sqlx::query_as(
            "UPDATE citations SET text = COALESCE(?, text), start_offset = COALESCE(?, start_offset), end_offset = COALESCE(?, end_offset), document_ids = COALESCE(?, document_ids) WHERE id = ? RETURNING *",
        )
        .bind(update.text)
        .bind(update.start)
        .bind(update.end)
        .bind(update.document_ids.map(Json))
        .bind(citation_id)
        .fetch_optional(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to update citation {citation_id}: {e}"))?;

        Ok(citation)
    }

    async fn delete_citation(&self, citation_id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM citations WHERE id = ?")
            .bind(citation_id)
            .execute(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to delete citation {citation_id}: {e}"))?;

        Ok(result.rows_affected() > 0)
    }
}
