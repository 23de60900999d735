use crate::infrastructure::cascade;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{
    CascadeReport, Conversation, Pagination, UpdateConversation,
};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::ConversationRepository;
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use log::{error, info};

#[injectable(ConversationRepository)]
pub struct DbConversationRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbConversationRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        DbConversationRepository { connection }
    }
}

#[async_trait]
impl ConversationRepository for DbConversationRepository {
    async fn create_conversation(
        &self,
        conversation: Conversation,
    ) -> RepositoryResult<Conversation> {
        let conversation = sqlx::query_as(
            "INSERT INTO conversations (id, user_id, title, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(conversation.title)
        .bind(conversation.description)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to create conversation: {e}"))?;

        Ok(conversation)
    }

    async fn get_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<Conversation>> {
        let conversation =
            sqlx::query_as("SELECT * FROM conversations WHERE id = ? AND user_id = ?")
                .bind(conversation_id)
                .bind(user_id)
                .fetch_optional(&**self.connection)
                .await
                .inspect_err(|e| error!("failed to get conversation {conversation_id}: {e}"))?;

        Ok(conversation)
    }

    async fn list_conversations(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> RepositoryResult<Vec<Conversation>> {
        let (offset, limit) = page.bounds();
        let conversations = sqlx::query_as(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to list conversations: {e}"))?;

        Ok(conversations)
    }

    async fn update_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
        update: UpdateConversation,
    ) -> RepositoryResult<Option<Conversation>> {
        let conversation = sqlx::query_as(
            "UPDATE conversations SET title = COALESCE(?, title), description = COALESCE(?, description), updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(update.title)
        .bind(update.description)
        .bind(Utc::now())
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to update conversation {conversation_id}: {e}"))?;

        Ok(conversation)
    }

    async fn delete_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>> {
        let mut tx = self.connection.begin().await?;

        let owned: Option<String> =
            sqlx::query_scalar("SELECT id FROM conversations WHERE id = ? AND user_id = ?")
                .bind(conversation_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            return Ok(None);
        }

        let report = cascade::purge_conversation(&mut *tx, conversation_id)
            .await
            .inspect_err(|e| error!("failed to delete conversation {conversation_id}: {e}"))?;
        tx.commit().await?;

        info!(
            "deleted conversation {conversation_id} with {} messages and {} files",
            report.messages, report.files
        );

        Ok(Some(report))
    }
}
