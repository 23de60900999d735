use crate::infrastructure::cascade;
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{CascadeReport, Message, Pagination, UpdateMessage};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::MessageRepository;
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use log::{error, info};

#[injectable(MessageRepository)]
pub struct DbMessageRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbMessageRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        DbMessageRepository { connection }
    }
}

#[async_trait]
impl MessageRepository for DbMessageRepository {
    async fn create_message(&self, message: Message) -> RepositoryResult<Message> {
        let message = sqlx::query_as(
            "INSERT INTO messages (id, text, user_id, conversation_id, position, agent, is_active, generation_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(message.id)
        .bind(message.text)
        .bind(message.user_id)
        .bind(message.conversation_id)
        .bind(message.position)
        .bind(message.agent)
        .bind(message.is_active)
        .bind(message.generation_id)
        .bind(message.created_at)
        .bind(message.updated_at)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to create message: {e}"))?;

        Ok(message)
    }

    async fn get_message(
        &self,
        message_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<Message>> {
        let message = sqlx::query_as("SELECT * FROM messages WHERE id = ? AND user_id = ?")
            .bind(message_id)
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to get message {message_id}: {e}"))?;

        Ok(message)
    }

    async fn list_messages(
        &self,
        user_id: &str,
        page: Pagination,
    ) -> RepositoryResult<Vec<Message>> {
        let (offset, limit) = page.bounds();
        let messages = sqlx::query_as(
            "SELECT * FROM messages WHERE user_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to list messages: {e}"))?;

        Ok(messages)
    }

    async fn list_messages_by_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Vec<Message>> {
        let messages = sqlx::query_as(
            "SELECT * FROM messages WHERE conversation_id = ? AND user_id = ? ORDER BY rowid ASC",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| {
            error!("failed to list messages of conversation {conversation_id}: {e}")
        })?;

        Ok(messages)
    }

    async fn update_message(
        &self,
        message_id: &str,
        user_id: &str,
        update: UpdateMessage,
    ) -> RepositoryResult<Option<Message>> {
        let message = sqlx::query_as(
            "UPDATE messages SET text = COALESCE(?, text), position = COALESCE(?, position), is_active = COALESCE(?, is_active), generation_id = COALESCE(?, generation_id), updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(update.text)
        .bind(update.position)
        .bind(update.is_active)
        .bind(update.generation_id)
        .bind(Utc::now())
        .bind(message_id)
        .bind(user_id)
        .fetch_optional(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to update message {message_id}: {e}"))?;

        Ok(message)
    }

    async fn delete_message(
        &self,
        message_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Option<CascadeReport>> {
        let mut tx = self.connection.begin().await?;

        let owned: Option<String> =
            sqlx::query_scalar("SELECT id FROM messages WHERE id = ? AND user_id = ?")
                .bind(message_id)
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;

        if owned.is_none() {
            // dropping the transaction rolls it back
            return Ok(None);
        }

        let report = cascade::purge_message(&mut *tx, message_id)
            .await
            .inspect_err(|e| error!("failed to delete message {message_id}: {e}"))?;
        tx.commit().await?;

        info!(
            "deleted message {message_id} with {} citations and {} documents",
            report.citations, report.documents
        );

        Ok(Some(report))
    }

    async fn next_position(&self, conversation_id: &str) -> RepositoryResult<i64> {
        let position: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM messages WHERE conversation_id = ?",
        )
        .bind(conversation_id)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to compute next position: {e}"))?;

        Ok(position)
    }
}
