use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::entities::{File, Pagination, UpdateFile};
use crate::infrastructure::error::RepositoryResult;
use crate::infrastructure::traits::FileRepository;
use async_trait::async_trait;
use chrono::Utc;
use di::{Ref, injectable};
use log::error;
use sqlx::{QueryBuilder, Sqlite};

#[injectable(FileRepository)]
pub struct DbFileRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbFileRepository {
    pub fn new(connection: Ref<DatabaseConnection>) -> Self {
        DbFileRepository { connection }
    }
}

#[async_trait]
impl FileRepository for DbFileRepository {
    async fn create_file(&self, file: File) -> RepositoryResult<File> {
        let file = sqlx::query_as(
            "INSERT INTO files (id, file_name, file_path, file_size, conversation_id, user_id, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(file.id)
        .bind(file.file_name)
        .bind(file.file_path)
        .bind(file.file_size)
        .bind(file.conversation_id)
        .bind(file.user_id)
        .bind(file.created_at)
        .bind(file.updated_at)
        .fetch_one(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to create file: {e}"))?;

        Ok(file)
    }

    async fn get_file(&self, file_id: &str, user_id: &str) -> RepositoryResult<Option<File>> {
        let file = sqlx::query_as("SELECT * FROM files WHERE id = ? AND user_id = ?")
            .bind(file_id)
            .bind(user_id)
            .fetch_optional(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to get file {file_id}: {e}"))?;

        Ok(file)
    }

    async fn list_files(&self, user_id: &str, page: Pagination) -> RepositoryResult<Vec<File>> {
        let (offset, limit) = page.bounds();
        let files = sqlx::query_as(
            "SELECT * FROM files WHERE user_id = ? ORDER BY rowid ASC LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to list files: {e}"))?;

        Ok(files)
    }

    async fn list_files_by_conversation(
        &self,
        conversation_id: &str,
        user_id: &str,
    ) -> RepositoryResult<Vec<File>> {
        let files = sqlx::query_as(
            "SELECT * FROM files WHERE conversation_id = ? AND user_id = ? ORDER BY rowid ASC",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_all(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to list files of conversation {conversation_id}: {e}"))?;

        Ok(files)
    }

    async fn get_files_by_ids(
        &self,
        file_ids: &[String],
        user_id: &str,
    ) -> RepositoryResult<Vec<File>> {
        if file_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new("SELECT * FROM files WHERE user_id = ");
        query.push_bind(user_id);
        query.push(" AND id IN (");
        let mut ids = query.separated(", ");
        for file_id in file_ids {
            ids.push_bind(file_id.as_str());
        }
        ids.push_unseparated(") ORDER BY rowid ASC");

        let files = query
            .build_query_as()
            .fetch_all(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to get files by ids: {e}"))?;

        Ok(files)
    }

    async fn update_file(
        &self,
        file_id: &str,
        user_id: &str,
        update: UpdateFile,
    ) -> RepositoryResult<Option<File>> {
        let file = sqlx::query_as(
            "UPDATE files SET file_name = COALESCE(?, file_name), file_path = COALESCE(?, file_path), file_size = COALESCE(?, file_size), updated_at = ? WHERE id = ? AND user_id = ? RETURNING *",
        )
        .bind(update.file_name)
        .bind(update.file_path)
        .bind(update.file_size)
        .bind(Utc::now())
        .bind(file_id)
        .bind(user_id)
        .fetch_optional(&**self.connection)
        .await
        .inspect_err(|e| error!("failed to update file {file_id}: {e}"))?;

        Ok(file)
    }

    async fn delete_file(&self, file_id: &str, user_id: &str) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ? AND user_id = ?")
            .bind(file_id)
            .bind(user_id)
            .execute(&**self.connection)
            .await
            .inspect_err(|e| error!("failed to delete file {file_id}: {e}"))?;

        Ok(result.rows_affected() > 0)
    }
}
