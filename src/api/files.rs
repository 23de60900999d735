//! File metadata endpoints

use crate::api::files::schemas::{CreateFile, FileQuery, FilesList};
use crate::api::{ApiError, ApiResult, ExtractUser};
use crate::infrastructure::entities::{File, Pagination, UpdateFile};
use crate::infrastructure::traits::{ConversationRepository, FileRepository};
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_files).post(new_file))
        .route("/:id", get(get_file).patch(update_file).delete(delete_file))
}

/// Lists the user's files, or only the ones named in `ids` (comma separated).
async fn list_files(
    Inject(files): Inject<dyn FileRepository>,
    ExtractUser(current_user): ExtractUser,
    Query(query): Query<FileQuery>,
) -> ApiResult<Json<FilesList>> {
    let files = match query.ids {
        Some(ids) => {
            let ids: Vec<String> = ids
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_owned)
                .collect();
            files.get_files_by_ids(&ids, &current_user).await?
        }
        None => {
            let defaults = Pagination::default();
            let page = Pagination::new(
                query.offset.unwrap_or(defaults.offset),
                query.limit.unwrap_or(defaults.limit),
            );
            files.list_files(&current_user, page).await?
        }
    };

    Ok(Json(FilesList {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

async fn new_file(
    Inject(files): Inject<dyn FileRepository>,
    Inject(conversations): Inject<dyn ConversationRepository>,
    ExtractUser(current_user): ExtractUser,
    Json(create_file): Json<CreateFile>,
) -> ApiResult<(StatusCode, Json<schemas::File>)> {
    if conversations
        .get_conversation(&create_file.conversation_id, &current_user)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("conversation"));
    }

    let file = files
        .create_file(File::new(
            current_user,
            create_file.conversation_id,
            create_file.file_name,
            create_file.file_path,
            create_file.file_size,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(file.into())))
}

async fn get_file(
    Inject(files): Inject<dyn FileRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(file_id): Path<String>,
) -> ApiResult<Json<schemas::File>> {
    files
        .get_file(&file_id, &current_user)
        .await?
        .map(|file| Json(file.into()))
        .ok_or(ApiError::NotFound("file"))
}

async fn update_file(
    Inject(files): Inject<dyn FileRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(file_id): Path<String>,
    Json(update): Json<UpdateFile>,
) -> ApiResult<Json<schemas::File>> {
    files
        .update_file(&file_id, &current_user, update)
        .await?
        .map(|file| Json(file.into()))
        .ok_or(ApiError::NotFound("file"))
}

async fn delete_file(
    Inject(files): Inject<dyn FileRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(file_id): Path<String>,
) -> ApiResult<StatusCode> {
    files.delete_file(&file_id, &current_user).await?;

    Ok(StatusCode::NO_CONTENT)
}

pub mod schemas {
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug, Default)]
    pub struct FileQuery {
        pub ids: Option<String>,
        pub offset: Option<i64>,
        pub limit: Option<i64>,
    }

    #[derive(Deserialize, Debug)]
    pub struct CreateFile {
        pub conversation_id: String,
        pub file_name: String,
        pub file_path: String,
        #[serde(default)]
        pub file_size: i64,
    }

    #[derive(Serialize, Debug)]
    pub struct File {
        pub id: String,
        pub conversation_id: String,
        pub file_name: String,
        pub file_path: String,
        pub file_size: i64,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<entities::File> for File {
        fn from(file: entities::File) -> Self {
            File {
                id: file.id,
                conversation_id: file.conversation_id,
                file_name: file.file_name,
                file_path: file.file_path,
                file_size: file.file_size,
                created_at: file.created_at,
                updated_at: file.updated_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct FilesList {
        pub files: Vec<File>,
    }
}
