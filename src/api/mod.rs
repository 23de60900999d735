use crate::infrastructure::error::RepositoryError;
use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use log::error;
use serde::Serialize;
use thiserror::Error;

pub mod conversations;
pub mod files;
pub mod messages;

pub const USER_ID_HEADER: &str = "User-Id";

/// All API routes, without DI or middleware attached.
pub fn router() -> Router {
    Router::new()
        .nest("/conversations", conversations::router())
        .nest("/messages", messages::router())
        .nest("/files", files::router())
}

#[derive(Debug)]
pub struct ExtractUser(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for ExtractUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, (StatusCode, &'static str)> {
        if let Some(user_id) = parts.headers.get(USER_ID_HEADER) {
            let user_id = user_id
                .to_str()
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid user id"))?
                .trim();
            if user_id.is_empty() {
                return Err((StatusCode::BAD_REQUEST, "invalid user id"));
            }
            Ok(ExtractUser(user_id.to_owned()))
        } else {
            Err((StatusCode::BAD_REQUEST, "`User-Id` header is missing"))
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ApiError::Repository(e) => {
                error!("request failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
