//! Repository errors
//!
//! Missing rows are never errors: lookups return `Option` and deletes return whether
//! anything matched. These variants cover failures of the store itself.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("cascade for {entity} {id} left {remaining} dependent rows behind")]
    IncompleteCascade {
        entity: &'static str,
        id: String,
        remaining: i64,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
