//! Explicit cascading deletes
//!
//! The schema only enforces foreign keys; dependents are removed here, children first,
//! inside the caller's transaction. Each routine checks that nothing still points at
//! the deleted parent before returning, so the caller can commit or roll back as a unit.

use crate::infrastructure::entities::CascadeReport;
use crate::infrastructure::error::{RepositoryError, RepositoryResult};
use log::debug;
use sqlx::SqliteConnection;

/// Removes the citations and documents of a message, then the message itself.
pub(crate) async fn purge_message(
    connection: &mut SqliteConnection,
    message_id: &str,
) -> RepositoryResult<CascadeReport> {
    let citations = sqlx::query("DELETE FROM citations WHERE message_id = ?")
        .bind(message_id)
        .execute(&mut *connection)
        .await?
        .rows_affected();

    unlink_documents(
        &mut *connection,
        "SELECT id FROM documents WHERE message_id = ?",
        message_id,
    )
    .await?;

    let documents = sqlx::query("DELETE FROM documents WHERE message_id = ?")
        .bind(message_id)
        .execute(&mut *connection)
        .await?
        .rows_affected();

    let messages = sqlx::query("DELETE FROM messages WHERE id = ?")
        .bind(message_id)
        .execute(&mut *connection)
        .await?
        .rows_affected();

    let remaining: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM citations WHERE message_id = ?)
              + (SELECT COUNT(*) FROM documents WHERE message_id = ?)
              + (SELECT COUNT(*) FROM messages WHERE id = ?)",
    )
    .bind(message_id)
    .bind(message_id)
    .bind(message_id)
    .fetch_one(&mut *connection)
    .await?;

    if remaining > 0 {
        return Err(RepositoryError::IncompleteCascade {
            entity: "message",
            id: message_id.to_owned(),
            remaining,
        });
    }

    debug!("purged message {message_id}: {citations} citations, {documents} documents");

    Ok(CascadeReport {
        messages,
        citations,
        documents,
        files: 0,
    })
}

/// Drops a document id from every citation that lists it.
pub(crate) async fn unlink_document(
    connection: &mut SqliteConnection,
    document_id: &str,
) -> RepositoryResult<u64> {
    unlink_documents(connection, "SELECT id FROM documents WHERE id = ?", document_id).await
}

/// Drops the ids selected by `documents` (one bound parameter) from citation lists.
async fn unlink_documents(
    connection: &mut SqliteConnection,
    documents: &str,
    key: &str,
) -> RepositoryResult<u64> {
    let citations = sqlx::query(&format!(
        "UPDATE citations
            SET document_ids = (SELECT json_group_array(value) FROM json_each(citations.document_ids) WHERE value NOT IN ({documents}))
          WHERE EXISTS (SELECT 1 FROM json_each(citations.document_ids) WHERE value IN ({documents}))"
    ))
    .bind(key)
    .bind(key)
    .execute(&mut *connection)
    .await?
    .rows_affected();

    debug!("unlinked documents of {key} from {citations} citations");

    Ok(citations)
}

/// Removes every message (with dependents), document and file of a conversation,
/// then the conversation itself.
pub(crate) async fn purge_conversation(
    connection: &mut SqliteConnection,
    conversation_id: &str,
) -> RepositoryResult<CascadeReport> {
    let message_ids: Vec<String> =
        sqlx::query_scalar("SELECT id FROM messages WHERE conversation_id = ? ORDER BY rowid")
            .bind(conversation_id)
            .fetch_all(&mut *connection)
            .await?;

    let mut report = CascadeReport::default();
    for message_id in &message_ids {
        let purged = purge_message(&mut *connection, message_id).await?;
        report.messages += purged.messages;
        report.citations += purged.citations;
        report.documents += purged.documents;
    }

    // documents attached to this conversation through another conversation's message
    unlink_documents(
        &mut *connection,
        "SELECT id FROM documents WHERE conversation_id = ?",
        conversation_id,
    )
    .await?;

    report.documents += sqlx::query("DELETE FROM documents WHERE conversation_id = ?")
        .bind(conversation_id)
        .execute(&mut *connection)
        .await?
        .rows_affected();

    report.files = sqlx::query("DELETE FROM files WHERE conversation_id = ?")
        .bind(conversation_id)
        .execute(&mut *connection)
        .await?
        .rows_affected();

    sqlx::query("DELETE FROM conversations WHERE id = ?")
        .bind(conversation_id)
        .execute(&mut *connection)
        .await?;

    let remaining: i64 = sqlx::query_scalar(
        "SELECT (SELECT COUNT(*) FROM messages WHERE conversation_id = ?)
              + (SELECT COUNT(*) FROM documents WHERE conversation_id = ?)
              + (SELECT COUNT(*) FROM files WHERE conversation_id = ?)
              + (SELECT COUNT(*) FROM conversations WHERE id = ?)",
    )
    .bind(conversation_id)
    .bind(conversation_id)
    .bind(conversation_id)
    .bind(conversation_id)
    .fetch_one(&mut *connection)
    .await?;

    if remaining > 0 {
        return Err(RepositoryError::IncompleteCascade {
            entity: "conversation",
            id: conversation_id.to_owned(),
            remaining,
        });
    }

    debug!(
        "purged conversation {conversation_id}: {} messages, {} files",
        report.messages, report.files
    );

    Ok(report)
}
