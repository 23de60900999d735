//! Shared fixtures for the integration tests

#![allow(dead_code)]

use chat_toolkit::infrastructure::database::DatabaseConnection;
use chat_toolkit::infrastructure::entities::{Conversation, Message, MessageAgent};
use chat_toolkit::infrastructure::repositories::{
    DbCitationRepository, DbConversationRepository, DbDocumentRepository, DbFileRepository,
    DbMessageRepository,
};
use chat_toolkit::infrastructure::traits::{ConversationRepository, MessageRepository};
use di::Ref;
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicU32, Ordering};

/// Counter for unique test database URIs
static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Setup test database with migrations and returns pool
/// Each call gets its own in-memory SQLite database
pub async fn setup_test_db() -> SqlitePool {
    let db_num = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_url = format!("sqlite:file:chat_toolkit_test{}?mode=memory&cache=shared", db_num);

    let pool = SqlitePool::connect(&db_url).await.unwrap();
    DatabaseConnection::migrate(&pool).await.unwrap();
    pool
}

pub struct Repositories {
    pub conversations: DbConversationRepository,
    pub messages: DbMessageRepository,
    pub files: DbFileRepository,
    pub citations: DbCitationRepository,
    pub documents: DbDocumentRepository,
}

pub fn repositories(pool: &SqlitePool) -> Repositories {
    let connection = Ref::new(DatabaseConnection::from_pool(pool.clone()));

    Repositories {
        conversations: DbConversationRepository::new(connection.clone()),
        messages: DbMessageRepository::new(connection.clone()),
        files: DbFileRepository::new(connection.clone()),
        citations: DbCitationRepository::new(connection.clone()),
        documents: DbDocumentRepository::new(connection),
    }
}

/// Creates a conversation with a fixed id.
pub async fn seed_conversation(repos: &Repositories, id: &str, user_id: &str) -> Conversation {
    let mut conversation = Conversation::new(user_id);
    conversation.id = id.to_owned();

    repos
        .conversations
        .create_conversation(conversation)
        .await
        .unwrap()
}

pub async fn seed_message(
    repos: &Repositories,
    conversation_id: &str,
    user_id: &str,
    text: &str,
) -> Message {
    let position = repos.messages.next_position(conversation_id).await.unwrap();

    repos
        .messages
        .create_message(Message::new(
            user_id,
            conversation_id,
            MessageAgent::User,
            text,
            position,
        ))
        .await
        .unwrap()
}
