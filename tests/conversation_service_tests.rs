mod common;

use chat_toolkit::core::services::DefaultConversationService;
use chat_toolkit::core::traits::ConversationService;
use chat_toolkit::infrastructure::database::DatabaseConnection;
use chat_toolkit::infrastructure::entities::{
    Citation, DEFAULT_CONVERSATION_TITLE, Document, File, MessageAgent, Pagination,
    UpdateConversation,
};
use chat_toolkit::infrastructure::repositories::{
    DbCitationRepository, DbConversationRepository, DbDocumentRepository, DbFileRepository,
    DbMessageRepository,
};
use chat_toolkit::infrastructure::traits::{CitationRepository, DocumentRepository, FileRepository};
use common::{repositories, setup_test_db};
use di::Ref;
use sqlx::SqlitePool;

const USER: &str = "user-1";
const OTHER_USER: &str = "user-2";

fn service(pool: &SqlitePool) -> DefaultConversationService {
    let connection = Ref::new(DatabaseConnection::from_pool(pool.clone()));

    DefaultConversationService::new(
        Ref::new(DbConversationRepository::new(connection.clone())),
        Ref::new(DbMessageRepository::new(connection.clone())),
        Ref::new(DbFileRepository::new(connection.clone())),
        Ref::new(DbCitationRepository::new(connection.clone())),
        Ref::new(DbDocumentRepository::new(connection)),
    )
}

#[tokio::test]
async fn test_create_conversation_title_falls_back_to_default() {
    let pool = setup_test_db().await;
    let service = service(&pool);

    let untitled = service
        .create_conversation(USER, None, None)
        .await
        .unwrap();
    assert_eq!(untitled.title, DEFAULT_CONVERSATION_TITLE);

    let blank = service
        .create_conversation(USER, Some("   ".to_owned()), None)
        .await
        .unwrap();
    assert_eq!(blank.title, DEFAULT_CONVERSATION_TITLE);

    let titled = service
        .create_conversation(USER, Some("Trip".to_owned()), Some("planning".to_owned()))
        .await
        .unwrap();
    assert_eq!(titled.title, "Trip");
    assert_eq!(titled.description.as_deref(), Some("planning"));

    let conversations = service
        .list_conversations(USER, Pagination::default())
        .await
        .unwrap();
    assert_eq!(conversations.len(), 3);
}

#[tokio::test]
async fn test_messages_are_appended_in_order() {
    let pool = setup_test_db().await;
    let service = service(&pool);
    let conversation = service
        .create_conversation(USER, None, None)
        .await
        .unwrap();

    let question = service
        .create_user_message(USER, &conversation.id, "What's up?".to_owned())
        .await
        .unwrap()
        .unwrap();
    let answer = service
        .create_bot_message(USER, &conversation.id, "Not much.".to_owned())
        .await
        .unwrap()
        .unwrap();

    assert_eq!(question.position, 0);
    assert_eq!(question.agent, MessageAgent::User);
    assert_eq!(answer.position, 1);
    assert_eq!(answer.agent, MessageAgent::Chatbot);

    let threads = service
        .list_messages(USER, &conversation.id)
        .await
        .unwrap()
        .unwrap();
    let texts: Vec<&str> = threads.iter().map(|t| t.message.text.as_str()).collect();
    assert_eq!(texts, ["What's up?", "Not much."]);
}

#[tokio::test]
async fn test_message_for_foreign_conversation_is_refused() {
    let pool = setup_test_db().await;
    let service = service(&pool);
    let conversation = service
        .create_conversation(USER, None, None)
        .await
        .unwrap();

    let message = service
        .create_user_message(OTHER_USER, &conversation.id, "intruder".to_owned())
        .await
        .unwrap();
    assert!(message.is_none());

    let threads = service
        .list_messages(OTHER_USER, &conversation.id)
        .await
        .unwrap();
    assert!(threads.is_none());

    let message = service
        .create_user_message(USER, "missing", "hello".to_owned())
        .await
        .unwrap();
    assert!(message.is_none());
}

#[tokio::test]
async fn test_list_messages_includes_citations_and_documents() {
    let pool = setup_test_db().await;
    let service = service(&pool);
    let repos = repositories(&pool);
    let conversation = service
        .create_conversation(USER, None, None)
        .await
        .unwrap();

    let message = service
        .create_bot_message(USER, &conversation.id, "The sky is blue.".to_owned())
        .await
        .unwrap()
        .unwrap();
    let document = repos
        .documents
        .create_document(Document::new(&message.id, &conversation.id, "sky facts"))
        .await
        .unwrap();
    repos
        .citations
        .create_citation(Citation::new(
            USER,
            &message.id,
            "blue",
            11,
            15,
            vec![document.id.clone()],
        ))
        .await
        .unwrap();

    let threads = service
        .list_messages(USER, &conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(threads.len(), 1);
    assert_eq!(threads[0].citations.len(), 1);
    assert_eq!(threads[0].citations[0].document_ids, [document.id.clone()]);
    assert_eq!(threads[0].documents.len(), 1);
    assert_eq!(threads[0].documents[0].id, document.id);
}

#[tokio::test]
async fn test_get_conversation_detail() {
    let pool = setup_test_db().await;
    let service = service(&pool);
    let repos = repositories(&pool);
    let conversation = service
        .create_conversation(USER, Some("Detail".to_owned()), None)
        .await
        .unwrap();

    service
        .create_user_message(USER, &conversation.id, "hello".to_owned())
        .await
        .unwrap();
    repos
        .files
        .create_file(File::new(USER, &conversation.id, "a.txt", "/tmp/a.txt", 3))
        .await
        .unwrap();

    let detail = service
        .get_conversation(USER, &conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(detail.conversation.title, "Detail");
    assert_eq!(detail.messages.len(), 1);
    assert_eq!(detail.files.len(), 1);

    assert!(
        service
            .get_conversation(OTHER_USER, &conversation.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_update_and_delete_conversation() {
    let pool = setup_test_db().await;
    let service = service(&pool);
    let repos = repositories(&pool);
    let conversation = service
        .create_conversation(USER, None, None)
        .await
        .unwrap();
    service
        .create_user_message(USER, &conversation.id, "hello".to_owned())
        .await
        .unwrap();

    let update = UpdateConversation {
        description: Some("now described".to_owned()),
        ..Default::default()
    };
    let updated = service
        .update_conversation(USER, &conversation.id, update)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.title, DEFAULT_CONVERSATION_TITLE);
    assert_eq!(updated.description.as_deref(), Some("now described"));

    assert!(
        service
            .delete_conversation(OTHER_USER, &conversation.id)
            .await
            .unwrap()
            .is_none()
    );

    let report = service
        .delete_conversation(USER, &conversation.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(report.messages, 1);

    assert!(
        repos
            .files
            .list_files_by_conversation(&conversation.id, USER)
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        service
            .list_messages(USER, &conversation.id)
            .await
            .unwrap()
            .is_none()
    );
}
