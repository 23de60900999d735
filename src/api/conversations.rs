//! Conversations endpoints

use crate::api::conversations::schemas::{
    ConversationList, CreateConversation, CreateMessage, MessagesList,
};
use crate::api::files::schemas::FilesList;
use crate::api::{ApiError, ApiResult, ExtractUser};
use crate::core::traits::ConversationService;
use crate::infrastructure::entities::{MessageAgent, Pagination, UpdateConversation};
use crate::infrastructure::traits::FileRepository;
use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_conversations).post(new_conversation))
        .route(
            "/:id",
            get(get_conversation)
                .patch(update_conversation)
                .delete(delete_conversation),
        )
        .route(
            "/:id/messages",
            get(conversation_messages).post(post_message),
        )
        .route("/:id/files", get(conversation_files))
}

async fn list_conversations(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Query(page): Query<Pagination>,
) -> ApiResult<Json<ConversationList>> {
    let conversations = conversation_service
        .list_conversations(&current_user, page)
        .await?;

    Ok(Json(ConversationList {
        conversations: conversations
            .into_iter()
            .map(schemas::Conversation::from)
            .collect(),
    }))
}

async fn new_conversation(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Json(create_conversation): Json<CreateConversation>,
) -> ApiResult<(StatusCode, Json<schemas::Conversation>)> {
    let conversation = conversation_service
        .create_conversation(
            &current_user,
            create_conversation.title,
            create_conversation.description,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(conversation.into())))
}

async fn get_conversation(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<schemas::ConversationDetail>> {
    conversation_service
        .get_conversation(&current_user, &conversation_id)
        .await?
        .map(|detail| Json(detail.into()))
        .ok_or(ApiError::NotFound("conversation"))
}

async fn update_conversation(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
    Json(update): Json<UpdateConversation>,
) -> ApiResult<Json<schemas::Conversation>> {
    conversation_service
        .update_conversation(&current_user, &conversation_id, update)
        .await?
        .map(|conversation| Json(conversation.into()))
        .ok_or(ApiError::NotFound("conversation"))
}

async fn delete_conversation(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<StatusCode> {
    conversation_service
        .delete_conversation(&current_user, &conversation_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn conversation_messages(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<MessagesList>> {
    let threads = conversation_service
        .list_messages(&current_user, &conversation_id)
        .await?
        .ok_or(ApiError::NotFound("conversation"))?;

    Ok(Json(MessagesList {
        messages: threads.into_iter().map(schemas::Message::from).collect(),
    }))
}

async fn post_message(
    Inject(conversation_service): Inject<dyn ConversationService>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
    Json(message): Json<CreateMessage>,
) -> ApiResult<(StatusCode, Json<schemas::Message>)> {
    let agent = message.agent.map(MessageAgent::from).unwrap_or(MessageAgent::User);
    let message = conversation_service
        .create_raw_message(&current_user, &conversation_id, agent, message.text)
        .await?
        .ok_or(ApiError::NotFound("conversation"))?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

async fn conversation_files(
    Inject(files): Inject<dyn FileRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(conversation_id): Path<String>,
) -> ApiResult<Json<FilesList>> {
    let files = files
        .list_files_by_conversation(&conversation_id, &current_user)
        .await?;

    Ok(Json(FilesList {
        files: files.into_iter().map(Into::into).collect(),
    }))
}

pub mod schemas {
    use crate::api::files::schemas::File;
    use crate::core::traits;
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Debug, Default)]
    pub struct CreateConversation {
        pub title: Option<String>,
        pub description: Option<String>,
    }

    #[derive(Serialize, Debug)]
    pub struct Conversation {
        pub id: String,
        pub title: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<entities::Conversation> for Conversation {
        fn from(conversation: entities::Conversation) -> Self {
            Conversation {
                id: conversation.id,
                title: conversation.title,
                description: conversation.description,
                created_at: conversation.created_at,
                updated_at: conversation.updated_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct ConversationList {
        pub conversations: Vec<Conversation>,
    }

    #[derive(Serialize, Debug)]
    pub struct ConversationDetail {
        #[serde(flatten)]
        pub conversation: Conversation,
        pub messages: Vec<crate::api::messages::schemas::Message>,
        pub files: Vec<File>,
    }

    impl From<traits::ConversationDetail> for ConversationDetail {
        fn from(detail: traits::ConversationDetail) -> Self {
            ConversationDetail {
                conversation: detail.conversation.into(),
                messages: detail.messages.into_iter().map(Into::into).collect(),
                files: detail.files.into_iter().map(Into::into).collect(),
            }
        }
    }

    #[derive(Serialize, Debug, Default)]
    pub struct MessagesList {
        pub messages: Vec<Message>,
    }

    /// A message as listed inside its conversation.
    #[derive(Serialize, Debug)]
    pub struct Message {
        #[serde(flatten)]
        pub message: crate::api::messages::schemas::Message,
        pub citations: Vec<crate::api::messages::schemas::Citation>,
        pub documents: Vec<crate::api::messages::schemas::Document>,
    }

    impl From<traits::MessageThread> for Message {
        fn from(thread: traits::MessageThread) -> Self {
            Message {
                message: thread.message.into(),
                citations: thread.citations.into_iter().map(Into::into).collect(),
                documents: thread.documents.into_iter().map(Into::into).collect(),
            }
        }
    }

    impl From<entities::Message> for Message {
        fn from(message: entities::Message) -> Self {
            Message {
                message: message.into(),
                citations: Vec::new(),
                documents: Vec::new(),
            }
        }
    }

    #[derive(Deserialize, Debug)]
    pub struct CreateMessage {
        pub text: String,
        pub agent: Option<crate::api::messages::schemas::MessageAgent>,
    }
}
