//! Message endpoints, including the citations and documents a message owns

use crate::api::messages::schemas::{CitationList, DocumentList};
use crate::api::{ApiError, ApiResult, ExtractUser};
use crate::infrastructure::entities::UpdateMessage;
use crate::infrastructure::traits::{CitationRepository, DocumentRepository, MessageRepository};
use axum::extract::Path;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route(
            "/:id",
            get(get_message).patch(update_message).delete(delete_message),
        )
        .route("/:id/citations", get(message_citations))
        .route("/:id/documents", get(message_documents))
}

async fn get_message(
    Inject(messages): Inject<dyn MessageRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(message_id): Path<String>,
) -> ApiResult<Json<schemas::Message>> {
    messages
        .get_message(&message_id, &current_user)
        .await?
        .map(|message| Json(message.into()))
        .ok_or(ApiError::NotFound("message"))
}

async fn update_message(
    Inject(messages): Inject<dyn MessageRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(message_id): Path<String>,
    Json(update): Json<UpdateMessage>,
) -> ApiResult<Json<schemas::Message>> {
    messages
        .update_message(&message_id, &current_user, update)
        .await?
        .map(|message| Json(message.into()))
        .ok_or(ApiError::NotFound("message"))
}

async fn delete_message(
    Inject(messages): Inject<dyn MessageRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(message_id): Path<String>,
) -> ApiResult<StatusCode> {
    messages.delete_message(&message_id, &current_user).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn message_citations(
    Inject(messages): Inject<dyn MessageRepository>,
    Inject(citations): Inject<dyn CitationRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(message_id): Path<String>,
) -> ApiResult<Json<CitationList>> {
    // citations are only visible through a message the user owns
    if messages.get_message(&message_id, &current_user).await?.is_none() {
        return Err(ApiError::NotFound("message"));
    }

    let citations = citations.list_citations_by_message(&message_id).await?;

    Ok(Json(CitationList {
        citations: citations.into_iter().map(Into::into).collect(),
    }))
}

async fn message_documents(
    Inject(messages): Inject<dyn MessageRepository>,
    Inject(documents): Inject<dyn DocumentRepository>,
    ExtractUser(current_user): ExtractUser,
    Path(message_id): Path<String>,
) -> ApiResult<Json<DocumentList>> {
    if messages.get_message(&message_id, &current_user).await?.is_none() {
        return Err(ApiError::NotFound("message"));
    }

    let documents = documents.list_documents_by_message(&message_id).await?;

    Ok(Json(DocumentList {
        documents: documents.into_iter().map(Into::into).collect(),
    }))
}

pub mod schemas {
    use crate::infrastructure::entities;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
    #[serde(rename_all = "UPPERCASE")]
    pub enum MessageAgent {
        User,
        Chatbot,
    }

    impl From<entities::MessageAgent> for MessageAgent {
        fn from(agent: entities::MessageAgent) -> Self {
            match agent {
                entities::MessageAgent::User => MessageAgent::User,
                entities::MessageAgent::Chatbot => MessageAgent::Chatbot,
            }
        }
    }

    impl From<MessageAgent> for entities::MessageAgent {
        fn from(agent: MessageAgent) -> Self {
            match agent {
                MessageAgent::User => entities::MessageAgent::User,
                MessageAgent::Chatbot => entities::MessageAgent::Chatbot,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct Message {
        pub id: String,
        pub conversation_id: String,
        pub text: String,
        pub position: i64,
        pub agent: MessageAgent,
        pub is_active: bool,
        pub generation_id: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    impl From<entities::Message> for Message {
        fn from(message: entities::Message) -> Self {
            Message {
                id: message.id,
                conversation_id: message.conversation_id,
                text: message.text,
                position: message.position,
                agent: message.agent.into(),
                is_active: message.is_active,
                generation_id: message.generation_id,
                created_at: message.created_at,
                updated_at: message.updated_at,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct Citation {
        pub id: String,
        pub text: String,
        pub start: i64,
        pub end: i64,
        pub document_ids: Vec<String>,
    }

    impl From<entities::Citation> for Citation {
        fn from(citation: entities::Citation) -> Self {
            Citation {
                id: citation.id,
                text: citation.text,
                start: citation.start,
                end: citation.end,
                document_ids: citation.document_ids,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct CitationList {
        pub citations: Vec<Citation>,
    }

    #[derive(Serialize, Debug)]
    pub struct Document {
        pub id: String,
        pub text: String,
        pub title: Option<String>,
        pub url: Option<String>,
        pub tool_name: Option<String>,
    }

    impl From<entities::Document> for Document {
        fn from(document: entities::Document) -> Self {
            Document {
                id: document.id,
                text: document.text,
                title: document.title,
                url: document.url,
                tool_name: document.tool_name,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct DocumentList {
        pub documents: Vec<Document>,
    }
}
