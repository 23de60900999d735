//! Conversation web server

use chat_toolkit::api;
use chat_toolkit::config::AppConfig;
use chat_toolkit::core::services::DefaultConversationService;
use chat_toolkit::infrastructure::database::DatabaseConnection;
use chat_toolkit::infrastructure::repositories::{
    DbCitationRepository, DbConversationRepository, DbDocumentRepository, DbFileRepository,
    DbMessageRepository,
};

use anyhow::anyhow;
use axum::http::{HeaderValue, Method};
use di::{Injectable, ServiceCollection};
use di_axum::RouterServiceProviderExtensions;
use log::{info, warn};
use tokio::runtime::{Builder, Runtime};
use tower_http::cors::{Any, CorsLayer};

fn main() -> anyhow::Result<()> {
    // initialize tracing
    tracing_subscriber::fmt::init();

    let config = AppConfig::from_env()?;
    let runtime: Runtime = Builder::new_multi_thread().enable_all().build()?;

    runtime.block_on(web_server_task(config))
}

async fn web_server_task(config: AppConfig) -> anyhow::Result<()> {
    let pool = DatabaseConnection::connect(&config.database_url).await?;
    DatabaseConnection::install(pool);

    let provider = ServiceCollection::new()
        .add(DatabaseConnection::singleton())
        .add(DbConversationRepository::scoped())
        .add(DbMessageRepository::scoped())
        .add(DbFileRepository::scoped())
        .add(DbCitationRepository::scoped())
        .add(DbDocumentRepository::scoped())
        .add(DefaultConversationService::scoped())
        .build_provider()
        .map_err(|e| anyhow!("invalid service registrations: {e:?}"))?;

    let mut origins = Vec::with_capacity(config.allowed_origins.len());
    for origin in &config.allowed_origins {
        match origin.parse::<HeaderValue>() {
            Ok(origin) => origins.push(origin),
            Err(_) => warn!("ignoring invalid CORS origin {origin}"),
        }
    }

    let app = api::router()
        .layer(
            CorsLayer::new()
                .allow_headers(Any)
                .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
                .allow_origin(origins),
        )
        .with_provider(provider);

    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    info!("Shutting down...");

    Ok(())
}
