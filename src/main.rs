use groupchat::{
    chat::repository::{ChatRepository, InMemoryChatRepository, PostgresChatRepository},
    create_router,
    event::ConnectionEventEmitter,
    user::{
        repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository},
        seed_demo_users,
    },
    websockets::{ConnectionManager, InMemoryConnectionManager},
    AppConfig, AppState,
};
use sqlx::{postgres::PgPoolOptions, Executor};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const SCHEMA: &str = include_str!("../migrations/0001_init.sql");

type Repositories = (
    Arc<dyn ChatRepository + Send + Sync>,
    Arc<dyn UserRepository + Send + Sync>,
);

async fn build_repositories(config: &AppConfig) -> Result<Repositories, sqlx::Error> {
    match &config.database_url {
        Some(url) => {
            info!("Connecting to PostgreSQL");
            let pool = PgPoolOptions::new().max_connections(10).connect(url).await?;
            pool.execute(SCHEMA).await?;
            Ok((
                Arc::new(PostgresChatRepository::new(pool.clone())),
                Arc::new(PostgresUserRepository::new(pool)),
            ))
        }
        None => {
            info!("DATABASE_URL not set, using in-memory storage");
            Ok((
                Arc::new(InMemoryChatRepository::new()),
                Arc::new(InMemoryUserRepository::new()),
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "groupchat=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting group chat server");

    let config = AppConfig::from_env();
    let token_config = config.token_config();

    let (chat_repository, user_repository) = build_repositories(&config).await?;

    if config.seed_demo_users {
        seed_demo_users(user_repository.clone(), &token_config).await?;
    }

    let connection_manager: Arc<dyn ConnectionManager> = Arc::new(InMemoryConnectionManager::new());
    let event_emitter = Arc::new(ConnectionEventEmitter::new(connection_manager.clone()));

    let app_state = AppState::new(
        chat_repository,
        user_repository,
        event_emitter,
        connection_manager,
        token_config,
    );

    let app = create_router(app_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(port = config.port, "Server running on http://localhost:{}", config.port);
    axum::serve(listener, app).await?;

    Ok(())
}
