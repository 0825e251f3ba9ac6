use booklist_service::config::{AppConfig, BackendKind};
use booklist_service::models::storage::{Backend, InMemoryBackend, PostgresBackend, RedisBackend};
use booklist_service::{app, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

async fn connect_backend(config: &AppConfig) -> Backend {
    match config.backend {
        BackendKind::Postgres => {
            info!("Using PostgreSQL backend");
            let postgres_backend = PostgresBackend::new(&config.database_url)
                .await
                .expect("Failed to connect to PostgreSQL");

            Arc::new(postgres_backend)
        }
        BackendKind::Redis => {
            info!("Using Redis backend");
            let redis_backend =
                RedisBackend::new(&config.redis_url).expect("Failed to connect to Redis");

            Arc::new(redis_backend)
        }
        BackendKind::Memory => {
            info!("Using in-memory backend");
            Arc::new(InMemoryBackend::new())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("booklist_service=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let backend = connect_backend(&config).await;

    if let Err(e) = backend.test_connection().await {
        error!("Failed to connect to storage backend: {}", e);
        std::process::exit(1);
    }
    info!("Storage backend connection successful");

    if let Err(e) = backend.ensure_indexes().await {
        error!("Failed to create book indexes: {}", e);
        std::process::exit(1);
    }

    let addr = config.bind_addr();
    let app = app(AppState::new(backend, config));

    info!("BookList service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    info!("Server shutdown complete");
}
