use book_service::config::Config;
use book_service::models::storage::{DocumentStore, JsonFileStore};
use book_service::{app, AppState};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("book_service=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();

    let store = JsonFileStore::new(&config.books_file);
    if let Err(e) = store.initialize().await {
        error!(
            "Failed to initialize book store at {}: {}",
            store.path().display(),
            e
        );
        std::process::exit(1);
    }
    info!("Using book store at {}", store.path().display());

    if config.serialize_writes {
        info!("Write serialization enabled");
    }
    let state = AppState::new(Arc::new(store)).with_serialized_writes(config.serialize_writes);

    let addr = config.listen_addr();
    info!("Book service starting on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Book service stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
