pub mod config;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::Router;
use models::storage::DocumentStore;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub type SharedStore = Arc<dyn DocumentStore + Send + Sync>;

/// Per-server state handed to the dispatcher.
#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
    write_lock: Option<Arc<Mutex<()>>>,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            write_lock: None,
        }
    }

    pub fn with_serialized_writes(mut self, enabled: bool) -> Self {
        self.write_lock = enabled.then(|| Arc::new(Mutex::new(())));
        self
    }

    pub fn store(&self) -> &(dyn DocumentStore + Send + Sync) {
        self.store.as_ref()
    }

    /// Held across a load/mutate/save cycle. `None` when writes are not serialized.
    pub async fn write_guard(&self) -> Option<MutexGuard<'_, ()>> {
        match &self.write_lock {
            Some(lock) => Some(lock.lock().await),
            None => None,
        }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .fallback(routes::books::dispatch)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
